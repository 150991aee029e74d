use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::limits::{HOURLY_LOAD_SCALE, SERVICE_LABEL_MAX};
use crate::model::{midnight, Booking, Service, ShopHours, Span};

// ── Aggregation over booking snapshots ───────────────────────────
//
// Every function here is a single pass over an immutable snapshot.
// Cancelled bookings never count; delayed ones still count toward
// revenue and occupancy (the work is expected to happen).

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OccupancyReport {
    pub booked_minutes: i64,
    /// Window length × staff count; zero when the shop is misconfigured.
    pub available_minutes: i64,
    /// Rounded percentage, `0` when nothing is available.
    pub occupancy_pct: u32,
    pub dead_time_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueStats {
    pub daily: f64,
    /// Sunday through Saturday of the week containing the reference date.
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendView {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// One bucket of a revenue trend series, in chronological label order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourLoad {
    pub hour: u32,
    /// Touch count × `HOURLY_LOAD_SCALE`. Coarse by design: a booking
    /// adds one unit to every hour it touches, regardless of minutes.
    pub load: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub name: String,
    pub count: u32,
}

/// Booked versus available minutes across all staff for one date.
pub fn occupancy(
    bookings: &[Booking],
    date: NaiveDate,
    hours: &ShopHours,
    staff_count: usize,
) -> OccupancyReport {
    let booked_minutes: i64 = bookings
        .iter()
        .filter(|b| b.status.counts_revenue() && b.span.start.date_naive() == date)
        .map(|b| b.span.duration_minutes())
        .sum();

    let available_minutes = hours.daily_minutes() * staff_count as i64;
    let occupancy_pct = if available_minutes == 0 {
        0
    } else {
        ((booked_minutes as f64 / available_minutes as f64) * 100.0).round() as u32
    };

    OccupancyReport {
        booked_minutes,
        available_minutes,
        occupancy_pct,
        dead_time_minutes: (available_minutes - booked_minutes).max(0),
    }
}

/// Monetized value of idle capacity: mean catalog price-per-minute
/// times the dead minutes, rounded to whole currency units.
pub fn opportunity_cost(dead_time_minutes: i64, services: &[Service]) -> i64 {
    if services.is_empty() {
        return 0;
    }
    let per_minute: f64 = services
        .iter()
        .map(|s| s.price / f64::from(s.base_duration_minutes))
        .sum::<f64>()
        / services.len() as f64;
    (per_minute * dead_time_minutes as f64).round() as i64
}

/// Day, week, month, and year revenue sums for the reference date, in
/// one pass. The four sums are independent: a week straddling a month
/// or year boundary still collects its out-of-month days.
pub fn revenue_stats(bookings: &[Booking], reference: DateTime<Utc>) -> RevenueStats {
    let date = reference.date_naive();
    let week_start = sunday_of(date);
    let week_end = week_start + Duration::days(7);

    let mut stats = RevenueStats { daily: 0.0, weekly: 0.0, monthly: 0.0, yearly: 0.0 };
    for b in bookings.iter().filter(|b| b.status.counts_revenue()) {
        let d = b.span.start.date_naive();
        if d == date {
            stats.daily += b.price;
        }
        if d >= week_start && d < week_end {
            stats.weekly += b.price;
        }
        if d.year() == date.year() && d.month() == date.month() {
            stats.monthly += b.price;
        }
        if d.year() == date.year() {
            stats.yearly += b.price;
        }
    }
    stats
}

/// Revenue bucketed for charting. Labels follow the natural
/// chronological order of the view, never sorted by value.
pub fn revenue_trend(
    view: TrendView,
    reference: DateTime<Utc>,
    bookings: &[Booking],
    hours: &ShopHours,
) -> Vec<TrendPoint> {
    let date = reference.date_naive();
    let active = |b: &&Booking| b.status.counts_revenue();

    match view {
        TrendView::Daily => (hours.open_hour..hours.close_hour)
            .map(|h| TrendPoint {
                label: format!("{h:02}:00"),
                total: bookings
                    .iter()
                    .filter(active)
                    .filter(|b| b.span.start.date_naive() == date && b.span.start.hour() == h)
                    .map(|b| b.price)
                    .sum(),
            })
            .collect(),

        TrendView::Weekly => {
            let week_start = sunday_of(date);
            (0..7)
                .map(|i| {
                    let day = week_start + Duration::days(i);
                    TrendPoint {
                        label: day.weekday().to_string(),
                        total: bookings
                            .iter()
                            .filter(active)
                            .filter(|b| b.span.start.date_naive() == day)
                            .map(|b| b.price)
                            .sum(),
                    }
                })
                .collect()
        }

        TrendView::Monthly => (1..=days_in_month(date.year(), date.month()))
            .map(|day| TrendPoint {
                label: day.to_string(),
                total: bookings
                    .iter()
                    .filter(active)
                    .filter(|b| {
                        let d = b.span.start.date_naive();
                        d.year() == date.year() && d.month() == date.month() && d.day() == day
                    })
                    .map(|b| b.price)
                    .sum(),
            })
            .collect(),

        TrendView::Yearly => (1..=12)
            .map(|month| TrendPoint {
                label: MONTH_ABBREV[month as usize - 1].to_string(),
                total: bookings
                    .iter()
                    .filter(active)
                    .filter(|b| {
                        let d = b.span.start.date_naive();
                        d.year() == date.year() && d.month() == month
                    })
                    .map(|b| b.price)
                    .sum(),
            })
            .collect(),
    }
}

/// Per-hour touch counts for one date, scaled for charting. A booking
/// spanning three hours adds one unit to each of the three buckets.
pub fn hourly_load(bookings: &[Booking], date: NaiveDate, hours: &ShopHours) -> Vec<HourLoad> {
    let base = midnight(date);
    (hours.open_hour..hours.close_hour)
        .map(|h| {
            let bucket = Span::new(
                base + Duration::hours(i64::from(h)),
                base + Duration::hours(i64::from(h) + 1),
            );
            let touches = bookings
                .iter()
                .filter(|b| b.status.counts_revenue() && b.span.overlaps(&bucket))
                .count() as u32;
            HourLoad { hour: h, load: touches * HOURLY_LOAD_SCALE }
        })
        .collect()
}

/// Non-cancelled booking counts grouped by shortened service name, in
/// first-seen order. Consumers sort by count if they need a ranking.
pub fn service_breakdown(bookings: &[Booking]) -> Vec<ServiceCount> {
    let mut out: Vec<ServiceCount> = Vec::new();
    for b in bookings.iter().filter(|b| b.status.counts_revenue()) {
        let name = short_name(&b.service_name);
        if let Some(entry) = out.iter_mut().find(|e| e.name == name) {
            entry.count += 1;
        } else {
            out.push(ServiceCount { name, count: 1 });
        }
    }
    out
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sunday of the week containing `date` (weeks run Sunday–Saturday).
fn sunday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month");
    (next - first).num_days() as u32
}

fn short_name(name: &str) -> String {
    let trimmed = name.trim();
    match trimmed.char_indices().nth(SERVICE_LABEL_MAX) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
