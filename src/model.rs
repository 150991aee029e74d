use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open interval `[start, end)` in UTC wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

/// Where a booking is in its life. Forward-only; `Cancelled` and
/// `Delayed` no longer hold their time range on the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Scheduled,
    Confirmed,
    CheckedIn,
    InProgress,
    Completed,
    Cancelled,
    Delayed,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its interval for
    /// conflict purposes.
    pub fn blocks_schedule(self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::Delayed)
    }

    /// Whether a booking in this status counts toward revenue and
    /// occupancy rollups.
    pub fn counts_revenue(self) -> bool {
        self != BookingStatus::Cancelled
    }

    /// Terminal statuses are immutable history.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// A reservation of one staff member for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub staff_id: Ulid,
    pub service_id: Ulid,
    /// Display name of the service, carried so reporting can group
    /// without a catalog lookup.
    pub service_name: String,
    pub span: Span,
    pub status: BookingStatus,
    pub price: f64,
    /// Always `ceil(base_duration × speed_factor)`, recomputed on every
    /// duration-affecting edit.
    pub duration_minutes: u32,
}

/// A staff member. The speed factor scales service base durations:
/// above 1.0 takes longer than baseline, below 1.0 is faster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub id: Ulid,
    pub name: String,
    pub speed_factor: f64,
}

/// Catalog entry for a bookable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Ulid,
    pub name: String,
    pub base_duration_minutes: u32,
    pub price: f64,
}

/// Shop operating window and grid granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopHours {
    pub open_hour: u32,
    pub close_hour: u32,
    /// Granularity of the booking grid in minutes (15/30/45/60).
    pub slice_minutes: u32,
}

impl ShopHours {
    pub fn open_on(&self, date: NaiveDate) -> DateTime<Utc> {
        midnight(date) + Duration::hours(i64::from(self.open_hour))
    }

    pub fn close_on(&self, date: NaiveDate) -> DateTime<Utc> {
        midnight(date) + Duration::hours(i64::from(self.close_hour))
    }

    /// Bookable minutes per staff member per day; zero when misconfigured.
    pub fn daily_minutes(&self) -> i64 {
        (i64::from(self.close_hour) - i64::from(self.open_hour)).max(0) * 60
    }
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Available,
    Occupied,
    /// In the past relative to "now"; shown but not bookable.
    Locked,
}

/// Gap-fill quality of an available slot. `PerfectMatch` exactly plugs a
/// hole between two bookings; `Optimal` extends a cluster from one side;
/// `Standard` is isolated and fragments the day if chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotScore {
    Standard,
    Optimal,
    PerfectMatch,
}

/// A candidate start time produced by the grid generator. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub status: SlotStatus,
    pub score: SlotScore,
}

/// One staff member's bookings, kept sorted by start time.
///
/// This is the per-resource serialization point: a caller holding
/// exclusive access to a `ResourceSchedule` can run check-then-insert
/// atomically (see `engine::book`). Two callers racing over independent
/// snapshots can still double-book; write exclusivity is the host's job.
#[derive(Debug, Clone)]
pub struct ResourceSchedule {
    pub staff_id: Ulid,
    pub speed_factor: f64,
    bookings: Vec<Booking>,
}

impl ResourceSchedule {
    pub fn new(staff_id: Ulid, speed_factor: f64) -> Self {
        Self {
            staff_id,
            speed_factor,
            bookings: Vec::new(),
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn get(&self, id: Ulid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Insert maintaining sort order by span.start. No conflict check;
    /// use `engine::book` for checked insertion.
    pub fn insert(&mut self, booking: Booking) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.span.start, |b| b.span.start)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    pub fn remove(&mut self, id: Ulid) -> Option<Booking> {
        if let Some(pos) = self.bookings.iter().position(|b| b.id == id) {
            Some(self.bookings.remove(pos))
        } else {
            None
        }
    }

    /// Swap in an updated booking, re-sorting by its (possibly new) start.
    pub fn replace(&mut self, booking: Booking) {
        self.remove(booking.id);
        self.insert(booking);
    }

    /// Only bookings whose span overlaps the query window. Binary search
    /// skips everything starting at or after `query.end`.
    pub fn overlapping(&self, query: &Span) -> impl Iterator<Item = &Booking> {
        let right_bound = self
            .bookings
            .partition_point(|b| b.span.start < query.end);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.span.end > query.start)
    }
}
