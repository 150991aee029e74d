//! End-to-end scenarios driving the engine the way a booking front end
//! would: commands against a schedule, grids and metrics over the
//! resulting snapshot.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use ulid::Ulid;

use super::*;
use crate::model::{
    Booking, BookingStatus, ResourceSchedule, Service, ShopHours, Slot, SlotScore, SlotStatus,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    date().and_hms_opt(h, m, 0).unwrap().and_utc()
}

fn hours() -> ShopHours {
    ShopHours { open_hour: 9, close_hour: 18, slice_minutes: 30 }
}

fn svc(name: &str, base: u32, price: f64) -> Service {
    Service {
        id: Ulid::new(),
        name: name.into(),
        base_duration_minutes: base,
        price,
    }
}

fn assert_no_overlap(schedule: &ResourceSchedule) {
    let active: Vec<&Booking> = schedule
        .bookings()
        .iter()
        .filter(|b| b.status.blocks_schedule())
        .collect();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            assert!(
                !a.span.overlaps(&b.span),
                "overlap: {:?} and {:?}",
                a.span,
                b.span
            );
        }
    }
}

#[test]
fn booking_flow_grid_and_metrics_agree() {
    let staff = Ulid::new();
    let mut rs = ResourceSchedule::new(staff, 1.0);
    let cut = svc("Cut", 30, 30.0);
    let colour = svc("Colour", 60, 90.0);

    book(&mut rs, Ulid::new(), &cut, at(10, 0)).unwrap();
    book(&mut rs, Ulid::new(), &colour, at(11, 0)).unwrap();
    assert_no_overlap(&rs);

    // Grid for a 30-minute cut over the same snapshot, viewed from
    // another day so nothing is locked.
    let elsewhen: DateTime<Utc> = "2026-03-10T08:00:00Z".parse().unwrap();
    let slots = generate_grid(date(), staff, 30, 1.0, rs.bookings(), &hours(), elsewhen);

    let slot = |start: DateTime<Utc>| -> &Slot {
        slots.iter().find(|s| s.start == start).unwrap()
    };
    assert_eq!(slot(at(10, 0)).status, SlotStatus::Occupied);
    assert_eq!(slot(at(11, 30)).status, SlotStatus::Occupied);
    // 10:30 plugs the half-hour hole between the cut and the colour
    assert_eq!(slot(at(10, 30)).status, SlotStatus::Available);
    assert_eq!(slot(at(10, 30)).score, SlotScore::PerfectMatch);

    // Metrics over the same snapshot
    let report = occupancy(rs.bookings(), date(), &hours(), 1);
    assert_eq!(report.booked_minutes, 90);
    assert_eq!(report.occupancy_pct, 17); // round(90/540 × 100)

    let stats = revenue_stats(rs.bookings(), at(18, 0));
    assert_eq!(stats.daily, 120.0);
}

#[test]
fn every_available_slot_is_actually_bookable() {
    let staff = Ulid::new();
    let mut rs = ResourceSchedule::new(staff, 1.1);
    let trim = svc("Trim", 25, 18.0); // 28 real minutes on this chair

    book(&mut rs, Ulid::new(), &trim, at(9, 30)).unwrap();
    book(&mut rs, Ulid::new(), &trim, at(12, 0)).unwrap();
    book(&mut rs, Ulid::new(), &trim, at(16, 30)).unwrap();

    let elsewhen: DateTime<Utc> = "2026-03-10T08:00:00Z".parse().unwrap();
    let slots = generate_grid(date(), staff, 25, 1.1, rs.bookings(), &hours(), elsewhen);

    for slot in slots.iter().filter(|s| s.status == SlotStatus::Available) {
        let mut trial = rs.clone();
        book(&mut trial, Ulid::new(), &trim, slot.start).unwrap();
        assert_no_overlap(&trial);
    }
}

#[test]
fn cancelled_booking_reopens_grid_and_leaves_revenue() {
    let staff = Ulid::new();
    let mut rs = ResourceSchedule::new(staff, 1.0);
    let cut = svc("Cut", 30, 30.0);
    let id = Ulid::new();
    book(&mut rs, id, &cut, at(10, 0)).unwrap();

    apply_command(&mut rs, id, BookingCommand::Cancel { origin: CancelOrigin::Client }, at(9, 0))
        .unwrap();

    let elsewhen: DateTime<Utc> = "2026-03-10T08:00:00Z".parse().unwrap();
    let slots = generate_grid(date(), staff, 30, 1.0, rs.bookings(), &hours(), elsewhen);
    assert!(slots.iter().all(|s| s.status == SlotStatus::Available));

    let stats = revenue_stats(rs.bookings(), at(18, 0));
    assert_eq!(stats.daily, 0.0);
    assert_eq!(service_breakdown(rs.bookings()).len(), 0);
}

#[test]
fn full_day_lifecycle_preserves_invariant() {
    let staff = Ulid::new();
    let mut rs = ResourceSchedule::new(staff, 1.25);
    let cut = svc("Cut", 30, 30.0);
    let shave = svc("Shave", 20, 15.0);

    let a = Ulid::new();
    let b = Ulid::new();
    let c = Ulid::new();
    book(&mut rs, a, &cut, at(9, 0)).unwrap(); // 38 min
    book(&mut rs, b, &shave, at(10, 0)).unwrap(); // 25 min
    book(&mut rs, c, &cut, at(11, 0)).unwrap();

    apply_command(&mut rs, a, BookingCommand::CheckIn, at(8, 55)).unwrap();
    apply_command(&mut rs, a, BookingCommand::Start, at(9, 0)).unwrap();
    apply_command(&mut rs, a, BookingCommand::Complete { actual_end: at(9, 45) }, at(9, 45))
        .unwrap();
    apply_command(
        &mut rs,
        b,
        BookingCommand::Reschedule { new_start: at(14, 0), base_minutes: 20 },
        at(9, 50),
    )
    .unwrap();
    apply_command(&mut rs, c, BookingCommand::MarkDelayed, at(10, 30)).unwrap();

    assert_no_overlap(&rs);
    assert_eq!(rs.get(a).unwrap().status, BookingStatus::Completed);
    assert_eq!(rs.get(a).unwrap().duration_minutes, 45);
    assert_eq!(rs.get(b).unwrap().span.start, at(14, 0));

    // Completed, rescheduled, and delayed bookings all still count
    // toward the day's revenue; nothing was cancelled.
    let stats = revenue_stats(rs.bookings(), at(18, 0));
    assert_eq!(stats.daily, 75.0);
}

#[test]
fn slot_serde_shape_is_stable() {
    let slot = Slot {
        start: at(10, 0),
        status: SlotStatus::Available,
        score: SlotScore::Optimal,
    };
    let json = serde_json::to_value(&slot).unwrap();
    assert_eq!(json["status"], "Available");
    assert_eq!(json["score"], "Optimal");
    let back: Slot = serde_json::from_value(json).unwrap();
    assert_eq!(back, slot);
}

#[test]
fn dead_time_monetization_follows_occupancy() {
    let staff_count = 2;
    let snapshot = vec![{
        let cut = svc("Cut", 30, 30.0);
        let mut rs = ResourceSchedule::new(Ulid::new(), 1.0);
        book(&mut rs, Ulid::new(), &cut, at(10, 0)).unwrap();
        rs.bookings()[0].clone()
    }];

    let report = occupancy(&snapshot, date(), &hours(), staff_count);
    assert_eq!(report.dead_time_minutes, 2 * 540 - 30);

    let catalog = vec![svc("Cut", 30, 30.0), svc("Colour", 60, 90.0)];
    // mean price-per-minute = (1.0 + 1.5) / 2 = 1.25; 1050 × 1.25 = 1312.5
    assert_eq!(opportunity_cost(report.dead_time_minutes, &catalog), 1313);
}
