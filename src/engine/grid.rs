use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;
use ulid::Ulid;

use crate::limits::{ADJACENCY_TOLERANCE_MINUTES, MAX_GRID_SLOTS};
use crate::model::{Booking, ShopHours, Slot, SlotScore, SlotStatus, Span};

use super::conflict::is_available;
use super::duration::real_duration_minutes;

// ── Slot Grid Algorithm ──────────────────────────────────────────

/// Enumerate candidate start times for a service across one day's
/// operating window, stepping at the shop's slice granularity.
///
/// For each step, in order:
/// - past slots on today's grid come out `Locked`;
/// - steps where the service cannot finish before closing emit nothing;
/// - conflicting steps come out `Occupied`;
/// - the rest come out `Available` with a gap-fill score.
///
/// The conflict check runs against the full snapshot, not a same-day
/// subset. A same-day candidate cannot overlap another day's booking,
/// so pre-filtering is an efficiency question only.
pub fn generate_grid(
    date: NaiveDate,
    staff_id: Ulid,
    base_minutes: u32,
    speed_factor: f64,
    bookings: &[Booking],
    hours: &ShopHours,
    now: DateTime<Utc>,
) -> Vec<Slot> {
    let open = hours.open_on(date);
    let close = hours.close_on(date);
    if close <= open || hours.slice_minutes == 0 {
        debug!(
            open_hour = hours.open_hour,
            close_hour = hours.close_hour,
            slice = hours.slice_minutes,
            "degenerate shop hours, empty grid"
        );
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(hours.slice_minutes));
    let service_len =
        Duration::minutes(i64::from(real_duration_minutes(base_minutes, speed_factor)));
    let today = now.date_naive() == date;

    let mut slots = Vec::new();
    let mut current = open;
    // Explicit upper bound: the close-hour comparison must not be the
    // loop's only exit.
    while current < close && slots.len() < MAX_GRID_SLOTS {
        if today && current < now {
            slots.push(Slot {
                start: current,
                status: SlotStatus::Locked,
                score: SlotScore::Standard,
            });
            current += step;
            continue;
        }

        let proposed_end = current + service_len;
        if proposed_end > close {
            // Cannot finish before closing; this step emits nothing.
            current += step;
            continue;
        }

        let candidate = Span::new(current, proposed_end);
        if !is_available(&candidate, staff_id, bookings, None) {
            slots.push(Slot {
                start: current,
                status: SlotStatus::Occupied,
                score: SlotScore::Standard,
            });
            current += step;
            continue;
        }

        slots.push(Slot {
            start: current,
            status: SlotStatus::Available,
            score: score_slot(&candidate, open, staff_id, bookings),
        });
        current += step;
    }

    slots
}

/// Gap-fill heuristic. A slot touching neighbours on both sides plugs a
/// hole exactly; touching one side extends an existing cluster; touching
/// neither leaves an isolated island that splits the remaining idle time
/// in two. Greedy nudge toward minimal dead time, not bin packing.
fn score_slot(
    candidate: &Span,
    open: DateTime<Utc>,
    staff_id: Ulid,
    bookings: &[Booking],
) -> SlotScore {
    let tolerance = Duration::minutes(ADJACENCY_TOLERANCE_MINUTES);
    // The open-of-day instant counts as a left neighbour.
    let mut touches_previous = candidate.start == open;
    let mut touches_next = false;

    for b in bookings {
        if b.staff_id != staff_id || !b.status.blocks_schedule() {
            continue;
        }
        if !touches_previous && (b.span.end - candidate.start).abs() <= tolerance {
            touches_previous = true;
        }
        if !touches_next && (b.span.start - candidate.end).abs() <= tolerance {
            touches_next = true;
        }
        if touches_previous && touches_next {
            break;
        }
    }

    match (touches_previous, touches_next) {
        (true, true) => SlotScore::PerfectMatch,
        (true, false) | (false, true) => SlotScore::Optimal,
        (false, false) => SlotScore::Standard,
    }
}
