use chrono::{DateTime, Utc};

use crate::limits::MIN_CANCEL_LEAD_MINUTES;
use crate::model::BookingStatus;

/// Minutes of lead time before the appointment starts; negative once it
/// has begun.
pub fn cancel_lead_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (start - now).num_minutes()
}

/// Whether a client may still cancel an appointment starting at `start`.
/// Pure time-window rule: at least 45 minutes of lead time. Past and
/// already-started appointments always return false.
pub fn can_cancel(start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    cancel_lead_minutes(start, now) >= MIN_CANCEL_LEAD_MINUTES
}

/// Forward-only lifecycle. Terminal states accept nothing; cancellation
/// is reachable from any non-terminal status.
pub(crate) fn transition_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    match (from, to) {
        (Completed | Cancelled, _) => false,
        (_, Cancelled) => true,
        (Scheduled, Confirmed | CheckedIn | Delayed) => true,
        (Confirmed, CheckedIn | Delayed) => true,
        (CheckedIn, InProgress) => true,
        (InProgress, Completed) => true,
        (Delayed, CheckedIn | InProgress) => true,
        _ => false,
    }
}
