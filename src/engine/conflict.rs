use ulid::Ulid;

use crate::model::{Booking, ResourceSchedule, Span};

use super::EngineError;

/// True when no active booking of `staff_id` overlaps `candidate`.
///
/// Cancelled and delayed bookings never block. `exclude` skips one
/// booking id, so a reschedule is checked against everything else.
/// Boundary-touching intervals are not conflicts; back-to-back bookings
/// are allowed.
pub fn is_available(
    candidate: &Span,
    staff_id: Ulid,
    bookings: &[Booking],
    exclude: Option<Ulid>,
) -> bool {
    bookings.iter().all(|b| {
        b.staff_id != staff_id
            || !b.status.blocks_schedule()
            || Some(b.id) == exclude
            || !b.span.overlaps(candidate)
    })
}

/// Same rule against a per-staff schedule, using its sorted index.
/// Returns the first conflicting booking's id.
pub(crate) fn check_no_conflict(
    schedule: &ResourceSchedule,
    span: &Span,
    exclude: Option<Ulid>,
) -> Result<(), EngineError> {
    for b in schedule.overlapping(span) {
        if b.status.blocks_schedule() && Some(b.id) != exclude {
            return Err(EngineError::Conflict(b.id));
        }
    }
    Ok(())
}
