use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use ulid::Ulid;

use crate::model::{Booking, BookingStatus, ResourceSchedule, Service, Span};

use super::conflict::check_no_conflict;
use super::duration::real_duration_minutes;
use super::policy::{can_cancel, cancel_lead_minutes, transition_allowed};
use super::EngineError;

/// Who asked for a cancellation. Clients are bound by the lead-time
/// window; staff cancel at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOrigin {
    Client,
    Staff,
}

/// A partial update to one booking. Each variant names exactly the data
/// its operation needs; there is no open-ended patch type.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingCommand {
    Confirm,
    CheckIn,
    Start,
    Complete { actual_end: DateTime<Utc> },
    Reschedule { new_start: DateTime<Utc>, base_minutes: u32 },
    Cancel { origin: CancelOrigin },
    MarkDelayed,
}

/// Check-then-insert a new booking for `service` starting at `start`.
///
/// The duration is recomputed from the service base and the schedule's
/// speed factor, never copied from a previous value. Holding `&mut`
/// exclusive access makes the conflict check and the insertion one
/// atomic step; this is the serialization the persistence layer must
/// reproduce (unique constraint, transactional check-and-insert, or
/// optimistic retry) when callers race.
pub fn book(
    schedule: &mut ResourceSchedule,
    id: Ulid,
    service: &Service,
    start: DateTime<Utc>,
) -> Result<(), EngineError> {
    let minutes = real_duration_minutes(service.base_duration_minutes, schedule.speed_factor);
    let span = Span::new(start, start + Duration::minutes(i64::from(minutes)));
    check_no_conflict(schedule, &span, None)?;

    schedule.insert(Booking {
        id,
        staff_id: schedule.staff_id,
        service_id: service.id,
        service_name: service.name.clone(),
        span,
        status: BookingStatus::Scheduled,
        price: service.price,
        duration_minutes: minutes,
    });
    debug!(booking = %id, start = %start, minutes, "booking inserted");
    Ok(())
}

/// Apply one command to one booking on the schedule.
pub fn apply_command(
    schedule: &mut ResourceSchedule,
    booking_id: Ulid,
    command: BookingCommand,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let current = schedule
        .get(booking_id)
        .ok_or(EngineError::NotFound(booking_id))?
        .clone();

    match command {
        BookingCommand::Confirm => set_status(schedule, current, BookingStatus::Confirmed),
        BookingCommand::CheckIn => set_status(schedule, current, BookingStatus::CheckedIn),
        BookingCommand::Start => set_status(schedule, current, BookingStatus::InProgress),
        BookingCommand::MarkDelayed => set_status(schedule, current, BookingStatus::Delayed),

        BookingCommand::Complete { actual_end } => {
            if !transition_allowed(current.status, BookingStatus::Completed) {
                return Err(EngineError::InvalidTransition {
                    from: current.status,
                    to: BookingStatus::Completed,
                });
            }
            let mut done = current;
            if actual_end > done.span.start {
                done.span.end = actual_end;
                done.duration_minutes = done.span.duration_minutes() as u32;
            }
            done.status = BookingStatus::Completed;
            schedule.replace(done);
            Ok(())
        }

        BookingCommand::Reschedule { new_start, base_minutes } => {
            if current.status.is_terminal() {
                return Err(EngineError::InvalidTransition {
                    from: current.status,
                    to: current.status,
                });
            }
            let minutes = real_duration_minutes(base_minutes, schedule.speed_factor);
            let span = Span::new(new_start, new_start + Duration::minutes(i64::from(minutes)));
            // Checked against everything except the booking being moved.
            check_no_conflict(schedule, &span, Some(booking_id))?;

            let mut moved = current;
            moved.span = span;
            moved.duration_minutes = minutes;
            schedule.replace(moved);
            debug!(booking = %booking_id, start = %new_start, "booking rescheduled");
            Ok(())
        }

        BookingCommand::Cancel { origin } => {
            if current.status.is_terminal() {
                return Err(EngineError::InvalidTransition {
                    from: current.status,
                    to: BookingStatus::Cancelled,
                });
            }
            if origin == CancelOrigin::Client && !can_cancel(current.span.start, now) {
                return Err(EngineError::CancellationWindowClosed {
                    minutes_left: cancel_lead_minutes(current.span.start, now),
                });
            }
            let mut cancelled = current;
            cancelled.status = BookingStatus::Cancelled;
            schedule.replace(cancelled);
            debug!(booking = %booking_id, ?origin, "booking cancelled");
            Ok(())
        }
    }
}

fn set_status(
    schedule: &mut ResourceSchedule,
    mut booking: Booking,
    to: BookingStatus,
) -> Result<(), EngineError> {
    if !transition_allowed(booking.status, to) {
        return Err(EngineError::InvalidTransition {
            from: booking.status,
            to,
        });
    }
    booking.status = to;
    schedule.replace(booking);
    Ok(())
}
