use ulid::Ulid;

use crate::model::BookingStatus;

#[derive(Debug)]
pub enum EngineError {
    NotFound(Ulid),
    Conflict(Ulid),
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    CancellationWindowClosed {
        minutes_left: i64,
    },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::Conflict(id) => write!(f, "conflict with booking: {id}"),
            EngineError::InvalidTransition { from, to } => {
                write!(f, "invalid status transition: {from:?} -> {to:?}")
            }
            EngineError::CancellationWindowClosed { minutes_left } => {
                write!(
                    f,
                    "cancellation window closed: {minutes_left} minutes before start"
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}
