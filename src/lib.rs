//! parlor — a pure scheduling engine for salon and barbershop bookings.
//!
//! The crate is a computational library embedded in a larger booking
//! application: it detects conflicts between time-bounded bookings,
//! generates a scored grid of candidate appointment slots, computes
//! staff-adjusted service durations, applies the cancellation window,
//! and aggregates occupancy, revenue, and load metrics over booking
//! snapshots.
//!
//! It owns no storage, no wire format, and no clock. Callers pass
//! immutable snapshots and an explicit "now", and get plain data back.
//! Because availability checks run against a snapshot, two callers
//! racing a check-then-insert can still double-book; the host must
//! serialize writes per staff member (a per-resource lock, a unique
//! constraint over `(staff_id, span)`, or optimistic retry).

pub mod engine;
pub mod limits;
pub mod model;

pub use engine::{
    apply_command, book, can_cancel, compute_end_time, generate_grid, is_available, occupancy,
    revenue_stats, BookingCommand, CancelOrigin, EngineError,
};
