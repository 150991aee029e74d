//! The scheduling engine: pure functions over booking snapshots.
//!
//! Nothing in here holds state or performs I/O. Every function takes
//! explicit immutable inputs and returns a freshly computed value, so
//! all of it is safe for unlimited concurrent invocation. The one
//! contract the engine cannot enforce itself: check-then-insert is a
//! race across independent callers, and whoever owns the booking store
//! must serialize writes per staff member (see [`book`]).

mod commands;
mod conflict;
mod duration;
mod error;
mod grid;
mod metrics;
mod policy;
#[cfg(test)]
mod tests;

pub use commands::{apply_command, book, BookingCommand, CancelOrigin};
pub use conflict::is_available;
pub use duration::{compute_end_time, real_duration_minutes};
pub use error::EngineError;
pub use grid::generate_grid;
pub use metrics::{
    hourly_load, occupancy, opportunity_cost, revenue_stats, revenue_trend, service_breakdown,
    HourLoad, OccupancyReport, RevenueStats, ServiceCount, TrendPoint, TrendView,
};
pub use policy::{can_cancel, cancel_lead_minutes};
