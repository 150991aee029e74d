//! Engine-wide constants.

/// Minimum lead time, in minutes, before a client may cancel a booking.
pub const MIN_CANCEL_LEAD_MINUTES: i64 = 45;

/// Tolerance when deciding whether a candidate slot touches a
/// neighbouring booking. Bookings rarely land on exact minute edges
/// once speed factors are applied.
pub const ADJACENCY_TOLERANCE_MINUTES: i64 = 1;

/// Display multiplier applied to hourly load counts. The load histogram
/// is a coarse per-hour touch count, not minute-level occupancy.
pub const HOURLY_LOAD_SCALE: u32 = 10;

/// Maximum characters of a service name kept in breakdown labels.
pub const SERVICE_LABEL_MAX: usize = 12;

/// Hard cap on slots emitted per grid. One slot per minute of a full
/// day; the stepping loop must never rely on the close-hour comparison
/// alone to terminate.
pub const MAX_GRID_SLOTS: usize = 24 * 60;
