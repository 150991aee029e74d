use chrono::{DateTime, Duration, Utc};

/// Real duration of a service on a given chair, in minutes.
///
/// Rounding is always up: rounding down would place the computed end
/// before the service actually finishes, and back-to-back bookings would
/// silently overlap.
pub fn real_duration_minutes(base_minutes: u32, speed_factor: f64) -> u32 {
    (f64::from(base_minutes) * speed_factor).ceil() as u32
}

/// End instant of a service started at `start`, adjusted for the staff
/// member's speed factor. Inputs are assumed positive; the boundary
/// validates, not this function.
pub fn compute_end_time(
    start: DateTime<Utc>,
    base_minutes: u32,
    speed_factor: f64,
) -> DateTime<Utc> {
    start + Duration::minutes(i64::from(real_duration_minutes(base_minutes, speed_factor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 3, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn neutral_factor_is_identity() {
        assert_eq!(real_duration_minutes(30, 1.0), 30);
        assert_eq!(compute_end_time(at(10, 0), 30, 1.0), at(10, 30));
    }

    #[test]
    fn fractional_minutes_round_up() {
        // 10 × 1.05 = 10.5 → 11, never 10
        assert_eq!(real_duration_minutes(10, 1.05), 11);
        assert_eq!(compute_end_time(at(10, 0), 10, 1.05), at(10, 11));
    }

    #[test]
    fn fast_stylist_shortens() {
        assert_eq!(real_duration_minutes(30, 0.8), 24);
        assert_eq!(compute_end_time(at(14, 0), 30, 0.8), at(14, 24));
    }

    #[test]
    fn slow_stylist_lengthens() {
        assert_eq!(real_duration_minutes(45, 1.5), 68); // 67.5 → 68
    }
}
