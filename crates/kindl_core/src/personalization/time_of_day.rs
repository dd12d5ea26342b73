//! Time-of-day micro-copy and background tint.
//!
//! The two functions use different hour boundaries (17/21 for copy, 18/22
//! for background). Both sets are shipped as-is.

use chrono::Timelike;

pub const MORNING_COPY: &str = "Start your day with meaningful connections.";
pub const AFTERNOON_COPY: &str = "Afternoon moments of genuine connection.";
pub const EVENING_COPY: &str = "Unwind with thoughtful souls tonight.";
pub const LATE_NIGHT_COPY: &str = "Late night conversations that matter.";

pub const MORNING_BACKGROUND: &str = "#FFFCF8";
pub const AFTERNOON_BACKGROUND: &str = "#FFFFFF";
pub const EVENING_BACKGROUND: &str = "#FBF8F4";
pub const NIGHT_BACKGROUND: &str = "#F6F6F6";

/// Returns the feed header copy for `hour` (0-23; larger values are night).
pub fn time_based_copy(hour: u32) -> &'static str {
    match hour {
        6..=11 => MORNING_COPY,
        12..=16 => AFTERNOON_COPY,
        17..=20 => EVENING_COPY,
        _ => LATE_NIGHT_COPY,
    }
}

/// Returns the feed background color token for `hour`.
pub fn time_based_background(hour: u32) -> &'static str {
    match hour {
        6..=11 => MORNING_BACKGROUND,
        12..=17 => AFTERNOON_BACKGROUND,
        18..=21 => EVENING_BACKGROUND,
        _ => NIGHT_BACKGROUND,
    }
}

/// Current hour of the device's local clock.
pub fn current_hour() -> u32 {
    chrono::Local::now().hour()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_boundaries() {
        assert_eq!(time_based_copy(5), LATE_NIGHT_COPY);
        assert_eq!(time_based_copy(6), MORNING_COPY);
        assert_eq!(time_based_copy(11), MORNING_COPY);
        assert_eq!(time_based_copy(12), AFTERNOON_COPY);
        assert_eq!(time_based_copy(17), EVENING_COPY);
        assert_eq!(time_based_copy(21), LATE_NIGHT_COPY);
        assert_eq!(time_based_copy(0), LATE_NIGHT_COPY);
    }

    #[test]
    fn background_boundaries_differ_from_copy() {
        assert_eq!(time_based_background(17), AFTERNOON_BACKGROUND);
        assert_eq!(time_based_background(18), EVENING_BACKGROUND);
        assert_eq!(time_based_background(21), EVENING_BACKGROUND);
        assert_eq!(time_based_background(22), NIGHT_BACKGROUND);
        assert_eq!(time_based_background(6), MORNING_BACKGROUND);
        assert_eq!(time_based_background(5), NIGHT_BACKGROUND);
    }

    #[test]
    fn total_over_all_hours() {
        for hour in 0..24 {
            assert!(!time_based_copy(hour).is_empty());
            assert!(time_based_background(hour).starts_with('#'));
        }
        assert_eq!(time_based_copy(99), LATE_NIGHT_COPY);
        assert!(current_hour() < 24);
    }
}
