//! Review interval policy
//!
//! Each rating has a base interval in days:
//! - Hard: 1 day
//! - Medium: 3 days
//! - Easy: 7 days
//!
//! Every repetition after the first grows the base by a factor of 1.5,
//! so the n-th review of a card schedules `base * 1.5^(n - 1)` days ahead.
//! Growth is uncapped and a Hard rating does not reset the count.

use chrono::{DateTime, Duration, Utc};

use super::error::{Result, SchedulerError};
use super::models::Difficulty;

/// Growth factor applied per repetition beyond the first
const GROWTH_FACTOR: f64 = 1.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Base interval in days for a rating
pub fn base_interval(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Hard => 1.0,
        Difficulty::Medium => 3.0,
        Difficulty::Easy => 7.0,
    }
}

/// Days until a card is eligible again after its `repetition_count`-th review.
///
/// A count of 0 or 1 yields the base interval.
pub fn compute_next_interval(difficulty: Difficulty, repetition_count: u32) -> f64 {
    let base = base_interval(difficulty);
    if repetition_count <= 1 {
        return base;
    }

    let exponent = i32::try_from(repetition_count - 1).unwrap_or(i32::MAX);
    base * GROWTH_FACTOR.powi(exponent)
}

/// Add a fractional number of days to a timestamp, at millisecond precision
pub fn next_review_at(reviewed_at: DateTime<Utc>, days: f64) -> Result<DateTime<Utc>> {
    let millis = (days * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(SchedulerError::IntervalOutOfRange { days });
    }

    Duration::try_milliseconds(millis as i64)
        .and_then(|delta| reviewed_at.checked_add_signed(delta))
        .ok_or(SchedulerError::IntervalOutOfRange { days })
}

/// Intervals each rating would produce for the given repetition,
/// ordered Hard, Medium, Easy. Used to label rating buttons.
pub fn preview_intervals(repetition_count: u32) -> [f64; 3] {
    Difficulty::ALL.map(|difficulty| compute_next_interval(difficulty, repetition_count))
}

/// Format an interval in days to a compact human-readable string
pub fn format_interval(days: f64) -> String {
    if !days.is_finite() {
        return "never".to_string();
    }
    if days <= 0.0 {
        return "now".to_string();
    }
    if days < 1.0 {
        let hours = (days * 24.0).round().max(1.0);
        return format!("{}h", hours as i64);
    }
    if days < 7.0 {
        let rounded = (days * 10.0).round() / 10.0;
        return if rounded.fract() == 0.0 {
            format!("{}d", rounded as i64)
        } else {
            format!("{:.1}d", rounded)
        };
    }

    let whole = days.floor() as i64;
    if whole < 30 {
        format!("{}w", whole / 7)
    } else if whole < 365 {
        format!("{}mo", whole / 30)
    } else {
        format!("{}y", whole / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_base_intervals() {
        assert_eq!(compute_next_interval(Difficulty::Hard, 1), 1.0);
        assert_eq!(compute_next_interval(Difficulty::Medium, 1), 3.0);
        assert_eq!(compute_next_interval(Difficulty::Easy, 1), 7.0);
    }

    #[test]
    fn test_growth_per_repetition() {
        assert_eq!(compute_next_interval(Difficulty::Easy, 2), 10.5);
        assert_eq!(compute_next_interval(Difficulty::Hard, 3), 2.25);
        assert_eq!(compute_next_interval(Difficulty::Medium, 3), 6.75);
    }

    #[test]
    fn test_hard_does_not_reset_growth() {
        // 1.5^4
        assert_eq!(compute_next_interval(Difficulty::Hard, 5), 5.0625);
    }

    #[test]
    fn test_zero_repetition_uses_base() {
        assert_eq!(compute_next_interval(Difficulty::Medium, 0), 3.0);
    }

    #[test]
    fn test_next_review_at_fractional_days() {
        let reviewed = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let next = next_review_at(reviewed, 2.25).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 3, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_next_review_at_overflow_is_error() {
        let reviewed = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let days = compute_next_interval(Difficulty::Easy, 200);
        assert!(matches!(
            next_review_at(reviewed, days),
            Err(SchedulerError::IntervalOutOfRange { .. })
        ));
        assert!(next_review_at(reviewed, f64::INFINITY).is_err());
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(1), [1.0, 3.0, 7.0]);
        assert_eq!(preview_intervals(2), [1.5, 4.5, 10.5]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0.0), "now");
        assert_eq!(format_interval(0.5), "12h");
        assert_eq!(format_interval(1.0), "1d");
        assert_eq!(format_interval(2.25), "2.3d");
        assert_eq!(format_interval(3.0), "3d");
        assert_eq!(format_interval(10.5), "1w");
        assert_eq!(format_interval(14.0), "2w");
        assert_eq!(format_interval(30.0), "1mo");
        assert_eq!(format_interval(90.0), "3mo");
        assert_eq!(format_interval(365.0), "1y");
        assert_eq!(format_interval(730.0), "2y");
        assert_eq!(format_interval(f64::INFINITY), "never");
    }
}
