//! Ruler mark spacing selection.

/// Candidate spacings in seconds, from single seconds up to an hour.
pub const MARK_INTERVALS: [u32; 13] = [
    1, 2, 5, 10, 15, 30, 60, 120, 300, 600, 900, 1800, 3600,
];

/// Picks the smallest interval that yields at most `max_marks` marks over `duration_secs`.
///
/// Falls back to the largest interval when none of them is coarse enough.
pub fn select_mark_interval(duration_secs: f64, max_marks: u32) -> u32 {
    MARK_INTERVALS
        .iter()
        .copied()
        .find(|&interval| duration_secs / interval as f64 <= max_marks as f64)
        .unwrap_or(MARK_INTERVALS[MARK_INTERVALS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_first_interval_that_fits() {
        // 125 / 10 = 12.5 marks is too many, 125 / 15 ~ 8.3 fits
        assert_eq!(select_mark_interval(125.0, 10), 15);
        assert_eq!(select_mark_interval(60.0, 10), 10);
        assert_eq!(select_mark_interval(5.0, 10), 1);
        assert_eq!(select_mark_interval(600.0, 10), 60);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        assert_eq!(select_mark_interval(20.0, 10), 2);
    }

    #[test]
    fn test_falls_back_to_largest_interval() {
        assert_eq!(select_mark_interval(100_000.0, 1), 3600);
        assert_eq!(select_mark_interval(30.0, 0), 3600);
    }
}
