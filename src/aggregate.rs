//! Trailing weighted average over a metric's daily samples.
//!
//! Each day carries the mean of that day's readings (`average`) and how many
//! readings went into it (`sample_size`). Days are weighted by their sample
//! size, so a day with 24 readings counts for more than a day with 3.

use serde::Deserialize;

/// Number of most recent days that feed the weighted average.
pub const TRAILING_WINDOW: usize = 7;

/// One day's observation for one metric.
///
/// Upstream documents may carry more keys (date, min, max, ...); they are
/// ignored here and left untouched in the relayed body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct DailySample {
    #[serde(default)]
    pub average: Option<f64>,
    /// Reading count. Providers sometimes send it as `5.0`, so any number is accepted.
    #[serde(default)]
    pub sample_size: f64,
}

impl DailySample {
    pub fn new(average: Option<f64>, sample_size: f64) -> Self {
        Self {
            average,
            sample_size,
        }
    }

    /// Returns the `(average, weight)` pair if this day counts toward the average.
    fn contribution(&self) -> Option<(f64, f64)> {
        match self.average {
            Some(avg) if self.sample_size > 0.0 => Some((avg, self.sample_size)),
            _ => None,
        }
    }
}

/// Weighted average of the last `window` samples (or all of them if fewer).
///
/// Samples with no readings or a missing average are skipped, not counted as
/// zero. Returns `None` when nothing in the window contributes.
pub fn weighted_average(samples: &[DailySample], window: usize) -> Option<f64> {
    let start = samples.len().saturating_sub(window);

    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;

    for (avg, weight) in samples[start..].iter().filter_map(DailySample::contribution) {
        weighted_total += avg * weight;
        weight_sum += weight;
    }

    if weight_sum == 0.0 {
        return None;
    }

    Some(weighted_total / weight_sum)
}

/// Weighted average over the trailing [`TRAILING_WINDOW`] days.
pub fn weighted_average_last7(samples: &[DailySample]) -> Option<f64> {
    weighted_average(samples, TRAILING_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(average: f64, sample_size: i64) -> DailySample {
        DailySample::new(Some(average), sample_size as f64)
    }

    #[test]
    fn test_empty_series_has_no_average() {
        assert_eq!(weighted_average_last7(&[]), None);
    }

    #[test]
    fn test_equal_weights() {
        let days = [day(10.0, 5), day(20.0, 5)];
        assert_eq!(weighted_average_last7(&days), Some(15.0));
    }

    #[test]
    fn test_uneven_weights() {
        // (10*1 + 40*3) / 4
        let days = [day(10.0, 1), day(40.0, 3)];
        assert_eq!(weighted_average_last7(&days), Some(32.5));
    }

    #[test]
    fn test_no_contributing_samples() {
        let days = [day(10.0, 0), DailySample::new(None, 5.0)];
        assert_eq!(weighted_average_last7(&days), None);
    }

    #[test]
    fn test_skipped_samples_are_not_zero() {
        let days = [day(8.0, 2), DailySample::new(None, 100.0), day(0.0, 0), day(12.0, 2)];
        assert_eq!(weighted_average_last7(&days), Some(10.0));
    }

    #[test]
    fn test_negative_sample_size_is_skipped() {
        let days = [day(50.0, -3), day(4.0, 1)];
        assert_eq!(weighted_average_last7(&days), Some(4.0));
    }

    #[test]
    fn test_only_last_seven_days_count() {
        let mut days = vec![day(100.0, 1000)];
        days.extend((1..=7).map(|v| day(v as f64, 1)));

        assert_eq!(days.len(), 8);
        assert_eq!(weighted_average_last7(&days), Some(4.0));
    }

    #[test]
    fn test_short_series_uses_everything() {
        let days = [day(100.0, 1000), day(1.0, 1000), day(1.0, 0)];
        assert_eq!(weighted_average_last7(&days), Some(50.5));
    }

    #[test]
    fn test_exactly_seven_days_uses_all() {
        let days: Vec<_> = (0..7).map(|v| day(v as f64, 2)).collect();
        assert_eq!(weighted_average_last7(&days), Some(3.0));
    }

    #[test]
    fn test_window_tail_with_no_data() {
        // Only the stale day has readings.
        let mut days = vec![day(42.0, 10)];
        days.extend(std::iter::repeat_n(DailySample::new(None, 0.0), 7));
        assert_eq!(weighted_average_last7(&days), None);
    }

    #[test]
    fn test_custom_window() {
        let days = [day(1.0, 1), day(2.0, 1), day(3.0, 1)];
        assert_eq!(weighted_average(&days, 2), Some(2.5));
        assert_eq!(weighted_average(&days, 0), None);
    }

    #[test]
    fn test_deserialize_defaults_sample_size() {
        let sample: DailySample =
            serde_json::from_value(serde_json::json!({"average": 3.5, "date": "2024-05-01"}))
                .unwrap();
        assert_eq!(sample, DailySample::new(Some(3.5), 0.0));

        let sample: DailySample =
            serde_json::from_value(serde_json::json!({"average": null, "sample_size": 12}))
                .unwrap();
        assert_eq!(sample, DailySample::new(None, 12.0));
    }

    #[test]
    fn test_float_sample_size_accepted() {
        let days: Vec<DailySample> = serde_json::from_value(serde_json::json!([
            {"average": 10, "sample_size": 5.0},
            {"average": 20, "sample_size": 5},
        ]))
        .unwrap();

        assert_eq!(days[0], DailySample::new(Some(10.0), 5.0));
        assert_eq!(weighted_average_last7(&days), Some(15.0));
    }

    #[test]
    fn test_fractional_sample_size_below_one_still_counts() {
        let days = [DailySample::new(Some(6.0), 0.5), DailySample::new(Some(2.0), -1.0)];
        assert_eq!(weighted_average_last7(&days), Some(6.0));
    }

    #[test]
    fn test_deserialize_rejects_null_sample_size() {
        let result: Result<DailySample, _> =
            serde_json::from_value(serde_json::json!({"average": 1.0, "sample_size": null}));
        assert!(result.is_err());
    }
}
