//! Per-group summary statistics

use serde::{Deserialize, Serialize};

use super::outliers::FilteredGroup;
use super::percentiles::PercentileSummary;

/// Summary of the accepted samples of one group.
///
/// Derived data: re-filtering a group produces a new `Statistic` rather than
/// updating an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    /// Samples that passed the outlier filter
    pub accepted: usize,
    /// Samples rejected by the outlier filter
    pub rejected: usize,
    /// Median of the accepted samples
    pub central: f64,
    /// Median absolute deviation over the median, in percent. `None` when
    /// the median is zero but the samples still spread.
    pub variance_pct: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Statistic {
    /// Summarize accepted values. Returns `None` when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_stats::stats::Statistic;
    ///
    /// let stat = Statistic::from_accepted(&[49_000.0, 49_500.0, 50_000.0], 0).unwrap();
    /// assert_eq!(stat.central, 49_500.0);
    /// assert!((stat.variance_pct.unwrap() - 1.0101).abs() < 1e-3);
    /// ```
    pub fn from_accepted(values: &[f64], rejected: usize) -> Option<Self> {
        let summary = PercentileSummary::from_samples(values)?;

        let variance_pct = if summary.p50 != 0.0 {
            Some(summary.mad / summary.p50.abs() * 100.0)
        } else if summary.mad == 0.0 {
            Some(0.0)
        } else {
            None
        };

        Some(Statistic {
            accepted: summary.count,
            rejected,
            central: summary.p50,
            variance_pct,
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
        })
    }

    /// Summarize a filtered group. Returns `None` for an empty group.
    pub fn from_group(filtered: &FilteredGroup) -> Option<Self> {
        Self::from_accepted(&filtered.accepted_values(), filtered.rejected_count())
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }

    /// Rejected / total
    pub fn rejection_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.rejected as f64 / self.total() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Statistic::from_accepted(&[], 3).is_none());
    }

    #[test]
    fn test_single_value() {
        let stat = Statistic::from_accepted(&[31_500.0], 0).unwrap();
        assert_eq!(stat.accepted, 1);
        assert_eq!(stat.central, 31_500.0);
        assert_eq!(stat.variance_pct, Some(0.0));
    }

    #[test]
    fn test_variance_percent() {
        let stat = Statistic::from_accepted(&[31_500.0, 32_000.0, 32_500.0], 0).unwrap();
        assert_eq!(stat.central, 32_000.0);
        assert!((stat.variance_pct.unwrap() - 1.5625).abs() < 1e-9);
    }

    #[test]
    fn test_zero_median() {
        let flat = Statistic::from_accepted(&[0.0, 0.0, 0.0], 0).unwrap();
        assert_eq!(flat.variance_pct, Some(0.0));

        let spread = Statistic::from_accepted(&[-1.0, 0.0, 1.0], 0).unwrap();
        assert_eq!(spread.central, 0.0);
        assert_eq!(spread.variance_pct, None);
    }

    #[test]
    fn test_rejection_rate() {
        let stat = Statistic::from_accepted(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 2).unwrap();
        assert_eq!(stat.total(), 10);
        assert!((stat.rejection_rate() - 0.2).abs() < 1e-12);
    }
}
