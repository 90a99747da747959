//! Percentile, median and spread calculations for benchmark samples.
//!
//! This module provides utilities for computing percentiles and statistical
//! summaries from sample data.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    // Calculate the rank using linear interpolation
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        sorted[lower_index]
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        lower_value + fraction * (upper_value - lower_value)
    }
}

/// Calculate percentile value from a slice of f64 samples.
///
/// Uses linear interpolation between nearest ranks for accurate percentile estimation.
///
/// # Arguments
///
/// * `samples` - Slice of samples (will be sorted internally)
/// * `p` - Percentile to calculate (0.0 to 100.0)
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is invalid
///
/// # Examples
///
/// ```
/// use bench_stats::stats::percentiles::percentile;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let p50 = percentile(&data, 50.0);
/// assert_eq!(p50, Some(3.0));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    Some(percentile_of_sorted(&sorted(samples), p))
}

/// Median of the samples, independent of their order.
///
/// ```
/// use bench_stats::stats::percentiles::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
/// assert_eq!(median(&[]), None);
/// ```
pub fn median(samples: &[f64]) -> Option<f64> {
    percentile(samples, 50.0)
}

/// Median absolute deviation from the median (unscaled).
///
/// ```
/// use bench_stats::stats::percentiles::mad;
///
/// // median 49.5, deviations [0.5, 0.0, 0.5]
/// assert_eq!(mad(&[49.0, 49.5, 50.0]), Some(0.5));
/// ```
pub fn mad(samples: &[f64]) -> Option<f64> {
    let center = median(samples)?;
    let deviations: Vec<f64> = samples.iter().map(|&x| (x - center).abs()).collect();
    median(&deviations)
}

/// Calculate common percentiles in one pass.
///
/// Provides a statistical summary including min, max, median, mean and
/// median absolute deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileSummary {
    pub min: f64,
    pub p50: f64, // median
    pub max: f64,
    pub mean: f64,
    /// Median absolute deviation from `p50`
    pub mad: f64,
    pub count: usize,
}

impl PercentileSummary {
    /// Compute summary statistics from samples.
    ///
    /// # Returns
    ///
    /// * `Some(summary)` - Statistical summary
    /// * `None` - If samples is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_stats::stats::percentiles::PercentileSummary;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    /// let summary = PercentileSummary::from_samples(&data).unwrap();
    /// assert_eq!(summary.count, 10);
    /// assert_eq!(summary.mean, 5.5);
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 10.0);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sorted = sorted(samples);

        let count = sorted.len();
        let min = sorted[0];
        let max = sorted[count - 1];

        // Summing in sorted order keeps the mean independent of input order
        let sum: f64 = sorted.iter().sum();
        let mean = sum / count as f64;

        Some(PercentileSummary {
            min,
            p50: percentile_of_sorted(&sorted, 50.0),
            max,
            mean,
            mad: mad(&sorted)?,
            count,
        })
    }
}
