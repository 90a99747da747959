//! Outlier detection for benchmark results.
//!
//! Samples are classified as accepted or rejected, never deleted. The
//! default policy rejects samples further than a multiple of the (scaled)
//! median absolute deviation from the median; the Interquartile Range
//! method is available as an alternative.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::percentiles::{mad, median, percentile};
use crate::error::BenchStatsError;
use crate::sample::SampleGroup;

/// Scale factor making the MAD a consistent estimator of the standard
/// deviation for normally distributed data.
pub const MAD_SCALE: f64 = 1.4826;

/// Default multiplier for [`OutlierPolicy::Mad`]
pub const DEFAULT_MAD_MULTIPLIER: f64 = 3.0;

/// Default multiplier for [`OutlierPolicy::Iqr`] (Tukey's fences)
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// How samples are classified as outliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum OutlierPolicy {
    /// Reject samples outside `median ± multiplier * 1.4826 * MAD`
    Mad { multiplier: f64 },
    /// Reject samples outside `[Q1 - multiplier*IQR, Q3 + multiplier*IQR]`
    Iqr { multiplier: f64 },
    /// Accept everything
    None,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        OutlierPolicy::Mad {
            multiplier: DEFAULT_MAD_MULTIPLIER,
        }
    }
}

/// Policy family, without its multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Mad,
    Iqr,
    None,
}

impl PolicyKind {
    /// Build the policy, falling back to the family's default multiplier
    pub fn with_multiplier(self, multiplier: Option<f64>) -> OutlierPolicy {
        match self {
            PolicyKind::Mad => OutlierPolicy::Mad {
                multiplier: multiplier.unwrap_or(DEFAULT_MAD_MULTIPLIER),
            },
            PolicyKind::Iqr => OutlierPolicy::Iqr {
                multiplier: multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            },
            PolicyKind::None => OutlierPolicy::None,
        }
    }
}

impl FromStr for PolicyKind {
    type Err = BenchStatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mad" => Ok(PolicyKind::Mad),
            "iqr" => Ok(PolicyKind::Iqr),
            "none" => Ok(PolicyKind::None),
            other => Err(BenchStatsError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Mad => write!(f, "mad"),
            PolicyKind::Iqr => write!(f, "iqr"),
            PolicyKind::None => write!(f, "none"),
        }
    }
}

/// Result of classifying a set of samples.
#[derive(Debug, Clone)]
pub struct OutlierResult {
    /// Indices of rejected samples in the original sample array
    pub outlier_indices: Vec<usize>,
    /// Samples below this value are rejected
    pub lower_fence: f64,
    /// Samples above this value are rejected
    pub upper_fence: f64,
    /// Median of the samples
    pub median: f64,
    /// True when every sample fell outside the fences and the one closest to
    /// the median was kept anyway
    pub fallback: bool,
}

impl OutlierResult {
    /// Classify samples under `policy`.
    ///
    /// Single samples and fewer than four samples under the IQR policy are
    /// never rejected. A spread of zero collapses the fences, so anything off
    /// the median (or outside the quartiles) is rejected. At least one sample
    /// is always accepted.
    ///
    /// # Returns
    ///
    /// * `Some(result)` - Outlier detection results
    /// * `None` - If samples is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_stats::stats::outliers::{OutlierPolicy, OutlierResult};
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]; // 100.0 is an outlier
    /// let result = OutlierResult::detect(&data, OutlierPolicy::default()).unwrap();
    /// assert!(result.has_outliers());
    /// assert_eq!(result.outlier_indices, vec![5]);
    /// ```
    pub fn detect(samples: &[f64], policy: OutlierPolicy) -> Option<Self> {
        let center = median(samples)?;

        let (lower_fence, upper_fence) = match policy {
            _ if samples.len() < 2 => (f64::NEG_INFINITY, f64::INFINITY),
            OutlierPolicy::None => (f64::NEG_INFINITY, f64::INFINITY),
            OutlierPolicy::Mad { multiplier } => {
                let spread = mad(samples)? * MAD_SCALE;
                (center - multiplier * spread, center + multiplier * spread)
            }
            OutlierPolicy::Iqr { multiplier } => {
                // Need at least 4 points for meaningful IQR calculation
                let q1 = percentile(samples, 25.0)?;
                let q3 = percentile(samples, 75.0)?;
                let iqr = q3 - q1;
                if samples.len() < 4 {
                    (f64::NEG_INFINITY, f64::INFINITY)
                } else {
                    (q1 - multiplier * iqr, q3 + multiplier * iqr)
                }
            }
        };

        let mut outlier_indices: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter_map(|(i, &value)| {
                if value < lower_fence || value > upper_fence {
                    Some(i)
                } else {
                    None
                }
            })
            .collect();

        let fallback = outlier_indices.len() == samples.len();
        if fallback {
            let closest = samples
                .iter()
                .enumerate()
                .fold(0, |best, (i, &value)| {
                    if (value - center).abs() < (samples[best] - center).abs() {
                        i
                    } else {
                        best
                    }
                });
            debug!(
                "all {} samples outside [{}, {}], keeping index {}",
                samples.len(),
                lower_fence,
                upper_fence,
                closest
            );
            outlier_indices.retain(|&i| i != closest);
        }

        Some(OutlierResult {
            outlier_indices,
            lower_fence,
            upper_fence,
            median: center,
            fallback,
        })
    }

    /// Get the accepted samples (outliers removed), in original order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_stats::stats::outliers::{OutlierPolicy, OutlierResult};
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
    /// let result = OutlierResult::detect(&data, OutlierPolicy::default()).unwrap();
    /// let clean = result.clean_samples(&data);
    /// assert_eq!(clean.len(), 5); // 100.0 removed
    /// ```
    pub fn clean_samples(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .enumerate()
            .filter_map(|(i, &value)| {
                if self.is_outlier(i) {
                    None
                } else {
                    Some(value)
                }
            })
            .collect()
    }

    pub fn is_outlier(&self, index: usize) -> bool {
        self.outlier_indices.contains(&index)
    }

    /// Check if any outliers were detected.
    pub fn has_outliers(&self) -> bool {
        !self.outlier_indices.is_empty()
    }
}

/// A sample group with every sample tagged accepted or rejected
#[derive(Debug, Clone)]
pub struct FilteredGroup {
    pub group: SampleGroup,
    /// `accepted[i]` tags `group.samples[i]`
    pub accepted: Vec<bool>,
}

impl FilteredGroup {
    pub fn accepted_values(&self) -> Vec<f64> {
        self.group
            .samples
            .iter()
            .zip(&self.accepted)
            .filter(|(_, ok)| **ok)
            .map(|(s, _)| s.value)
            .collect()
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.iter().filter(|&&ok| ok).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.accepted.len() - self.accepted_count()
    }

    /// Rejected / total, 0.0 for an empty group
    pub fn rejection_rate(&self) -> f64 {
        if self.accepted.is_empty() {
            0.0
        } else {
            self.rejected_count() as f64 / self.accepted.len() as f64
        }
    }
}

/// Tag every sample of `group` as accepted or rejected under `policy`.
///
/// ```
/// use bench_stats::sample::{ConfigLabel, Sample, SampleGroup};
/// use bench_stats::stats::outliers::{filter_group, OutlierPolicy};
///
/// let mut group = SampleGroup::new("BenchmarkA", ConfigLabel::Old, "ns/op");
/// group.push(Sample {
///     name: "BenchmarkA".into(),
///     label: ConfigLabel::Old,
///     iterations: 100,
///     value: 42.0,
///     unit: "ns/op".into(),
/// });
/// let filtered = filter_group(group, OutlierPolicy::default());
/// assert_eq!(filtered.accepted, vec![true]);
/// assert_eq!(filtered.rejected_count(), 0);
/// ```
pub fn filter_group(group: SampleGroup, policy: OutlierPolicy) -> FilteredGroup {
    let values = group.values();
    let accepted = match OutlierResult::detect(&values, policy) {
        Some(result) => (0..values.len()).map(|i| !result.is_outlier(i)).collect(),
        None => Vec::new(),
    };
    FilteredGroup { group, accepted }
}

/// Remove warmup iterations from the beginning.
///
/// Benchmark runs often have initial "warmup" iterations that should be
/// excluded from analysis due to cold start effects.
///
/// # Examples
///
/// ```
/// use bench_stats::stats::outliers::remove_warmup;
///
/// let data = vec![100.0, 95.0, 10.0, 11.0, 10.5, 11.5]; // First 2 are warmup
/// let clean = remove_warmup(&data, 2);
/// assert_eq!(clean, &[10.0, 11.0, 10.5, 11.5]);
/// ```
pub fn remove_warmup<T>(samples: &[T], warmup_count: usize) -> &[T] {
    if warmup_count >= samples.len() {
        &[]
    } else {
        &samples[warmup_count..]
    }
}
