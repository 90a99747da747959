//! Statistical analysis of benchmark samples
//!
//! This module provides the statistics engine: percentile and spread
//! calculations, outlier rejection, per-group summaries and the rank-based
//! comparison of two groups.
//!
//! # Examples
//!
//! ```
//! use bench_stats::stats::{OutlierPolicy, OutlierResult, Statistic};
//!
//! let samples = vec![10.0, 11.0, 10.5, 11.5, 12.0, 11.0, 150.0];
//!
//! // Detect outliers
//! let outliers = OutlierResult::detect(&samples, OutlierPolicy::default()).unwrap();
//! let accepted = outliers.clean_samples(&samples);
//!
//! // Summarize what is left
//! let stat = Statistic::from_accepted(&accepted, outliers.outlier_indices.len()).unwrap();
//! println!("median: {}, ±{:.1}%", stat.central, stat.variance_pct.unwrap());
//! ```

pub mod compare;
pub mod outliers;
pub mod percentiles;
pub mod summary;
pub mod utest;

// Re-export main types and functions
pub use compare::{delta_percent, geometric_mean, Comparison};
pub use outliers::{filter_group, remove_warmup, FilteredGroup, OutlierPolicy, OutlierResult, PolicyKind};
pub use percentiles::{mad, median, percentile, PercentileSummary};
pub use summary::Statistic;
pub use utest::{mann_whitney_u, UTestResult};
