//! Statistical comparison of Go-style benchmark results
//!
//! This crate reads benchmark output in the Go `testing` text format, rejects
//! outliers, summarizes every benchmark with robust statistics and reports
//! whether a change between two runs is statistically meaningful.
//!
//! # Features
//!
//! - **Lenient Parsing**: Unrecognized lines are counted and skipped, never fatal
//! - **Outlier Rejection**: MAD or IQR fences, always keeping at least one sample
//! - **Robust Statistics**: Median with MAD-based relative variance
//! - **Significance Testing**: Two-sided Mann-Whitney U test
//! - **Multiple Output Formats**: Console, Markdown and JSON reports
//!
//! # Example
//!
//! ```
//! use bench_stats::{Analyzer, AnalyzerConfig, OutputFormat, Reporter};
//!
//! # fn example() -> anyhow::Result<()> {
//! let old = "BenchmarkFib20-4 30000 49000 ns/op\n\
//!            BenchmarkFib20-4 30000 49500 ns/op\n\
//!            BenchmarkFib20-4 30000 50000 ns/op\n";
//! let new = "BenchmarkFib20-4 50000 31500 ns/op\n\
//!            BenchmarkFib20-4 50000 32000 ns/op\n\
//!            BenchmarkFib20-4 50000 32500 ns/op\n";
//!
//! let analysis = Analyzer::new(AnalyzerConfig::default())
//!     .analyze_inputs(&[("old.txt", old), ("new.txt", new)]);
//!
//! let report = Reporter::new(OutputFormat::Console).format_report(&analysis)?;
//! assert!(report.contains("-35.35% (p=0.050 n=3+3)"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Configuration
//!
//! Thresholds and the outlier policy can be set from a TOML file:
//!
//! ```toml
//! [outliers]
//! policy = "iqr"
//! threshold = 1.5
//!
//! [thresholds]
//! alpha = 0.01
//! max_variance_pct = 5.0
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod reporter;
pub mod sample;
pub mod stats;

// Re-export main types for convenience
pub use analysis::{Analysis, Analyzer, Diagnostics, GeoMean, MetricTable, Row, RowFlags};
pub use config::AnalyzerConfig;
pub use error::BenchStatsError;
pub use loader::{load_blocks, LoadResult};
pub use reporter::{OutputFormat, Reporter};
pub use sample::{ConfigLabel, Sample, SampleGroup};
