//! Analyzer configuration
//!
//! Settings come from built-in defaults, optionally overridden by a TOML
//! file, optionally overridden again by command-line flags.
//!
//! ```toml
//! [analysis]
//! inputs = 2
//! skip_first = 0
//!
//! [outliers]
//! policy = "mad"
//! threshold = 3.0
//!
//! [thresholds]
//! alpha = 0.05
//! max_variance_pct = 5.0
//! max_rejection_pct = 10.0
//! min_samples = 2
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::BenchStatsError;
use crate::stats::outliers::{OutlierPolicy, PolicyKind};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Input handling
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Outlier rejection policy
    #[serde(default)]
    pub outliers: OutliersConfig,
    /// Report flag thresholds
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A value is out of range
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use bench_stats::config::AnalyzerConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AnalyzerConfig::from_str(r#"
    ///     [outliers]
    ///     policy = "iqr"
    /// "#)?;
    /// assert_eq!(config.thresholds.alpha, 0.05);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<(), BenchStatsError> {
        if let Some(inputs) = self.analysis.inputs {
            if !(1..=2).contains(&inputs) {
                return Err(BenchStatsError::InvalidConfig(format!(
                    "analysis.inputs must be 1 or 2, got {}",
                    inputs
                )));
            }
        }

        if let Some(threshold) = self.outliers.threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(BenchStatsError::InvalidConfig(format!(
                    "outliers.threshold must be a non-negative number, got {}",
                    threshold
                )));
            }
        }

        let t = &self.thresholds;
        if !(t.alpha > 0.0 && t.alpha <= 1.0) {
            return Err(BenchStatsError::InvalidConfig(format!(
                "thresholds.alpha must be in (0, 1], got {}",
                t.alpha
            )));
        }
        for (name, value) in [
            ("max_variance_pct", t.max_variance_pct),
            ("max_rejection_pct", t.max_rejection_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BenchStatsError::InvalidConfig(format!(
                    "thresholds.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if t.min_samples < 2 {
            return Err(BenchStatsError::InvalidConfig(format!(
                "thresholds.min_samples must be at least 2, got {}",
                t.min_samples
            )));
        }

        Ok(())
    }

    /// The configured outlier policy
    pub fn outlier_policy(&self) -> OutlierPolicy {
        self.outliers.policy.with_multiplier(self.outliers.threshold)
    }
}

/// Input handling parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Expected number of inputs (1 or 2). Unset accepts either.
    #[serde(default)]
    pub inputs: Option<usize>,
    /// Leading samples of every group dropped as warm-up (default: 0)
    #[serde(default)]
    pub skip_first: usize,
}

/// Outlier rejection parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutliersConfig {
    /// Policy family (default: mad)
    #[serde(default)]
    pub policy: PolicyKind,
    /// Multiplier on the policy's spread measure. Unset uses 3.0 for mad
    /// and 1.5 for iqr.
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Thresholds that decide which report flags are raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// p-value above which a delta is "not significant" (default: 0.05)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Relative variance, in percent, above which a result is noisy (default: 5.0)
    #[serde(default = "default_max_variance_pct")]
    pub max_variance_pct: f64,
    /// Rejection rate, in percent, above which a result is unstable (default: 10.0)
    #[serde(default = "default_max_rejection_pct")]
    pub max_rejection_pct: f64,
    /// Accepted samples each side needs for a p-value (default: 2)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            max_variance_pct: default_max_variance_pct(),
            max_rejection_pct: default_max_rejection_pct(),
            min_samples: default_min_samples(),
        }
    }
}

fn default_alpha() -> f64 {
    0.05
}

fn default_max_variance_pct() -> f64 {
    5.0
}

fn default_max_rejection_pct() -> f64 {
    10.0
}

fn default_min_samples() -> usize {
    2
}
