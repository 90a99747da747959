//! Benchmark samples and sample groups
//!
//! A [`Sample`] is one measured value of one metric, taken from one result
//! line of one input. Samples that share a benchmark name, configuration
//! label and unit form a [`SampleGroup`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of the mandatory time-per-operation column
pub const TIME_UNIT: &str = "ns/op";

/// Configuration label assigned to an input block
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigLabel {
    /// Baseline input when exactly two inputs are compared
    Old,
    /// Candidate input when exactly two inputs are compared
    New,
    /// Positional label for any other input count
    Index(usize),
}

impl ConfigLabel {
    /// Label for the block at `index` out of `total` blocks.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_stats::sample::ConfigLabel;
    ///
    /// assert_eq!(ConfigLabel::for_position(0, 2), ConfigLabel::Old);
    /// assert_eq!(ConfigLabel::for_position(1, 2), ConfigLabel::New);
    /// assert_eq!(ConfigLabel::for_position(0, 1), ConfigLabel::Index(0));
    /// ```
    pub fn for_position(index: usize, total: usize) -> Self {
        match (total, index) {
            (2, 0) => ConfigLabel::Old,
            (2, 1) => ConfigLabel::New,
            _ => ConfigLabel::Index(index),
        }
    }
}

impl fmt::Display for ConfigLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLabel::Old => write!(f, "old"),
            ConfigLabel::New => write!(f, "new"),
            ConfigLabel::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// One measured value of one benchmark metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Full benchmark name, including any parameter suffix such as `-4`
    pub name: String,
    /// Configuration the sample was measured under
    pub label: ConfigLabel,
    /// Iteration count reported by the harness (informational)
    pub iterations: u64,
    /// Measured value, in `unit`
    pub value: f64,
    /// Metric unit, e.g. `ns/op`, `B/op`, `allocs/op`
    pub unit: String,
}

impl Sample {
    pub fn is_time(&self) -> bool {
        self.unit == TIME_UNIT
    }
}

/// Re-serializes the structured fields in result-line form.
impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name, self.iterations, self.value, self.unit
        )
    }
}

/// Samples sharing a benchmark name, configuration label and unit, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub name: String,
    pub label: ConfigLabel,
    pub unit: String,
    pub samples: Vec<Sample>,
}

impl SampleGroup {
    pub fn new(name: impl Into<String>, label: ConfigLabel, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label,
            unit: unit.into(),
            samples: Vec::new(),
        }
    }

    /// Whether `sample` belongs in this group
    pub fn accepts(&self, sample: &Sample) -> bool {
        sample.name == self.name && sample.label == self.label && sample.unit == self.unit
    }

    /// Append a sample. Returns `false` and leaves the group untouched when the
    /// sample's name, label or unit differ from the group's.
    pub fn push(&mut self, sample: Sample) -> bool {
        if !self.accepts(&sample) {
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
