//! Analysis pipeline
//!
//! Turns parsed samples into report rows: groups are filtered for outliers,
//! summarized, and, when exactly two inputs are present, compared.
//!
//! ```text
//!   LoadResult ──► groups ──► skip warm-up ──► outlier filter ──► Statistic
//!                                                                     │
//!                    Analysis ◄── rows + flags ◄── Comparison ◄───────┘
//! ```
//!
//! Groups are independent, but the pipeline runs them one after another and
//! only returns once every row is built. Rows keep the first-seen order of
//! benchmark names; tables are ordered with `ns/op` first and the other units
//! in first-seen order.
//!
//! # Example
//!
//! ```
//! use bench_stats::{Analyzer, AnalyzerConfig};
//!
//! let old = "BenchmarkFib20-4 30000 49000 ns/op\n\
//!            BenchmarkFib20-4 30000 49500 ns/op\n\
//!            BenchmarkFib20-4 30000 50000 ns/op\n";
//! let new = "BenchmarkFib20-4 50000 31500 ns/op\n\
//!            BenchmarkFib20-4 50000 32000 ns/op\n\
//!            BenchmarkFib20-4 50000 32500 ns/op\n";
//!
//! let analysis = Analyzer::new(AnalyzerConfig::default())
//!     .analyze_inputs(&[("old.txt", old), ("new.txt", new)]);
//! let row = analysis.row("BenchmarkFib20-4", "ns/op").unwrap();
//! let cmp = row.comparison.as_ref().unwrap();
//! assert!(cmp.delta_pct.unwrap() < -35.0);
//! assert!(cmp.significant);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{AnalyzerConfig, ThresholdsConfig};
use crate::loader::{load_blocks, LoadResult, SourceDiagnostics};
use crate::sample::{ConfigLabel, TIME_UNIT};
use crate::stats::{
    delta_percent, filter_group, geometric_mean, remove_warmup, Comparison, FilteredGroup,
    Statistic,
};

/// Result of analyzing all inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Configuration label of each input, in input order
    pub labels: Vec<ConfigLabel>,
    /// Header metadata shared by every input
    pub metadata: Vec<(String, String)>,
    /// One table per metric unit
    pub tables: Vec<MetricTable>,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    /// No input produced a reportable sample
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Exactly two inputs, so rows carry comparisons
    pub fn is_comparison(&self) -> bool {
        self.labels.len() == 2
    }

    pub fn table(&self, unit: &str) -> Option<&MetricTable> {
        self.tables.iter().find(|t| t.unit == unit)
    }

    pub fn row(&self, name: &str, unit: &str) -> Option<&Row> {
        self.table(unit)?.rows.iter().find(|r| r.name == name)
    }
}

/// All rows for one metric unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    pub unit: String,
    pub rows: Vec<Row>,
    /// Geometric mean over rows present in every input, when there are at least two
    pub geomean: Option<GeoMean>,
}

/// Geometric mean of the central values of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMean {
    /// One value per input label
    pub values: Vec<Option<f64>>,
    /// Change between the two geometric means, comparisons only
    pub delta_pct: Option<f64>,
    /// Rows that contributed
    pub rows: usize,
}

/// One benchmark/metric line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    pub unit: String,
    /// One entry per input label, `None` where the benchmark is absent
    pub stats: Vec<Option<Statistic>>,
    /// Present when two inputs both have the benchmark
    pub comparison: Option<Comparison>,
    pub flags: RowFlags,
}

/// Conditions the report must call out for a row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFlags {
    /// Relative variance above the threshold (or undefined) on some side
    pub noisy: bool,
    /// Rejection rate above the threshold on some side
    pub unstable: bool,
    /// p-value above the significance threshold
    pub not_significant: bool,
    /// Too few accepted samples for a p-value
    pub unreliable: bool,
    /// Zero baseline, so no percentage change exists
    pub undefined_delta: bool,
    /// In a comparison, the only side that has this benchmark
    pub only: Option<ConfigLabel>,
}

impl RowFlags {
    /// Human-readable flag names, in a fixed order
    pub fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if let Some(label) = &self.only {
            notes.push(format!("{} only", label));
        }
        if self.noisy {
            notes.push("noisy".to_string());
        }
        if self.unstable {
            notes.push("unstable".to_string());
        }
        if self.unreliable {
            notes.push("unreliable".to_string());
        }
        if self.not_significant {
            notes.push("not significant".to_string());
        }
        notes
    }
}

/// Parse and rejection counters for the whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub sources: Vec<SourceDiagnostics>,
    /// Samples that entered the outlier filter
    pub total_samples: usize,
    /// Samples the outlier filter rejected
    pub rejected_samples: usize,
    /// Samples dropped as warm-up before outlier filtering
    #[serde(default)]
    pub warmup_dropped: usize,
    /// `name [unit] (label)` of every group warm-up trimming left empty
    #[serde(default)]
    pub warmup_emptied: Vec<String>,
    /// `name [unit]` of every unstable row
    pub unstable: Vec<String>,
    /// `name [unit]` of every unreliable comparison
    pub unreliable: Vec<String>,
}

impl Diagnostics {
    pub fn rejection_rate(&self) -> f64 {
        if self.total_samples == 0 {
            0.0
        } else {
            self.rejected_samples as f64 / self.total_samples as f64
        }
    }
}

/// Runs the analysis pipeline under one configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse `(source, text)` inputs and analyze them
    pub fn analyze_inputs(&self, inputs: &[(&str, &str)]) -> Analysis {
        self.analyze(&load_blocks(inputs))
    }

    /// Analyze already parsed inputs
    #[instrument(skip(self, load), fields(inputs = load.blocks.len()))]
    pub fn analyze(&self, load: &LoadResult) -> Analysis {
        let labels = load.labels();
        let policy = self.config.outlier_policy();
        let skip = self.config.analysis.skip_first;

        let mut warmup_dropped = 0;
        let mut warmup_emptied = Vec::new();
        let mut filtered: Vec<FilteredGroup> = Vec::new();
        for mut group in load.groups() {
            if skip > 0 {
                let before = group.len();
                group.samples = remove_warmup(&group.samples, skip).to_vec();
                warmup_dropped += before - group.len();
            }
            if group.is_empty() {
                let key = format!("{} [{}] ({})", group.name, group.unit, group.label);
                debug!("{} has no samples after warm-up", key);
                warmup_emptied.push(key);
            } else {
                filtered.push(filter_group(group, policy));
            }
        }

        if !warmup_emptied.is_empty() {
            warn!(
                "Warm-up trimming emptied {} group(s): {}",
                warmup_emptied.len(),
                warmup_emptied.join(", ")
            );
        }

        let mut diagnostics = Diagnostics {
            sources: load.diagnostics(),
            total_samples: filtered.iter().map(|f| f.group.len()).sum(),
            rejected_samples: filtered.iter().map(FilteredGroup::rejected_count).sum(),
            warmup_dropped,
            warmup_emptied,
            ..Diagnostics::default()
        };

        let tables: Vec<MetricTable> = units_in_order(&filtered)
            .into_iter()
            .map(|unit| self.build_table(&unit, &labels, &filtered))
            .collect();

        for row in tables.iter().flat_map(|t| t.rows.iter()) {
            let key = format!("{} [{}]", row.name, row.unit);
            if row.flags.unstable {
                warn!("{}: more than {}% of samples rejected", key, self.config.thresholds.max_rejection_pct);
                diagnostics.unstable.push(key.clone());
            }
            if row.flags.unreliable {
                diagnostics.unreliable.push(key);
            }
        }

        info!(
            "Analyzed {} samples in {} table(s), {} rejected as outliers",
            diagnostics.total_samples,
            tables.len(),
            diagnostics.rejected_samples
        );

        Analysis {
            labels,
            metadata: load.common_metadata(),
            tables,
            diagnostics,
        }
    }

    fn build_table(
        &self,
        unit: &str,
        labels: &[ConfigLabel],
        filtered: &[FilteredGroup],
    ) -> MetricTable {
        let mut names: Vec<&str> = Vec::new();
        for f in filtered.iter().filter(|f| f.group.unit == unit) {
            if !names.contains(&f.group.name.as_str()) {
                names.push(&f.group.name);
            }
        }

        let rows: Vec<Row> = names
            .into_iter()
            .map(|name| {
                let groups: Vec<Option<&FilteredGroup>> = labels
                    .iter()
                    .map(|label| {
                        filtered.iter().find(|f| {
                            f.group.name == name && f.group.unit == unit && f.group.label == *label
                        })
                    })
                    .collect();
                build_row(name, unit, labels, &groups, &self.config.thresholds)
            })
            .collect();

        let geomean = table_geomean(&rows, labels.len());

        MetricTable {
            unit: unit.to_string(),
            rows,
            geomean,
        }
    }
}

fn units_in_order(filtered: &[FilteredGroup]) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    if filtered.iter().any(|f| f.group.unit == TIME_UNIT) {
        units.push(TIME_UNIT.to_string());
    }
    for f in filtered {
        if !units.contains(&f.group.unit) {
            units.push(f.group.unit.clone());
        }
    }
    units
}

fn build_row(
    name: &str,
    unit: &str,
    labels: &[ConfigLabel],
    groups: &[Option<&FilteredGroup>],
    thresholds: &ThresholdsConfig,
) -> Row {
    let stats: Vec<Option<Statistic>> = groups
        .iter()
        .map(|g| g.and_then(Statistic::from_group))
        .collect();

    let mut flags = RowFlags::default();
    for stat in stats.iter().flatten() {
        match stat.variance_pct {
            Some(v) if v <= thresholds.max_variance_pct => {}
            _ => flags.noisy = true,
        }
        if stat.rejection_rate() * 100.0 > thresholds.max_rejection_pct {
            flags.unstable = true;
        }
    }

    let mut comparison = None;
    if labels.len() == 2 {
        match (&stats[0], &stats[1], groups[0], groups[1]) {
            (Some(old), Some(new), Some(old_group), Some(new_group)) => {
                let cmp = Comparison::compute(
                    old,
                    new,
                    &old_group.accepted_values(),
                    &new_group.accepted_values(),
                    thresholds,
                );
                flags.unreliable = !cmp.is_reliable();
                flags.not_significant = cmp.is_reliable() && !cmp.significant;
                flags.undefined_delta = cmp.delta_pct.is_none();
                comparison = Some(cmp);
            }
            (Some(_), None, _, _) => flags.only = Some(labels[0].clone()),
            (None, Some(_), _, _) => flags.only = Some(labels[1].clone()),
            _ => {}
        }
    }

    Row {
        name: name.to_string(),
        unit: unit.to_string(),
        stats,
        comparison,
        flags,
    }
}

fn table_geomean(rows: &[Row], columns: usize) -> Option<GeoMean> {
    // Only rows with a positive central value in every column are comparable
    let complete: Vec<Vec<f64>> = rows
        .iter()
        .filter_map(|row| {
            row.stats
                .iter()
                .map(|s| s.as_ref().map(|s| s.central).filter(|&c| c > 0.0))
                .collect::<Option<Vec<f64>>>()
        })
        .collect();

    if complete.len() < 2 || columns == 0 {
        return None;
    }

    let values: Vec<Option<f64>> = (0..columns)
        .map(|col| {
            let column: Vec<f64> = complete.iter().map(|r| r[col]).collect();
            geometric_mean(&column)
        })
        .collect();

    let delta_pct = match values.as_slice() {
        [Some(old), Some(new)] => delta_percent(*old, *new),
        _ => None,
    };

    Some(GeoMean {
        values,
        delta_pct,
        rows: complete.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PolicyKind;

    fn lines(name: &str, unit: &str, values: &[f64]) -> String {
        values
            .iter()
            .map(|v| format!("{} 1000 {} {}\n", name, v, unit))
            .collect()
    }

    fn time_lines(name: &str, values: &[f64]) -> String {
        lines(name, "ns/op", values)
    }

    #[test]
    fn test_single_input_has_no_comparison() {
        let text = time_lines("BenchmarkA", &[10.0, 11.0, 12.0]);
        let analysis = Analyzer::default().analyze_inputs(&[("in", &text)]);

        assert!(!analysis.is_comparison());
        let row = analysis.row("BenchmarkA", "ns/op").unwrap();
        assert_eq!(row.stats.len(), 1);
        assert_eq!(row.stats[0].as_ref().unwrap().central, 11.0);
        assert!(row.comparison.is_none());
        assert_eq!(row.flags.only, None);
    }

    #[test]
    fn test_old_only_and_new_only() {
        let old = time_lines("BenchmarkGone", &[10.0, 11.0]) + &time_lines("BenchmarkBoth", &[5.0, 5.0]);
        let new = time_lines("BenchmarkBoth", &[5.0, 5.0]) + &time_lines("BenchmarkAdded", &[1.0, 1.0]);
        let analysis = Analyzer::default().analyze_inputs(&[("old", &old), ("new", &new)]);

        let gone = analysis.row("BenchmarkGone", "ns/op").unwrap();
        assert_eq!(gone.flags.only, Some(ConfigLabel::Old));
        assert!(gone.comparison.is_none());

        let added = analysis.row("BenchmarkAdded", "ns/op").unwrap();
        assert_eq!(added.flags.only, Some(ConfigLabel::New));

        let names: Vec<&str> = analysis.tables[0].rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["BenchmarkGone", "BenchmarkBoth", "BenchmarkAdded"]);
    }

    #[test]
    fn test_time_table_comes_first() {
        let text = "BenchmarkA 10 64 MB/s 100 ns/op\nBenchmarkA 10 64 MB/s 100 ns/op\n";
        let analysis = Analyzer::default().analyze_inputs(&[("in", text)]);
        let units: Vec<&str> = analysis.tables.iter().map(|t| t.unit.as_str()).collect();
        assert_eq!(units, vec!["ns/op", "MB/s"]);
    }

    #[test]
    fn test_noisy_flag() {
        // median 100, MAD 10 -> 10%
        let text = time_lines("BenchmarkNoisy", &[90.0, 100.0, 110.0]);
        let analysis = Analyzer::default().analyze_inputs(&[("in", &text)]);
        let row = analysis.row("BenchmarkNoisy", "ns/op").unwrap();
        assert!(row.flags.noisy);
        assert!(row.flags.notes().contains(&"noisy".to_string()));
    }

    #[test]
    fn test_unstable_flag_and_diagnostics() {
        let values = [100.0, 101.0, 99.0, 100.0, 102.0, 100.0, 101.0, 400.0];
        let text = time_lines("BenchmarkSpiky", &values);
        let analysis = Analyzer::default().analyze_inputs(&[("in", &text)]);

        let row = analysis.row("BenchmarkSpiky", "ns/op").unwrap();
        assert!(row.flags.unstable);
        assert_eq!(row.stats[0].as_ref().unwrap().rejected, 1);
        assert_eq!(analysis.diagnostics.rejected_samples, 1);
        assert_eq!(analysis.diagnostics.total_samples, 8);
        assert_eq!(analysis.diagnostics.unstable, vec!["BenchmarkSpiky [ns/op]".to_string()]);
    }

    #[test]
    fn test_none_policy_disables_rejection() {
        let mut config = AnalyzerConfig::default();
        config.outliers.policy = PolicyKind::None;
        let values = [100.0, 101.0, 99.0, 100.0, 102.0, 100.0, 101.0, 400.0];
        let text = time_lines("BenchmarkSpiky", &values);
        let analysis = Analyzer::new(config).analyze_inputs(&[("in", &text)]);

        let row = analysis.row("BenchmarkSpiky", "ns/op").unwrap();
        assert!(!row.flags.unstable);
        assert_eq!(analysis.diagnostics.rejected_samples, 0);
    }

    #[test]
    fn test_skip_first_drops_warmup() {
        let mut config = AnalyzerConfig::default();
        config.analysis.skip_first = 1;
        let text = time_lines("BenchmarkA", &[500.0, 10.0, 11.0, 12.0]);
        let analysis = Analyzer::new(config).analyze_inputs(&[("in", &text)]);

        let stat = analysis.row("BenchmarkA", "ns/op").unwrap().stats[0].clone().unwrap();
        assert_eq!(stat.total(), 3);
        assert_eq!(stat.central, 11.0);
    }

    #[test]
    fn test_skip_first_can_empty_a_group() {
        let mut config = AnalyzerConfig::default();
        config.analysis.skip_first = 5;
        let text = time_lines("BenchmarkA", &[10.0, 11.0]);
        let analysis = Analyzer::new(config).analyze_inputs(&[("in", &text)]);
        assert!(analysis.is_empty());
        assert_eq!(analysis.diagnostics.warmup_dropped, 2);
        assert_eq!(analysis.diagnostics.warmup_emptied, vec!["BenchmarkA [ns/op] (#0)".to_string()]);
    }

    #[test]
    fn test_warmup_counts_reach_diagnostics() {
        let mut config = AnalyzerConfig::default();
        config.analysis.skip_first = 1;
        let old = time_lines("BenchmarkA", &[10.0]) + &time_lines("BenchmarkB", &[500.0, 20.0, 21.0]);
        let new = time_lines("BenchmarkA", &[12.0]) + &time_lines("BenchmarkB", &[20.0, 22.0]);
        let analysis = Analyzer::new(config).analyze_inputs(&[("old", &old), ("new", &new)]);

        assert_eq!(analysis.diagnostics.warmup_dropped, 4);
        assert_eq!(
            analysis.diagnostics.warmup_emptied,
            vec!["BenchmarkA [ns/op] (old)".to_string(), "BenchmarkA [ns/op] (new)".to_string()]
        );
        assert_eq!(analysis.diagnostics.total_samples, 3);
        assert!(analysis.row("BenchmarkA", "ns/op").is_none());
        assert!(analysis.row("BenchmarkB", "ns/op").is_some());
    }

    #[test]
    fn test_quantized_spikes_flag_unstable() {
        let mut values = vec![100.0; 8];
        values.extend([5000.0, 6000.0]);
        let text = time_lines("BenchmarkSpiky", &values);
        let analysis = Analyzer::default().analyze_inputs(&[("in", &text)]);

        let row = analysis.row("BenchmarkSpiky", "ns/op").unwrap();
        let stat = row.stats[0].as_ref().unwrap();
        assert_eq!(stat.accepted, 8);
        assert_eq!(stat.rejected, 2);
        assert_eq!(stat.central, 100.0);
        assert!(row.flags.unstable);
        assert!(row.flags.notes().contains(&"unstable".to_string()));
        assert_eq!(analysis.diagnostics.rejected_samples, 2);
    }

    #[test]
    fn test_undefined_delta_flag() {
        let old ="BenchmarkA 10 5 ns/op 0 allocs/op\nBenchmarkA 10 5 ns/op 0 allocs/op\n";
        let new = "BenchmarkA 10 5 ns/op 2 allocs/op\nBenchmarkA 10 5 ns/op 2 allocs/op\n";
        let analysis = Analyzer::default().analyze_inputs(&[("old", old), ("new", new)]);

        let row = analysis.row("BenchmarkA", "allocs/op").unwrap();
        assert!(row.flags.undefined_delta);
        assert_eq!(row.comparison.as_ref().unwrap().delta_pct, None);
    }

    #[test]
    fn test_geomean() {
        let old = time_lines("BenchmarkA", &[2.0, 2.0]) + &time_lines("BenchmarkB", &[8.0, 8.0]);
        let new = time_lines("BenchmarkA", &[1.0, 1.0]) + &time_lines("BenchmarkB", &[4.0, 4.0]);
        let analysis = Analyzer::default().analyze_inputs(&[("old", &old), ("new", &new)]);

        let geomean = analysis.tables[0].geomean.as_ref().unwrap();
        assert_eq!(geomean.rows, 2);
        assert!((geomean.values[0].unwrap() - 4.0).abs() < 1e-9);
        assert!((geomean.values[1].unwrap() - 2.0).abs() < 1e-9);
        assert!((geomean.delta_pct.unwrap() + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_geomean_needs_two_rows() {
        let text = time_lines("BenchmarkA", &[2.0, 2.0]);
        let analysis = Analyzer::default().analyze_inputs(&[("in", &text)]);
        assert!(analysis.tables[0].geomean.is_none());
    }

    #[test]
    fn test_empty_input() {
        let analysis = Analyzer::default().analyze_inputs(&[("old", ""), ("new", "PASS\n")]);
        assert!(analysis.is_empty());
        assert_eq!(analysis.diagnostics.sources.len(), 2);
        assert_eq!(analysis.diagnostics.sources[1].skipped, 1);
    }
}
