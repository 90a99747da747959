//! Parsing of benchmark result listings
//!
//! Input is the plain-text output of a benchmarking harness, one result per
//! line:
//!
//! ```text
//! goos: linux
//! pkg: example.com/fib
//! BenchmarkFib20-4    30000    46408 ns/op    0 B/op    0 allocs/op
//! PASS
//! ```
//!
//! Parsing is defensive. Lines that do not look like results are skipped,
//! lines that look like results but carry bad numbers are counted as
//! malformed, and neither aborts the batch.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sample::{ConfigLabel, Sample, SampleGroup};

lazy_static! {
    /// `key: value` header lines such as `goos: linux` or `pkg: example.com/fib`
    static ref HEADER_LINE: Regex = Regex::new(r"^([a-z][A-Za-z0-9_-]*):(?:\s+(.*))?$").unwrap();
}

/// Why a well-shaped result line was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    Iterations,
    Value,
    MissingTime,
}

/// Classification of a single input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Blank,
    Header(String, String),
    Samples(Vec<Sample>),
    Skipped,
    Malformed(MalformedReason),
}

/// Parse one line into samples, one per `<value> <unit>` pair.
///
/// # Examples
///
/// ```
/// use bench_stats::loader::{parse_line, LineOutcome};
/// use bench_stats::sample::ConfigLabel;
///
/// let outcome = parse_line("BenchmarkFib20-4  30000  46408 ns/op", &ConfigLabel::Old);
/// match outcome {
///     LineOutcome::Samples(samples) => {
///         assert_eq!(samples[0].name, "BenchmarkFib20-4");
///         assert_eq!(samples[0].iterations, 30000);
///         assert_eq!(samples[0].value, 46408.0);
///         assert_eq!(samples[0].unit, "ns/op");
///     }
///     other => panic!("unexpected outcome: {:?}", other),
/// }
/// ```
pub fn parse_line(line: &str, label: &ConfigLabel) -> LineOutcome {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Blank;
    }

    if let Some(caps) = HEADER_LINE.captures(line) {
        let key = caps[1].to_string();
        let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        return LineOutcome::Header(key, value.to_string());
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 || (tokens.len() - 2) % 2 != 0 {
        return LineOutcome::Skipped;
    }

    let name = tokens[0];
    let iterations = tokens[1];
    // Other names must look like a result line: numeric iterations, `x/y` units
    if !name.starts_with("Benchmark")
        && (!iterations.bytes().all(|b| b.is_ascii_digit())
            || !tokens[3..].iter().step_by(2).all(|unit| unit.contains('/')))
    {
        return LineOutcome::Skipped;
    }

    let iterations: u64 = match iterations.parse() {
        Ok(n) => n,
        Err(_) => return LineOutcome::Malformed(MalformedReason::Iterations),
    };

    let mut samples = Vec::with_capacity((tokens.len() - 2) / 2);
    for pair in tokens[2..].chunks(2) {
        let value = match pair[0].parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return LineOutcome::Malformed(MalformedReason::Value),
        };
        samples.push(Sample {
            name: name.to_string(),
            label: label.clone(),
            iterations,
            value,
            unit: pair[1].to_string(),
        });
    }

    if !samples.iter().any(Sample::is_time) {
        return LineOutcome::Malformed(MalformedReason::MissingTime);
    }

    LineOutcome::Samples(samples)
}

/// Per-input parse counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDiagnostics {
    /// Where the block came from (file name, `<stdin>`, ...)
    pub source: String,
    pub label: ConfigLabel,
    /// Non-blank lines read
    pub lines: usize,
    /// Samples produced
    pub samples: usize,
    /// Lines that did not have the shape of a result line
    pub skipped: usize,
    /// Result lines dropped because of bad numbers or a missing time column
    pub malformed: usize,
}

/// Samples and header metadata parsed from one input block
#[derive(Debug, Clone)]
pub struct ParsedBlock {
    pub label: ConfigLabel,
    pub samples: Vec<Sample>,
    /// Header `key: value` pairs in input order; later keys overwrite earlier ones
    pub metadata: Vec<(String, String)>,
    pub diagnostics: SourceDiagnostics,
}

/// Parse a whole input block under one configuration label
pub fn parse_block(source: &str, text: &str, label: ConfigLabel) -> ParsedBlock {
    let mut samples = Vec::new();
    let mut metadata: Vec<(String, String)> = Vec::new();
    let mut diagnostics = SourceDiagnostics {
        source: source.to_string(),
        label: label.clone(),
        lines: 0,
        samples: 0,
        skipped: 0,
        malformed: 0,
    };

    for (lineno, line) in text.lines().enumerate() {
        match parse_line(line, &label) {
            LineOutcome::Blank => continue,
            LineOutcome::Header(key, value) => {
                match metadata.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => metadata.push((key, value)),
                }
            }
            LineOutcome::Samples(parsed) => samples.extend(parsed),
            LineOutcome::Skipped => diagnostics.skipped += 1,
            LineOutcome::Malformed(reason) => {
                debug!("{}:{}: malformed result line ({:?})", source, lineno + 1, reason);
                diagnostics.malformed += 1;
            }
        }
        diagnostics.lines += 1;
    }

    diagnostics.samples = samples.len();
    if diagnostics.malformed > 0 {
        warn!(
            "{}: skipped {} malformed result line(s)",
            source, diagnostics.malformed
        );
    }
    debug!(
        "{}: {} samples from {} lines ({} skipped)",
        source, diagnostics.samples, diagnostics.lines, diagnostics.skipped
    );

    ParsedBlock {
        label,
        samples,
        metadata,
        diagnostics,
    }
}

/// Parse several named input blocks, labelling them by position.
///
/// Two blocks are labelled `old` and `new`; any other count gets positional
/// labels `#0`, `#1`, ...
///
/// # Examples
///
/// ```
/// use bench_stats::loader::load_blocks;
/// use bench_stats::sample::ConfigLabel;
///
/// let result = load_blocks(&[
///     ("old.txt", "BenchmarkA 100 20 ns/op\n"),
///     ("new.txt", "BenchmarkA 100 10 ns/op\n"),
/// ]);
/// assert_eq!(result.labels(), vec![ConfigLabel::Old, ConfigLabel::New]);
/// assert_eq!(result.sample_count(), 2);
/// ```
pub fn load_blocks(inputs: &[(&str, &str)]) -> LoadResult {
    let total = inputs.len();
    let blocks = inputs
        .iter()
        .enumerate()
        .map(|(i, (source, text))| parse_block(source, text, ConfigLabel::for_position(i, total)))
        .collect();
    LoadResult { blocks }
}

/// Everything parsed from all inputs
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub blocks: Vec<ParsedBlock>,
}

impl LoadResult {
    /// True when no input produced a single sample. This is a state, not an
    /// error; callers decide whether it is fatal.
    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    pub fn sample_count(&self) -> usize {
        self.blocks.iter().map(|b| b.samples.len()).sum()
    }

    pub fn labels(&self) -> Vec<ConfigLabel> {
        self.blocks.iter().map(|b| b.label.clone()).collect()
    }

    pub fn diagnostics(&self) -> Vec<SourceDiagnostics> {
        self.blocks.iter().map(|b| b.diagnostics.clone()).collect()
    }

    /// Metadata shared by every block with the same value, in first-seen order
    pub fn common_metadata(&self) -> Vec<(String, String)> {
        let Some(first) = self.blocks.first() else {
            return Vec::new();
        };
        first
            .metadata
            .iter()
            .filter(|(key, value)| {
                self.blocks[1..]
                    .iter()
                    .all(|b| b.metadata.iter().any(|(k, v)| k == key && v == value))
            })
            .cloned()
            .collect()
    }

    /// Group samples by (name, label, unit) in first-seen order.
    ///
    /// Blocks are scanned in input order, so benchmarks present only in a
    /// later block are appended after those of earlier blocks.
    pub fn groups(&self) -> Vec<SampleGroup> {
        let mut groups: Vec<SampleGroup> = Vec::new();
        for sample in self.blocks.iter().flat_map(|b| b.samples.iter()) {
            match groups.iter_mut().find(|g| g.accepts(sample)) {
                Some(group) => {
                    group.push(sample.clone());
                }
                None => {
                    let mut group =
                        SampleGroup::new(sample.name.clone(), sample.label.clone(), sample.unit.clone());
                    group.push(sample.clone());
                    groups.push(group);
                }
            }
        }
        groups
    }
}
