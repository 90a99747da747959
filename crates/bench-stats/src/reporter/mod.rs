//! Report rendering
//!
//! This module turns an [`Analysis`] into text. Every format renders the same
//! rows; none of them recomputes statistics.
//!
//! # Output Formats
//!
//! - **Console**: Aligned plain-text tables, one per metric
//! - **Markdown**: GitHub-flavored tables for pull request comments
//! - **JSON**: Machine-readable format for CI integration
//!
//! # Example
//!
//! ```no_run
//! use bench_stats::reporter::{OutputFormat, Reporter};
//! use bench_stats::Analysis;
//!
//! # fn example(analysis: Analysis) -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Console);
//! reporter.report(&analysis)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::Json)
//!     .write_to_file(&analysis, "comparison.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod format;
mod json;
mod markdown;

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::analysis::Analysis;
use crate::error::BenchStatsError;

pub use console::ConsoleReporter;
pub use format::{delta_cell, format_value, metric_title, stat_cell};
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Aligned plain-text tables
    #[default]
    Console,
    /// Markdown format for documentation
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = BenchStatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            "console" => Ok(OutputFormat::Console),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(BenchStatsError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
            OutputFormat::Console => "console",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Reporter for analysis results
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report to stdout
    pub fn report(&self, analysis: &Analysis) -> Result<()> {
        let output = self.format_report(analysis)?;
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", output)?;
        stdout.flush()?;
        Ok(())
    }

    /// Write the report to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, analysis: &Analysis, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_report(analysis)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Format the report as a string
    pub fn format_report(&self, analysis: &Analysis) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(analysis, false),
            OutputFormat::JsonPretty => JsonReporter::format(analysis, true),
            OutputFormat::Console => ConsoleReporter::format(analysis),
            OutputFormat::Markdown => MarkdownReporter::format(analysis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;

    fn create_test_analysis() -> Analysis {
        let old = "pkg: example.com/fib\nBenchmarkFib20-4 30000 49000 ns/op\nBenchmarkFib20-4 30000 50000 ns/op\n";
        let new = "pkg: example.com/fib\nBenchmarkFib20-4 50000 31500 ns/op\nBenchmarkFib20-4 50000 32500 ns/op\n";
        Analyzer::default().analyze_inputs(&[("old.txt", old), ("new.txt", new)])
    }

    #[test]
    fn test_reporter_json_format() {
        let reporter = Reporter::new(OutputFormat::Json);
        let output = reporter.format_report(&create_test_analysis()).unwrap();

        assert!(output.contains("BenchmarkFib20-4"));
        assert!(output.contains("example.com/fib"));
    }

    #[test]
    fn test_reporter_console_format() {
        let reporter = Reporter::new(OutputFormat::Console);
        let output = reporter.format_report(&create_test_analysis()).unwrap();

        assert!(output.contains("pkg: example.com/fib"));
        assert!(output.contains("BenchmarkFib20-4"));
    }

    #[test]
    fn test_reporter_markdown_format() {
        let reporter = Reporter::new(OutputFormat::Markdown);
        let output = reporter.format_report(&create_test_analysis()).unwrap();

        assert!(output.contains("# "));
        assert!(output.contains("BenchmarkFib20-4"));
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Console);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("JSON-PRETTY".parse::<OutputFormat>().unwrap(), OutputFormat::JsonPretty);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::JsonPretty.to_string(), "json-pretty");
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!("bench-stats-report-{}.md", std::process::id()));
        Reporter::new(OutputFormat::Markdown)
            .write_to_file(&create_test_analysis(), &path)
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(written.starts_with("# Benchmark Comparison"));
    }
}
