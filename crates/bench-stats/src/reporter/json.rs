//! JSON reporter

use crate::analysis::Analysis;
use anyhow::Result;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format an analysis as JSON
    ///
    /// # Arguments
    ///
    /// * `analysis` - The analysis to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(analysis: &Analysis, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(analysis)?
        } else {
            serde_json::to_string(analysis)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;

    fn create_test_analysis() -> Analysis {
        let old = "BenchmarkA 10 100 ns/op\nBenchmarkA 10 100 ns/op\n";
        let new = "BenchmarkA 10 0 ns/op\nBenchmarkA 10 1 ns/op\n";
        Analyzer::default().analyze_inputs(&[("old.txt", old), ("new.txt", new)])
    }

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&create_test_analysis(), false).unwrap();

        // Compact JSON should not have newlines
        assert!(!output.contains('\n'));
        assert!(output.contains("\"name\":\"BenchmarkA\""));
        assert!(output.contains("\"labels\":[\"old\",\"new\"]"));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&create_test_analysis(), true).unwrap();

        // Pretty JSON should have indentation
        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_json_roundtrip() {
        let analysis = create_test_analysis();
        let json = JsonReporter::format(&analysis, false).unwrap();
        let parsed: Analysis = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.labels, analysis.labels);
        assert_eq!(parsed.tables.len(), analysis.tables.len());
        assert_eq!(parsed.tables[0].rows[0].name, "BenchmarkA");
        assert_eq!(parsed.diagnostics.total_samples, analysis.diagnostics.total_samples);
    }

    #[test]
    fn test_json_undefined_values_are_null() {
        let old = "BenchmarkA 10 0 allocs/op 5 ns/op\nBenchmarkA 10 0 allocs/op 5 ns/op\n";
        let new = "BenchmarkA 10 1 allocs/op 5 ns/op\nBenchmarkA 10 1 allocs/op 5 ns/op\n";
        let analysis = Analyzer::default().analyze_inputs(&[("old.txt", old), ("new.txt", new)]);
        let output = JsonReporter::format(&analysis, false).unwrap();

        assert!(output.contains("\"delta_pct\":null"));
        assert!(!output.contains("NaN"));
        assert!(!output.contains("inf"));
    }
}
