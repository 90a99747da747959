//! Console reporter
//!
//! Plain aligned tables, one per metric unit, followed by a diagnostics
//! summary. Output is deterministic: no colors, no timestamps.

use anyhow::Result;
use std::fmt::Write;

use super::format::{
    column_alignments, geomean_cells, header_cells, rejection_line, row_cells, source_line,
    text_table, warmup_line,
};
use crate::analysis::Analysis;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format an analysis for terminal output
    pub fn format(analysis: &Analysis) -> Result<String> {
        let mut output = String::new();

        for (key, value) in &analysis.metadata {
            writeln!(output, "{}: {}", key, value)?;
        }
        if !analysis.metadata.is_empty() {
            writeln!(output)?;
        }

        if analysis.is_empty() {
            writeln!(output, "no benchmark samples found")?;
            writeln!(output)?;
        }

        let aligns = column_alignments(analysis);
        for table in &analysis.tables {
            let mut rows = vec![header_cells(analysis, &table.unit)];
            rows.extend(table.rows.iter().map(|row| row_cells(analysis, row)));
            if let Some(geomean) = &table.geomean {
                rows.push(geomean_cells(analysis, &table.unit, geomean));
            }
            output.push_str(&text_table(&rows, &aligns));
            writeln!(output)?;
        }

        Self::format_diagnostics(&mut output, analysis)?;
        Ok(output)
    }

    fn format_diagnostics(output: &mut String, analysis: &Analysis) -> Result<()> {
        let d = &analysis.diagnostics;
        writeln!(output, "Diagnostics:")?;
        for source in &d.sources {
            writeln!(output, "  {}", source_line(source))?;
        }
        if let Some(line) = warmup_line(analysis) {
            writeln!(output, "  {}", line)?;
        }
        writeln!(output, "  {}", rejection_line(analysis))?;
        if !d.unstable.is_empty() {
            writeln!(output, "  unstable: {}", d.unstable.join(", "))?;
        }
        if !d.unreliable.is_empty() {
            writeln!(output, "  unreliable: {}", d.unreliable.join(", "))?;
        }
        Ok(())
    }
}
