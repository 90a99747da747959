//! Markdown reporter for pasting comparisons into pull requests

use anyhow::Result;
use std::fmt::Write;

use super::format::{
    column_alignments, geomean_cells, header_cells, metric_title, rejection_line, row_cells,
    source_line, warmup_line, Align,
};
use crate::analysis::Analysis;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Format an analysis as GitHub-flavored Markdown
    pub fn format(analysis: &Analysis) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Benchmark Comparison")?;
        writeln!(output)?;

        if !analysis.metadata.is_empty() {
            for (key, value) in &analysis.metadata {
                writeln!(output, "- **{}**: {}", key, value)?;
            }
            writeln!(output)?;
        }

        if analysis.is_empty() {
            writeln!(output, "_No benchmark samples found._")?;
            writeln!(output)?;
        }

        let aligns = column_alignments(analysis);
        for table in &analysis.tables {
            writeln!(output, "## {}", metric_title(&table.unit))?;
            writeln!(output)?;

            Self::write_row(&mut output, &header_cells(analysis, &table.unit))?;
            let rule: Vec<String> = aligns
                .iter()
                .map(|a| match a {
                    Align::Left => "---".to_string(),
                    Align::Right => "---:".to_string(),
                })
                .collect();
            Self::write_row(&mut output, &rule)?;

            for row in &table.rows {
                Self::write_row(&mut output, &row_cells(analysis, row))?;
            }
            if let Some(geomean) = &table.geomean {
                Self::write_row(&mut output, &geomean_cells(analysis, &table.unit, geomean))?;
            }
            writeln!(output)?;
        }

        writeln!(output, "## Diagnostics")?;
        writeln!(output)?;
        for source in &analysis.diagnostics.sources {
            writeln!(output, "- {}", source_line(source))?;
        }
        if let Some(line) = warmup_line(analysis) {
            writeln!(output, "- {}", line)?;
        }
        writeln!(output, "- {}", rejection_line(analysis))?;
        for key in &analysis.diagnostics.unstable {
            writeln!(output, "- ⚠️ unstable: {}", key)?;
        }
        for key in &analysis.diagnostics.unreliable {
            writeln!(output, "- ⚠️ unreliable: {}", key)?;
        }

        Ok(output)
    }

    fn write_row(output: &mut String, cells: &[String]) -> Result<()> {
        let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
        writeln!(output, "| {} |", escaped.join(" | "))?;
        Ok(())
    }
}
