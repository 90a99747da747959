//! Cell formatting shared by the text reporters

use crate::analysis::{Analysis, GeoMean, Row};
use crate::loader::SourceDiagnostics;
use crate::stats::{Comparison, Statistic};

/// Column title for a metric unit
pub fn metric_title(unit: &str) -> &str {
    match unit {
        "ns/op" => "time/op",
        "B/op" => "alloc/op",
        "MB/s" => "speed",
        other => other,
    }
}

/// Value scaled into a readable unit, three significant digits
///
/// ```
/// use bench_stats::reporter::format_value;
///
/// assert_eq!(format_value(49_500.0, "ns/op"), "49.5µs");
/// assert_eq!(format_value(1536.0, "B/op"), "1.50KiB");
/// assert_eq!(format_value(12.0, "allocs/op"), "12.0");
/// ```
pub fn format_value(value: f64, unit: &str) -> String {
    match unit {
        "ns/op" => {
            let (scaled, suffix) = scale(value, 1000.0, &["ns", "µs", "ms", "s"]);
            format!("{}{}", significant(scaled), suffix)
        }
        "B/op" => {
            let (scaled, suffix) = scale(value, 1024.0, &["B", "KiB", "MiB", "GiB"]);
            format!("{}{}", significant(scaled), suffix)
        }
        "MB/s" => format!("{}MB/s", significant(value)),
        _ => significant(value),
    }
}

fn scale<'a>(value: f64, step: f64, suffixes: &[&'a str]) -> (f64, &'a str) {
    let mut scaled = value;
    let mut index = 0;
    // Compare the printed value, so 999.7ns becomes 1.00µs rather than 1000ns
    while rounded(scaled).0.abs() >= step && index + 1 < suffixes.len() {
        scaled /= step;
        index += 1;
    }
    (scaled, suffixes[index])
}

fn decimals(magnitude: f64) -> usize {
    if magnitude >= 100.0 {
        0
    } else if magnitude >= 10.0 {
        1
    } else {
        2
    }
}

/// `value` rounded to the decimals it is printed with, and those decimals.
///
/// Rounding can carry into the next digit (99.96 to 100), which then needs
/// fewer decimals.
fn rounded(value: f64) -> (f64, usize) {
    let round_to = |digits: usize| {
        let factor = 10f64.powi(digits as i32);
        (value * factor).round() / factor
    };
    let first = decimals(value.abs());
    let digits = decimals(round_to(first).abs());
    (round_to(digits), digits)
}

fn significant(value: f64) -> String {
    let (value, digits) = rounded(value);
    format!("{:.*}", digits, value)
}

/// `49.5µs ± 1%`, or `± ?` when the variance is undefined
pub fn stat_cell(stat: &Statistic, unit: &str) -> String {
    match stat.variance_pct {
        Some(v) => format!("{} ± {:.0}%", format_value(stat.central, unit), v),
        None => format!("{} ± ?", format_value(stat.central, unit)),
    }
}

/// Delta column text for a comparison
pub fn delta_cell(cmp: &Comparison) -> String {
    let n = format!("n={}+{}", cmp.n_old, cmp.n_new);
    match (cmp.delta_pct, cmp.p_value) {
        (None, _) => "(undefined delta)".to_string(),
        (Some(_), None) => format!("(unreliable {})", n),
        (Some(delta), Some(p)) if cmp.significant => format!("{:+.2}% (p={:.3} {})", delta, p, n),
        (Some(_), Some(p)) => format!("~ (p={:.3} {})", p, n),
    }
}

/// Header cells for a table of `unit`
pub fn header_cells(analysis: &Analysis, unit: &str) -> Vec<String> {
    let title = metric_title(unit);
    let mut cells = vec!["name".to_string()];
    if analysis.labels.len() == 1 {
        cells.push(title.to_string());
    } else {
        cells.extend(analysis.labels.iter().map(|l| format!("{} {}", l, title)));
    }
    if analysis.is_comparison() {
        cells.push("delta".to_string());
    }
    cells.push("note".to_string());
    cells
}

/// Body cells for one row, aligned with [`header_cells`]
pub fn row_cells(analysis: &Analysis, row: &Row) -> Vec<String> {
    let mut cells = vec![row.name.clone()];
    cells.extend(row.stats.iter().map(|s| match s {
        Some(stat) => stat_cell(stat, &row.unit),
        None => String::new(),
    }));
    if analysis.is_comparison() {
        cells.push(row.comparison.as_ref().map(delta_cell).unwrap_or_default());
    }
    cells.push(row.flags.notes().join(", "));
    cells
}

/// The `[Geo mean]` line of a table
pub fn geomean_cells(analysis: &Analysis, unit: &str, geomean: &GeoMean) -> Vec<String> {
    let mut cells = vec!["[Geo mean]".to_string()];
    cells.extend(geomean.values.iter().map(|v| match v {
        Some(v) => format_value(*v, unit),
        None => String::new(),
    }));
    if analysis.is_comparison() {
        cells.push(
            geomean
                .delta_pct
                .map(|d| format!("{:+.2}%", d))
                .unwrap_or_default(),
        );
    }
    cells.push(String::new());
    cells
}

/// `old.txt (old): 8 lines, 5 samples, 2 skipped, 0 malformed`
pub fn source_line(source: &SourceDiagnostics) -> String {
    format!(
        "{} ({}): {} lines, {} samples, {} skipped, {} malformed",
        source.source, source.label, source.lines, source.samples, source.skipped, source.malformed
    )
}

/// `rejected 1 of 8 samples as outliers (12.5%)`
pub fn rejection_line(analysis: &Analysis) -> String {
    let d = &analysis.diagnostics;
    format!(
        "rejected {} of {} samples as outliers ({:.1}%)",
        d.rejected_samples,
        d.total_samples,
        d.rejection_rate() * 100.0
    )
}

/// `dropped 2 warm-up samples, emptied BenchmarkA [ns/op] (old)`, or `None`
/// when nothing was dropped
pub fn warmup_line(analysis: &Analysis) -> Option<String> {
    let d = &analysis.diagnostics;
    if d.warmup_dropped == 0 {
        return None;
    }
    let mut line = format!("dropped {} warm-up samples", d.warmup_dropped);
    if !d.warmup_emptied.is_empty() {
        line.push_str(&format!(", emptied {}", d.warmup_emptied.join(", ")));
    }
    Some(line)
}

/// Horizontal alignment of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Column alignments matching [`header_cells`]: statistic columns are
/// right-aligned, name, delta and note are left-aligned.
pub fn column_alignments(analysis: &Analysis) -> Vec<Align> {
    let mut aligns = vec![Align::Left];
    aligns.extend(analysis.labels.iter().map(|_| Align::Right));
    if analysis.is_comparison() {
        aligns.push(Align::Left);
    }
    aligns.push(Align::Left);
    aligns
}

/// Render rows as a plain aligned table.
///
/// Widths count characters, not bytes, since cells carry `µ` and `±`.
/// Columns without an entry in `aligns` are left-aligned.
pub fn text_table(rows: &[Vec<String>], aligns: &[Align]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    for row in rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = " ".repeat(widths[i] - cell.chars().count());
            match aligns.get(i).copied().unwrap_or(Align::Left) {
                Align::Left => {
                    line.push_str(cell);
                    line.push_str(&pad);
                }
                Align::Right => {
                    line.push_str(&pad);
                    line.push_str(cell);
                }
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_metric_titles() {
        assert_eq!(metric_title("ns/op"), "time/op");
        assert_eq!(metric_title("B/op"), "alloc/op");
        assert_eq!(metric_title("allocs/op"), "allocs/op");
        assert_eq!(metric_title("MB/s"), "speed");
        assert_eq!(metric_title("frobs/op"), "frobs/op");
    }

    #[test]
    fn test_time_scaling() {
        assert_eq!(format_value(5.0, "ns/op"), "5.00ns");
        assert_eq!(format_value(999.0, "ns/op"), "999ns");
        assert_eq!(format_value(46_408.0, "ns/op"), "46.4µs");
        assert_eq!(format_value(32_000.0, "ns/op"), "32.0µs");
        assert_eq!(format_value(2_500_000.0, "ns/op"), "2.50ms");
        assert_eq!(format_value(3.0e12, "ns/op"), "3000s");
    }

    #[test]
    fn test_rounding_carries_into_next_unit() {
        assert_eq!(format_value(999.7, "ns/op"), "1.00µs");
        assert_eq!(format_value(999_960.0, "ns/op"), "1.00ms");
        assert_eq!(format_value(1023.9, "B/op"), "1.00KiB");
        assert_eq!(format_value(99.96, "allocs/op"), "100");
        assert_eq!(format_value(9.996, "allocs/op"), "10.0");
        assert_eq!(format_value(99.94, "MB/s"), "99.9MB/s");
    }

    #[test]
    fn test_byte_scaling() {
        assert_eq!(format_value(512.0, "B/op"), "512B");
        assert_eq!(format_value(2048.0, "B/op"), "2.00KiB");
        assert_eq!(format_value(3.0 * 1024.0 * 1024.0, "B/op"), "3.00MiB");
    }

    #[test]
    fn test_raw_units() {
        assert_eq!(format_value(3.0, "allocs/op"), "3.00");
        assert_eq!(format_value(1234.0, "allocs/op"), "1234");
        assert_eq!(format_value(64.0, "MB/s"), "64.0MB/s");
    }

    #[test]
    fn test_stat_cell() {
        let stat = Statistic::from_accepted(&[49_000.0, 49_500.0, 50_000.0], 0).unwrap();
        assert_eq!(stat_cell(&stat, "ns/op"), "49.5µs ± 1%");

        let undefined = Statistic::from_accepted(&[-1.0, 0.0, 1.0], 0).unwrap();
        assert_eq!(stat_cell(&undefined, "allocs/op"), "0.00 ± ?");
    }

    #[test]
    fn test_delta_cells() {
        let significant = Comparison {
            delta_pct: Some(-35.3535),
            p_value: Some(0.04953),
            n_old: 3,
            n_new: 3,
            significant: true,
        };
        assert_eq!(delta_cell(&significant), "-35.35% (p=0.050 n=3+3)");

        let unchanged = Comparison {
            delta_pct: Some(0.4),
            p_value: Some(0.7),
            n_old: 5,
            n_new: 5,
            significant: false,
        };
        assert_eq!(delta_cell(&unchanged), "~ (p=0.700 n=5+5)");

        let unreliable = Comparison {
            delta_pct: Some(-10.0),
            p_value: None,
            n_old: 3,
            n_new: 1,
            significant: false,
        };
        assert_eq!(delta_cell(&unreliable), "(unreliable n=3+1)");

        let undefined = Comparison {
            delta_pct: None,
            ..unreliable
        };
        assert_eq!(delta_cell(&undefined), "(undefined delta)");
    }

    #[test]
    fn test_text_table_alignment() {
        let rows = vec![
            vec!["name".to_string(), "time/op".to_string(), "note".to_string()],
            vec!["BenchmarkA".to_string(), "49.5µs ± 1%".to_string(), String::new()],
            vec!["B".to_string(), "5.00ns ± 0%".to_string(), "noisy".to_string()],
        ];
        let expected = "\
name            time/op  note
BenchmarkA  49.5µs ± 1%
B           5.00ns ± 0%  noisy
";
        assert_eq!(text_table(&rows, &[Align::Left, Align::Right]), expected);
    }
}
