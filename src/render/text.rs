use crate::model::RankedEntry;
use crate::pipeline::Report;
use crate::render::NumberFormat;

const PATH_WIDTH: usize = 70;
const NUMBER_WIDTH: usize = 8;
const RULE: &str = "==============================";

/// Render the four rankings as numbered text tables.
///
/// Row numbers restart at 1 for every table.
pub fn render_text_report(report: &Report, numbers: NumberFormat) -> String {
    let mut out = String::new();

    section(
        &mut out,
        "Where was the most time spent?",
        &report.by_total,
        numbers,
    );
    gap(&mut out);
    section(
        &mut out,
        "What were the slowest pages (max page load time)?",
        &report.by_max,
        numbers,
    );
    gap(&mut out);
    section(
        &mut out,
        "What were the slowest pages (avg page load time)?",
        &report.by_average,
        numbers,
    );

    if let Some(filtered) = &report.by_average_filtered {
        gap(&mut out);
        let title = format!(
            "What were the slowest pages (avg page load time with more than {} calls)?",
            filtered.min_calls
        );
        section(&mut out, &title, &filtered.entries, numbers);
    }

    out
}

fn gap(out: &mut String) {
    out.push_str("\n\n\n");
}

fn section(out: &mut String, title: &str, entries: &[RankedEntry], numbers: NumberFormat) {
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format_row(i + 1, entry, numbers));
        out.push('\n');
    }
}

/// `N. path | total | avg | max | calls`, padded like the classic report.
pub fn format_row(index: usize, entry: &RankedEntry, numbers: NumberFormat) -> String {
    let total = numbers.format(entry.total_ms);
    // Averages are shown as whole milliseconds, truncated.
    let avg = numbers.format(entry.avg_ms as u64);
    let max = numbers.format(entry.max_ms);
    let calls = numbers.format(entry.call_count as u64);

    format!(
        "{index}. {}{} | {total} total ms{} | {avg} avg ms{} | {max} max ms{} | {calls} calls",
        entry.path,
        pad(&entry.path, PATH_WIDTH),
        pad(&total, NUMBER_WIDTH),
        pad(&avg, NUMBER_WIDTH),
        pad(&max, NUMBER_WIDTH),
    )
}

fn pad(s: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(s.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FilteredRanking, RunSummary};
    use pretty_assertions::assert_eq;

    fn entry(path: &str, latencies: &[u64]) -> RankedEntry {
        let total: u64 = latencies.iter().sum();
        RankedEntry {
            path: path.to_string(),
            metric: total as f64,
            call_count: latencies.len(),
            total_ms: total,
            max_ms: latencies.iter().copied().max().unwrap_or(0),
            avg_ms: total as f64 / latencies.len() as f64,
        }
    }

    #[test]
    fn row_layout() {
        let row = format_row(3, &entry("/a", &[10, 20, 11]), NumberFormat::plain());
        let expected = format!(
            "3. /a{} | 41 total ms       | 13 avg ms       | 20 max ms       | 3 calls",
            " ".repeat(68)
        );
        assert_eq!(row, expected);
    }

    #[test]
    fn long_values_are_not_truncated() {
        let long = format!("/{}", "x".repeat(80));
        let row = format_row(1, &entry(&long, &[123456789]), NumberFormat::with_separator(','));
        assert_eq!(
            row,
            format!("1. {long} | 123,456,789 total ms | 123,456,789 avg ms | 123,456,789 max ms | 1 calls")
        );
    }

    #[test]
    fn empty_path_is_printed_as_is() {
        let row = format_row(1, &entry("", &[5]), NumberFormat::plain());
        assert!(row.starts_with(&format!("1. {} | 5 total ms", " ".repeat(70))));
    }

    #[test]
    fn sections_and_numbering() {
        let report = Report {
            by_total: vec![entry("/a", &[30]), entry("/b", &[5])],
            by_max: vec![entry("/a", &[30])],
            by_average: vec![],
            by_average_filtered: Some(FilteredRanking {
                min_calls: 4,
                entries: vec![entry("/b", &[5])],
            }),
            summary: RunSummary::default(),
        };
        let text = render_text_report(&report, NumberFormat::plain());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Where was the most time spent?");
        assert_eq!(lines[1], RULE);
        assert!(lines[2].starts_with("1. /a "));
        assert!(lines[3].starts_with("2. /b "));
        assert_eq!(&lines[4..7], &["", "", ""]);
        assert_eq!(lines[7], "What were the slowest pages (max page load time)?");
        assert!(lines[9].starts_with("1. /a "));
        assert_eq!(lines[13], "What were the slowest pages (avg page load time)?");
        assert_eq!(lines[14], RULE);
        assert_eq!(
            lines[18],
            "What were the slowest pages (avg page load time with more than 4 calls)?"
        );
        assert!(lines[20].starts_with("1. /b "));
        assert_eq!(lines.len(), 21);
    }

    #[test]
    fn no_filtered_section_without_min_calls() {
        let report = Report {
            by_total: vec![],
            by_max: vec![],
            by_average: vec![],
            by_average_filtered: None,
            summary: RunSummary::default(),
        };
        let text = render_text_report(&report, NumberFormat::plain());
        assert!(!text.contains("more than"));
        assert_eq!(text.matches(RULE).count(), 3);
    }
}
