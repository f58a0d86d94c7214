//! Terminal output for batch runs.
//!
//! Format-only helpers; handlers decide what to print.

use std::time::Duration;

use mcpdir_core::RunReport;

/// Errors listed before the rest are summarized.
pub const SHOWN_ERRORS: usize = 5;

pub fn print_separator(width: usize) {
    println!("{}", "─".repeat(width));
}

/// Numbered error lines, at most `shown`, then a count of the rest.
pub fn error_lines(errors: &[String], shown: usize) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .iter()
        .take(shown)
        .enumerate()
        .map(|(i, e)| format!("  {}. {e}", i + 1))
        .collect();
    if errors.len() > shown {
        lines.push(format!("  ... and {} more errors", errors.len() - shown));
    }
    lines
}

/// One line describing how a table's row count moved.
pub fn table_change(table: &str, before: u64, after: u64) -> String {
    match after.cmp(&before) {
        std::cmp::Ordering::Greater => {
            format!("  {table}: {before} → {after} (+{} new records)", after - before)
        }
        std::cmp::Ordering::Less => {
            format!("  {table}: {before} → {after} ({} records removed)", before - after)
        }
        std::cmp::Ordering::Equal => format!("  {table}: {before} → {after} (no change)"),
    }
}

/// Print the statistics block and the error summary of a run.
pub fn print_report(report: &RunReport) {
    let totals = report.totals;
    println!();
    println!("Statistics ({}):", report.job);
    print_separator(40);
    println!("  Total items:        {}", report.total_items);
    println!("  Processed:          {}", totals.processed);
    println!("  Added:              {}", totals.added);
    println!("  Updated:            {}", totals.updated);
    println!("  Skipped:            {}", totals.skipped);
    println!("  Failed:             {}", totals.failed);
    println!(
        "  Batches:            {}/{} ({} failed)",
        report.batches_processed,
        report.total_batches,
        report.failed_batches()
    );
    println!(
        "  Duration:           {:.2}s",
        Duration::from_millis(report.duration_ms).as_secs_f64()
    );
    if report.dry_run {
        println!("  Dry run: nothing was written");
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors ({}):", report.errors.len());
        for line in error_lines(&report.errors, SHOWN_ERRORS) {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("error {i}")).collect()
    }

    #[test]
    fn test_error_lines_under_limit() {
        let lines = error_lines(&errors(2), SHOWN_ERRORS);
        assert_eq!(lines, vec!["  1. error 1", "  2. error 2"]);
    }

    #[test]
    fn test_error_lines_summarize_the_rest() {
        let lines = error_lines(&errors(8), SHOWN_ERRORS);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[4], "  5. error 5");
        assert_eq!(lines[5], "  ... and 3 more errors");
    }

    #[test]
    fn test_error_lines_empty() {
        assert!(error_lines(&[], SHOWN_ERRORS).is_empty());
    }

    #[test]
    fn test_table_change() {
        assert_eq!(table_change("servers", 10, 17), "  servers: 10 → 17 (+7 new records)");
        assert_eq!(table_change("servers", 5, 3), "  servers: 5 → 3 (2 records removed)");
        assert_eq!(table_change("servers", 4, 4), "  servers: 4 → 4 (no change)");
    }
}
