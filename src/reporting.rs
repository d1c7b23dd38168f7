// src/reporting.rs
//! Console output for the report tools.
//!
//! Progress goes to stdout, problems to stderr. Nothing here decides the exit
//! status; callers count failures and print a summary at the end.

use crate::aggregate::AggregateSummary;
use crate::importer::ImportReport;
use crate::normalize::NormalizeStats;
use colored::Colorize;
use std::fmt::Display;

pub fn progress(msg: impl Display) {
    println!("{msg}");
}

pub fn detail(msg: impl Display) {
    println!("  {}", msg.to_string().dimmed());
}

pub fn warn(msg: impl Display) {
    eprintln!("{} {msg}", "warning:".yellow().bold());
}

pub fn error(msg: impl Display) {
    eprintln!("{} {msg}", "error:".red().bold());
}

pub(crate) fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn counted(count: usize, word: &str) -> String {
    format!("{count} {}", pluralize(word, count))
}

fn status(failures: usize) -> colored::ColoredString {
    if failures == 0 {
        "OK".green().bold()
    } else {
        "DONE".yellow().bold()
    }
}

pub fn print_aggregate_summary(s: &AggregateSummary) {
    println!(
        "{} {} from {}: {} written, {} written",
        status(s.write_failures),
        counted(s.records, "record"),
        counted(s.files, "file"),
        counted(s.days_written, "day"),
        counted(s.profiles_written, "profile"),
    );
    if s.skipped_records > 0 {
        println!("   {} without a usable date skipped", counted(s.skipped_records, "element"));
    }
    if s.write_failures > 0 {
        println!(
            "   {}",
            format!("{} failed, see warnings above", counted(s.write_failures, "write")).yellow()
        );
    }
}

/// Formats an aggregation summary as JSON for wrapper scripts.
#[must_use]
pub fn format_aggregate_json(s: &AggregateSummary) -> String {
    let output = serde_json::json!({
        "files": s.files,
        "records": s.records,
        "skipped_records": s.skipped_records,
        "days_written": s.days_written,
        "profiles_written": s.profiles_written,
        "write_failures": s.write_failures,
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_normalize_summary(s: &NormalizeStats) {
    println!(
        "{} {} renamed, {} rewritten, {} skipped",
        status(s.errors),
        counted(s.renamed, "name"),
        counted(s.rewritten, "file"),
        s.skipped,
    );
    if s.errors > 0 {
        println!("   {}", format!("{} reported above", counted(s.errors, "error")).yellow());
    }
}

pub fn print_import_summary(r: &ImportReport) {
    println!("{} {}", "Imported".green().bold(), r.archive.display());
    println!("   {}", r.copy.summary());
    if let Some(n) = &r.normalize {
        println!(
            "   Lowercased {}, rewrote {}.",
            counted(n.renamed, "name"),
            counted(n.rewritten, "file")
        );
    }
    println!(
        "   Removed {}, converted {}.",
        counted(r.assets.removed, "decorative asset"),
        counted(r.assets.converted, "bitmap")
    );
    if r.failures() > 0 {
        println!(
            "   {}",
            format!("{} reported above", counted(r.failures(), "problem")).yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("day", 1), "day");
        assert_eq!(pluralize("day", 0), "days");
        assert_eq!(counted(3, "file"), "3 files");
    }

    #[test]
    fn test_json_summary_fields() {
        let s = AggregateSummary {
            files: 2,
            records: 3,
            days_written: 2,
            ..AggregateSummary::default()
        };
        let v: serde_json::Value = serde_json::from_str(&format_aggregate_json(&s)).unwrap();
        assert_eq!(v["files"], 2);
        assert_eq!(v["days_written"], 2);
        assert_eq!(v["write_failures"], 0);
    }
}
