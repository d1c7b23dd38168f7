// src/aggregate/mod.rs
//! Builds one XML document per day from all device reports.
//!
//! The run is `discover -> extract -> emit`: every report below the reports
//! root is parsed, profiles are written as they are found, records are
//! grouped by their own `Dt`, and each day is written to `<xml_dir>/<Dt>.xml`.
//! A malformed report aborts the run before any day document is written.

pub mod emit;
pub mod merge;
pub mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, DedupMode};
use crate::discovery;
use crate::error::{ReportError, Result};
use crate::record::{DayBucket, Record};
use crate::reporting;

/// Resolved settings for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub xml_dir: PathBuf,
    pub profiles_dir: PathBuf,
    pub stylesheet: String,
    pub dedup: DedupMode,
    pub merge_existing: bool,
    pub sort_records: bool,
    pub verbose: bool,
    /// Suppresses progress lines, e.g. when stdout carries JSON.
    pub quiet: bool,
}

impl AggregateOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            xml_dir: config.paths.xml_dir.clone(),
            profiles_dir: config.paths.profiles_dir(),
            stylesheet: config.paths.stylesheet.clone(),
            dedup: config.aggregate.dedup,
            merge_existing: config.aggregate.merge_existing,
            sort_records: config.aggregate.sort_records,
            verbose: false,
            quiet: false,
        }
    }
}

/// Counters for one run, printed at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub files: usize,
    pub records: usize,
    pub skipped_records: usize,
    pub days_written: usize,
    pub profiles_written: usize,
    pub write_failures: usize,
}

/// Aggregates every report below `reports_root`.
///
/// # Errors
/// Returns error if a report cannot be read or is not well-formed.
pub fn run(reports_root: &Path, opts: &AggregateOptions) -> Result<AggregateSummary> {
    let mut summary = AggregateSummary::default();
    let bucket = extract(&discovery::discover(reports_root), opts, &mut summary)?;
    emit(bucket, opts, &mut summary);
    Ok(summary)
}

/// Parses every report and groups its records by date.
///
/// Profiles are written immediately; for a date seen more than once the
/// last report processed wins.
///
/// # Errors
/// Returns error on the first report that cannot be read or parsed.
pub fn extract<I>(paths: I, opts: &AggregateOptions, summary: &mut AggregateSummary) -> Result<DayBucket>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    let mut bucket = DayBucket::new();

    for path in paths {
        let path = path.as_ref();
        if !opts.quiet {
            reporting::progress(format!("Import {}", path.display()));
        }

        let report = parse::parse_file(path)?;
        summary.files += 1;

        for skip in &report.skipped {
            reporting::warn(format!("{}: {skip}, skipped", path.display()));
        }
        summary.skipped_records += report.skipped.len();

        if let Some(profile) = &report.profile {
            let written = emit::profile_path(&opts.profiles_dir, &profile.date)
                .and_then(|target| emit::write_document(&target, &emit::render_profile(profile)));
            match written {
                Ok(()) => summary.profiles_written += 1,
                Err(e) => {
                    summary.write_failures += 1;
                    reporting::warn(format!("Could not write profile: {e}"));
                }
            }
        }

        summary.records += report.records.len();
        for record in report.records {
            bucket.push(record);
        }
    }

    Ok(bucket)
}

/// Writes one day document per date in the bucket.
///
/// Each document fully replaces the previous file for that date; dates not
/// in the bucket are left alone. Write failures are reported and the
/// remaining dates are still written.
pub fn emit(bucket: DayBucket, opts: &AggregateOptions, summary: &mut AggregateSummary) {
    for (date, records) in bucket {
        let target = match emit::day_path(&opts.xml_dir, &date) {
            Ok(t) => t,
            Err(e) => {
                summary.write_failures += 1;
                reporting::warn(format!("Could not write to file: {e}"));
                continue;
            }
        };

        let mut records = merge::dedup(records, opts.dedup);
        if opts.merge_existing {
            match read_existing(&target) {
                Ok(existing) => {
                    records = merge::merge_existing(records, existing, opts.dedup);
                }
                Err(e) => {
                    // Keep the old document rather than dropping what it holds.
                    summary.write_failures += 1;
                    reporting::warn(format!("Not replacing {}: {e}", target.display()));
                    continue;
                }
            }
        }
        if opts.sort_records {
            merge::sort_records(&mut records);
        }

        let content = emit::render_day(&date, &records, &opts.stylesheet);
        match emit::write_document(&target, &content) {
            Ok(()) => {
                summary.days_written += 1;
                if opts.verbose && !opts.quiet {
                    reporting::detail(format!(
                        "Wrote {} ({} records)",
                        target.display(),
                        records.len()
                    ));
                }
            }
            Err(e) => {
                summary.write_failures += 1;
                reporting::warn(format!("Could not write to file: {e}"));
            }
        }
    }
}

/// Records of a previously written day document, empty if there is none.
fn read_existing(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|e| ReportError::io(e, path))?;
    parse::parse_day_document(&text).map_err(|source| ReportError::Xml {
        source,
        path: path.to_path_buf(),
    })
}
