// src/cli/handlers.rs
//! Entry points of the three binaries.
//!
//! Each handler loads the configuration, applies command-line overrides and
//! runs one component. Recoverable problems are printed as warnings and do
//! not change the exit status.

use anyhow::{Context, Result};
use std::env;
use std::io;

use super::args::{AggregateArgs, ImportArgs, NormalizeArgs};
use crate::aggregate::{self, AggregateOptions};
use crate::config::Config;
use crate::error::ReportError;
use crate::exit::DocExit;
use crate::importer::{self, ImportOptions};
use crate::normalize::{self, NormalizeOptions};
use crate::reporting;

/// Handles `copy-report`.
///
/// # Errors
/// Returns error if the configuration is invalid, no user name is known, or
/// the import cannot start.
pub fn run_import(args: &ImportArgs) -> Result<DocExit> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(root) = &args.media_root {
        config.import.media_root.clone_from(root);
    }
    if let Some(dir) = &args.reports_dir {
        config.paths.reports_dir.clone_from(dir);
    }
    if args.keep_case {
        config.import.normalize = false;
    }

    let user = resolve_user(args.user.as_deref(), |k| env::var(k).ok())
        .context("Could not determine the user name, pass --user")?;

    let mut opts = ImportOptions::from_config(&config, &user, &importer::today());
    opts.verbose = args.verbose;
    if let Some(n) = opts.normalize.as_mut() {
        n.verbose = args.verbose;
    }

    let report = importer::run(&opts)?;
    reporting::print_import_summary(&report);
    Ok(DocExit::Success)
}

/// Handles `lowercase`.
///
/// # Errors
/// Returns error if the configuration is invalid or the root is not a directory.
pub fn run_normalize(args: &NormalizeArgs) -> Result<DocExit> {
    let config = Config::load(args.config.as_deref())?;
    if !args.root.is_dir() {
        return Err(ReportError::io(
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            &args.root,
        )
        .into());
    }

    let opts = NormalizeOptions {
        skip_extensions: config.normalize.skip_extensions,
        verbose: args.verbose,
    };
    let stats = normalize::rename_lower_recursive(&args.root, &opts);
    reporting::print_normalize_summary(&stats);
    Ok(DocExit::Success)
}

/// Handles `aggregate-xml`.
///
/// # Errors
/// Returns error if the configuration is invalid or a report is malformed.
pub fn run_aggregate(args: &AggregateArgs) -> Result<DocExit> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.reports {
        config.paths.reports_dir.clone_from(dir);
    }
    if let Some(dir) = &args.xml_dir {
        config.paths.xml_dir.clone_from(dir);
    }
    if let Some(mode) = args.dedup {
        config.aggregate.dedup = mode;
    }
    config.aggregate.merge_existing |= args.merge_existing;
    config.aggregate.sort_records |= args.sort;

    let mut opts = AggregateOptions::from_config(&config);
    opts.verbose = args.verbose;
    opts.quiet = args.json;

    let summary = aggregate::run(&config.paths.reports_dir, &opts)?;

    if args.json {
        println!("{}", reporting::format_aggregate_json(&summary));
    } else {
        reporting::print_aggregate_summary(&summary);
    }
    Ok(DocExit::Success)
}

/// Picks the user whose media mount holds the device.
pub fn resolve_user<F>(explicit: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(str::to_string)
        .or_else(|| lookup("USER"))
        .or_else(|| lookup("LOGNAME"))
        .filter(|u| !u.is_empty())
}
