// src/bin/copy_report.rs
use clap::Parser;
use diabetesdoc_core::cli::{self, ImportArgs};
use diabetesdoc_core::exit::DocExit;
use diabetesdoc_core::reporting;

fn main() -> DocExit {
    let args = ImportArgs::parse();

    match cli::run_import(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            reporting::error(format!("{e:#}"));
            DocExit::from_error(&e)
        }
    }
}
