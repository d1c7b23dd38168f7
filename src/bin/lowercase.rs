// src/bin/lowercase.rs
use clap::Parser;
use diabetesdoc_core::cli::{self, NormalizeArgs};
use diabetesdoc_core::exit::DocExit;
use diabetesdoc_core::reporting;

fn main() -> DocExit {
    let args = NormalizeArgs::parse();

    match cli::run_normalize(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            reporting::error(format!("{e:#}"));
            DocExit::from_error(&e)
        }
    }
}
