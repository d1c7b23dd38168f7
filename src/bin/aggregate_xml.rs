// src/bin/aggregate_xml.rs
use clap::Parser;
use diabetesdoc_core::cli::{self, AggregateArgs};
use diabetesdoc_core::exit::DocExit;
use diabetesdoc_core::reporting;

fn main() -> DocExit {
    let args = AggregateArgs::parse();

    match cli::run_aggregate(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            reporting::error(format!("{e:#}"));
            DocExit::from_error(&e)
        }
    }
}
