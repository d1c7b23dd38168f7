// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;

use crate::config::DedupMode;

#[derive(Parser, Debug)]
#[command(
    name = "copy-report",
    version,
    about = "Copy the Smart Pix report pages into a folder named after today's date"
)]
pub struct ImportArgs {
    /// Configuration file [default: ./diabetesdoc.toml if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Owner of the media mount [default: $USER, then $LOGNAME]
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long, value_name = "DIR")]
    pub media_root: Option<PathBuf>,
    /// Root the dated folder is created in
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,
    /// Keep the vendor's mixed-case file names
    #[arg(long)]
    pub keep_case: bool,
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "lowercase",
    version,
    about = "Lowercase file names below a directory and the links that refer to them"
)]
pub struct NormalizeArgs {
    #[arg(default_value = ".")]
    pub root: PathBuf,
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "aggregate-xml",
    version,
    about = "Collect all report records into one XML document per day"
)]
pub struct AggregateArgs {
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Directory scanned for report files
    #[arg(long, value_name = "DIR")]
    pub reports: Option<PathBuf>,
    /// Directory day documents are written to
    #[arg(long, value_name = "DIR")]
    pub xml_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub dedup: Option<DedupMode>,
    /// Keep records already written for a day unless replaced
    #[arg(long)]
    pub merge_existing: bool,
    /// Sort each day by date, time and element name
    #[arg(long)]
    pub sort: bool,
    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
    #[arg(long, short)]
    pub verbose: bool,
}
