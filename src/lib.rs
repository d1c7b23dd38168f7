pub mod aggregate;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod importer;
pub mod normalize;
pub mod record;
pub mod reporting;
