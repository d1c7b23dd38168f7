// src/config/mod.rs
pub mod types;

pub use self::types::{
    AggregateConfig, Config, DedupMode, ImportConfig, NormalizeConfig, PathConfig,
};

use crate::error::{ReportError, Result};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "diabetesdoc.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path`, or from `diabetesdoc.toml` in the
    /// working directory when no path is given.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| ReportError::io(e, path))?;
        let config = Self::parse_toml(&content).map_err(|message| ReportError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Parses a TOML document into a configuration.
    ///
    /// # Errors
    /// Returns the TOML error message on failure.
    pub fn parse_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns error if a decorative asset pattern is not a valid regex or the
    /// profiles directory would escape the output directory.
    pub fn validate(&self, source: &Path) -> Result<()> {
        for pattern in &self.import.decorative_assets {
            regex::Regex::new(pattern).map_err(|e| ReportError::Config {
                path: source.to_path_buf(),
                message: format!("decorative_assets: {e}"),
            })?;
        }
        let sub = &self.paths.profiles_subdir;
        if sub.is_empty() || sub.contains("..") || Path::new(sub).is_absolute() {
            return Err(ReportError::Config {
                path: source.to_path_buf(),
                message: format!("profiles_subdir {sub:?} must be a relative sub-directory"),
            });
        }
        Ok(())
    }
}
