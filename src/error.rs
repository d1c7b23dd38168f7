// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("The Smart Pix device is not connected: {} not found", path.display())]
    DeviceUnavailable { path: PathBuf },

    #[error("Report folder already exists: {}", path.display())]
    ArchiveExists { path: PathBuf },

    #[error("Malformed XML in {}: {source}", path.display())]
    Xml {
        source: roxmltree::Error,
        path: PathBuf,
    },

    #[error("I/O error: {source} (path: {})", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Could not convert image {}: {message}", path.display())]
    Image { path: PathBuf, message: String },

    #[error("Unusable date {value:?} in {}", path.display())]
    InvalidDate { path: PathBuf, value: String },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ReportError::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to ReportError::Io with unknown path.
impl From<std::io::Error> for ReportError {
    fn from(source: std::io::Error) -> Self {
        ReportError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
