// src/exit.rs
//! Process exit codes shared by the three report tools.
//!
//! Codes follow `sysexits.h` so wrapper scripts can tell a missing device
//! apart from a broken report tree.

use std::process::Termination;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DocExit {
    /// Run completed (possibly with skipped files, see console output).
    Success = 0,
    /// Generic failure (I/O, existing report folder).
    Error = 1,
    /// Input data unusable (malformed XML, invalid configuration).
    DataError = 65,
    /// The Smart Pix device is not mounted.
    Unavailable = 69,
}

impl DocExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Picks the exit code for a failed run.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ReportError>() {
            Some(e) => Self::from(e),
            None => Self::Error,
        }
    }
}

impl From<&ReportError> for DocExit {
    fn from(err: &ReportError) -> Self {
        match err {
            ReportError::DeviceUnavailable { .. } => Self::Unavailable,
            ReportError::Xml { .. } | ReportError::Config { .. } => Self::DataError,
            _ => Self::Error,
        }
    }
}

impl Termination for DocExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
