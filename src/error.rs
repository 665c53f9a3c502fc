//! Error types for Playbook.
//!
//! Only file access and configuration problems are surfaced as errors.
//! Per-line parse problems inside a play or calibration file are logged and
//! skipped by the loaders, and the "robot disabled" exit of a control loop
//! is reported as a [`LoopExit`](crate::motion::control_loop::LoopExit),
//! not as an error.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Playbook error type.
#[derive(Error, Debug)]
pub enum PlaybookError {
    /// A play, calibration, config or log file could not be read or written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single record could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file is not valid TOML.
    #[error("configuration error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PlaybookError {
    /// Wraps an I/O error with the path that caused it.
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PlaybookError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        PlaybookError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaybookError>;
