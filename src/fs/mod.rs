//! Filesystem utilities.
//!
//! This module provides the pieces of Playbook that talk to files other
//! than plays: the robot logger and the encoder calibration constants.
//!
//! # Logging
//!
//! The `logger` submodule provides a file-based logger that writes to
//! `robot.log` next to the program. This is useful for debugging issues that
//! only occur on the robot.
//!
//! # Example
//!
//! ```ignore
//! use playbook::fs::logger;
//! use log::{info, LevelFilter};
//!
//! // Initialize the logger at program start
//! logger::init(LevelFilter::Debug).expect("Failed to initialize logger");
//!
//! // Now you can use standard logging macros
//! info!("Robot initialized successfully");
//! ```

/// Encoder calibration constants.
pub mod calibration;

/// File-based logging.
///
/// Provides a logger implementation that writes to both the console
/// and a log file.
pub mod logger;

/// Lines a loader never looks at: blanks and `//` annotations.
pub(crate) fn is_skipped_line(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with("//")
}
