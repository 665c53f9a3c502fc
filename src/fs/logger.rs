//! File-based logger implementation.
//!
//! This module implements the [`log`] crate's logging facade, writing log
//! messages to both the console (terminal/debug output) and a log file.
//!
//! # Usage
//!
//! Initialize the logger once at the start of your program:
//!
//! ```ignore
//! use playbook::fs::logger;
//! use log::{info, warn, LevelFilter};
//!
//! logger::init(LevelFilter::Debug).expect("Logger init failed");
//!
//! info!("Program started");
//! warn!("This is a warning");
//! ```
//!
//! # Log Output
//!
//! Each log entry includes:
//! - Log level (TRACE, DEBUG, INFO, WARN, ERROR)
//! - Time since program start
//! - Target (module path)
//! - Message
//!
//! Example output:
//! ```text
//! INFO [2m 5s 123ms] playbook::auton::scheduler - Replaying 4 waypoints
//! WARN [2m 5s 456ms] playbook::auton::play - plays/left.auto line 3: unknown action "strafe"
//! ```

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
    sync::{Mutex, OnceLock},
    time::Duration,
};

use humantime::{FormattedDuration, format_duration};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Default log file, created next to the program.
pub const DEFAULT_LOG_FILE: &str = "robot.log";

/// A dual-output logger.
///
/// Writes log messages to both the console and a log file.
pub struct RobotLogger {
    /// Buffered file writer for log output.
    ///
    /// Wrapped in a mutex for thread-safe access. May be `None` if
    /// the file could not be opened (e.g., no SD card present).
    file_writer: Mutex<Option<BufWriter<std::fs::File>>>,
}

impl RobotLogger {
    fn new(path: &Path, append: bool) -> Self {
        let file_writer = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .ok()
            .map(BufWriter::new);

        Self {
            file_writer: Mutex::new(file_writer),
        }
    }

    /// Whether log lines are also reaching a file.
    pub fn has_file(&self) -> bool { self.file_writer.lock().is_ok_and(|w| w.is_some()) }
}

impl log::Log for RobotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_line = format!(
                "{} [{}] {} - {}\n",
                record.level(),
                get_time(),
                record.target(),
                record.args()
            );

            // Print to console
            print!("{}", log_line);

            if let Ok(mut writer_guard) = self.file_writer.lock() {
                if let Some(ref mut writer) = *writer_guard {
                    let _ = writer.write_all(log_line.as_bytes());
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut writer_guard) = self.file_writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: OnceLock<RobotLogger> = OnceLock::new();

/// Initializes the robot logger, truncating [`DEFAULT_LOG_FILE`].
///
/// This function must be called once before any logging macros are used.
///
/// # Arguments
///
/// * `level` - The minimum log level to record. Messages below this level
///   will be ignored.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    init_with_file(level, DEFAULT_LOG_FILE, false)
}

/// Initializes the robot logger with an explicit log file.
///
/// With `append` set, earlier runs are kept and new lines are added at the
/// end of the file.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init_with_file(
    level: LevelFilter,
    path: impl AsRef<Path>,
    append: bool,
) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RobotLogger::new(path.as_ref(), append));
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// Returns the formatted duration since the program started.
///
/// On VexOS, this returns the user program uptime. On other platforms it is
/// measured from the first call.
fn get_time() -> FormattedDuration {
    #[cfg(target_os = "vexos")]
    let dur: Duration = vexide::time::user_uptime();

    #[cfg(not(target_os = "vexos"))]
    let dur: Duration = {
        static START: OnceLock<std::time::Instant> = OnceLock::new();
        START.get_or_init(std::time::Instant::now).elapsed()
    };

    // Millisecond resolution keeps the lines readable.
    format_duration(Duration::from_millis(dur.as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use log::{LevelFilter, debug, error, info, trace, warn};

    #[test]
    #[ignore = "filesystem access needed (file write) and installs the global logger"]
    fn log_full_test() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("robot.log");
        super::init_with_file(LevelFilter::Trace, &path, false)
            .expect("Failed to initialize logger");

        trace!("This is a trace message");
        debug!("This is a debug message");
        info!("This is an info message");
        warn!("This is a warning message");
        error!("This is an error message");

        log::logger().flush();

        let text = std::fs::read_to_string(&path).expect("log file missing");
        assert!(text.contains("This is an error message"));
        assert!(
            log::logger().enabled(
                &log::Metadata::builder()
                    .level(log::Level::Error)
                    .target("test")
                    .build()
            )
        );
    }

    #[test]
    fn logger_without_file_still_works() {
        let logger = super::RobotLogger::new(std::path::Path::new("/no/such/dir/robot.log"), true);
        assert!(!logger.has_file());
    }
}
