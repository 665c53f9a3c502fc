//! # Playbook
//!
//! Playbook replays timed drive and turn commands during the autonomous
//! period of a match. Sequences are written as plain text "plays", either by
//! hand or by recording a driver, and replayed against the clock with PID or
//! dead-reckoned maneuvers. It includes:
//!
//! - **Plays**: A text format of timestamped waypoints, a catalog of plays
//!   selectable by name and a scheduler that replays them on time.
//! - **Motion Control**: Drive-straight and turn maneuvers with PID and
//!   dead-reckoning modes that stop the moment the robot is disabled.
//! - **Recording**: Capture of operator driving into a play file.
//! - **Logging**: A file-based logger for debugging and telemetry.
//!
//! Hardware is reached through small capability traits, implemented for
//! [Vexide](https://vexide.dev) devices on the V5 brain and for in-memory
//! doubles everywhere else.
//!
//! ## Quick Start
//!
//! ```ignore
//! use playbook::{config::Config, fs::logger, peripherals::vex, robot::Robot};
//! use log::LevelFilter;
//!
//! logger::init(LevelFilter::Info).ok();
//! let config = Config::load("playbook.toml").unwrap_or_default();
//! let mut robot = Robot::new(vex_hardware, config);
//!
//! robot.autonomous();
//! ```
//!
//! ## Modules
//!
//! - [`auton`]: Waypoints, plays, the play catalog and the replay scheduler.
//! - [`motion`]: PID controller and the drive-straight and turn maneuvers.
//! - [`opcontrol`]: Recording operator input to a play file.
//! - [`peripherals`]: Hardware capability traits and their implementations.
//! - [`robot`]: Autonomous and driver control entry points.
//! - [`config`]: Typed configuration.
//! - [`fs`]: Filesystem utilities including logging.

/// Autonomous replay module.
///
/// Loads plays from files and replays their waypoints in time order:
///
/// - **Waypoint**: One timestamped drive or turn command.
/// - **Play**: A named, sorted list of waypoints from one file.
/// - **PlayList**: Plays from a directory, selectable by name.
/// - **Scheduler**: Waits for each trigger time and runs the action.
pub mod auton;

/// Configuration module.
///
/// Typed configuration loaded from TOML or from a resolved key/value map.
pub mod config;

/// Error types.
pub mod error;

/// Filesystem utilities module.
///
/// Contains logging functionality for recording robot telemetry and debug
/// information to files, and the encoder calibration reader.
pub mod fs;

/// Autonomous motion control module.
///
/// Provides the maneuvers waypoints invoke:
///
/// - **PID Control**: Closed loop on encoder distance or gyro heading.
/// - **Dead Reckoning**: Fixed speed until the measurement reaches the target.
pub mod motion;

/// Operator control utilities module.
///
/// Records driver control periods as plays.
pub mod opcontrol;

/// Hardware interface module.
///
/// Capability traits for the drive motors, encoders, gyro, joystick and
/// competition state, with a differential drivetrain built on top of them.
pub mod peripherals;

/// Competition mode entry points.
pub mod robot;
