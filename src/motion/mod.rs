//! Autonomous motion control.
//!
//! This module provides the single-axis maneuvers that waypoints invoke:
//!
//! - **PID Control**: a distance controller fed by the averaged drive
//!   encoders and a heading controller fed by the gyro.
//! - **Dead Reckoning**: fixed-speed motion that only uses the sensors to
//!   decide when to stop.
//!
//! # Architecture
//!
//! Every maneuver is a tight poll-and-command loop that runs on the calling
//! thread until it is done or the robot leaves the enabled autonomous
//! state. The loop skeleton lives in [`control_loop`]; the maneuvers only
//! supply their measurement, output and completion check.
//!
//! # Example
//!
//! ```ignore
//! use playbook::motion::manager::{MotionController, MotionMode};
//!
//! let mut motion = MotionController::new(hardware, &config, calibration);
//! motion.drive_straight(24.0, MotionMode::Pid); // Move 24 inches
//! motion.turn(90, MotionMode::Pid);             // Turn 90 degrees
//! ```

/// Shared maneuver loop.
///
/// Provides [`run`](control_loop::run) and the [`Maneuver`](control_loop::Maneuver)
/// trait implemented by every drive and turn.
pub mod control_loop;

/// Drive-straight and turn maneuvers.
pub mod manager;

/// PID control algorithms.
pub mod pid;
