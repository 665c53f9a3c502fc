//! Operator control utilities for driver control periods.
//!
//! This module turns a driver control period into a reusable play: the
//! operator drives arcade style and presses a button to capture each
//! maneuver as a waypoint.
//!
//! # Example
//!
//! ```ignore
//! use playbook::opcontrol::recorder::Recorder;
//!
//! let mut recorder = Recorder::new("recorded.auto", ',');
//! recorder.run(motion.hardware_mut(), &mut joystick)?;
//! ```

/// Operator input capture.
///
/// Provides [`Recorder`](recorder::Recorder) for writing driver input to a
/// play file.
pub mod recorder;
