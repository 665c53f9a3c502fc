//! Differential drivetrain control.
//!
//! [`Differential`] wraps a [`DriveOutputs`] sink and adds the drive styles
//! used by the rest of the crate: raw left/right commands for the motion
//! loops and arcade mixing for operator control while recording.
//!
//! # Example
//!
//! ```
//! use playbook::peripherals::{Differential, mock::MockRobot};
//!
//! let robot = MockRobot::new();
//! let mut drivetrain = Differential::new(robot.drive());
//!
//! drivetrain.arcade(0.5, 0.25);
//! drivetrain.stop();
//! assert_eq!(robot.last_command(), Some((0.0, 0.0)));
//! ```

use super::{DriveOutputs, Joystick};

/// A differential drivetrain.
///
/// All commands are limited to `[-1.0, 1.0]` before they reach the sink.
pub struct Differential {
    outputs: Box<dyn DriveOutputs>,
}

impl Differential {
    /// Creates a new drivetrain around a motor output sink.
    pub fn new<O: DriveOutputs + 'static>(outputs: O) -> Self {
        Self {
            outputs: Box::new(outputs),
        }
    }

    /// Commands each side directly.
    pub fn set_outputs(&mut self, left: f64, right: f64) {
        self.outputs
            .set_outputs(left.clamp(-1.0, 1.0), right.clamp(-1.0, 1.0));
    }

    /// Drive the robot using arcade mixing.
    ///
    /// The two values are mixed into left/right outputs as:
    ///   - left = fwd + turn
    ///   - right = fwd - turn
    pub fn arcade(&mut self, fwd: f64, turn: f64) { self.set_outputs(fwd + turn, fwd - turn); }

    /// Drive the robot from a joystick with both axes inverted.
    ///
    /// Pushing the stick forward reports a negative `y`, so forward motion
    /// is `-y`. Turning is `-x`.
    pub fn joystick_arcade(&mut self, joystick: &dyn Joystick) {
        self.arcade(-joystick.y(), -joystick.x());
    }

    /// Commands zero to both sides.
    pub fn stop(&mut self) { self.outputs.set_outputs(0.0, 0.0); }
}
