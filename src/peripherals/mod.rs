//! Hardware capability interfaces.
//!
//! The replay and motion layers never talk to devices directly. They call
//! the small traits defined here, which are implemented for the V5 devices
//! in [`vex`] (only built for `target_os = "vexos"`) and for in-memory
//! doubles in [`mock`].
//!
//! # Sign conventions
//!
//! - Motor outputs are normalised to `[-1.0, 1.0]`, positive drives forward.
//! - Encoder distances are in whatever unit the calibration constants
//!   produce, positive forward.
//! - Gyro angles are in degrees and accumulate without wrapping.

use std::{cell::RefCell, rc::Rc};

/// Controller button identifiers and press-edge tracking.
pub mod controller;

/// Differential drivetrain output sink.
pub mod drivetrain;

/// In-memory hardware doubles for tests and simulation.
pub mod mock;

/// Adapters from the V5 devices to the capability traits.
#[cfg(target_os = "vexos")]
pub mod vex;

pub use controller::ControllerButton;
pub use drivetrain::Differential;

/// Sink for left/right drive motor commands.
pub trait DriveOutputs {
    /// Commands both sides of the drivetrain. Values are in `[-1.0, 1.0]`.
    fn set_outputs(&mut self, left: f64, right: f64);
}

/// A wheel encoder that reports travelled distance.
pub trait DistanceEncoder {
    /// Zeroes the accumulated distance.
    fn reset(&mut self);

    /// Distance travelled since the last reset.
    fn distance(&self) -> f64;

    /// Sets the scale from raw encoder counts to distance units.
    fn set_distance_per_pulse(&mut self, distance_per_pulse: f64);
}

/// A yaw gyroscope.
pub trait Gyro {
    /// Sets the current heading, in degrees.
    fn reset(&mut self, heading: f64);

    /// Accumulated heading in degrees.
    fn angle(&self) -> f64;
}

/// Competition/field state of the robot.
///
/// Read on every control loop iteration and never cached.
pub trait RobotState {
    fn is_enabled(&self) -> bool;

    fn is_autonomous(&self) -> bool;

    fn is_operator_control(&self) -> bool;
}

/// An operator joystick.
pub trait Joystick {
    /// Refreshes the cached input state from the device.
    fn update(&mut self) {}

    /// Horizontal stick axis in `[-1.0, 1.0]`, positive right.
    fn x(&self) -> f64;

    /// Vertical stick axis in `[-1.0, 1.0]`, positive down.
    fn y(&self) -> f64;

    /// Whether `button` is currently held.
    fn is_pressed(&self, button: ControllerButton) -> bool;
}

/// The set of devices the motion layer drives.
pub struct Hardware {
    pub drive:         Differential,
    pub left_encoder:  Box<dyn DistanceEncoder>,
    pub right_encoder: Box<dyn DistanceEncoder>,
    pub gyro:          Box<dyn Gyro>,
    pub state:         Box<dyn RobotState>,
}

impl Hardware {
    /// Average distance of both drive encoders.
    pub fn average_distance(&self) -> f64 {
        (self.left_encoder.distance() + self.right_encoder.distance()) / 2.0
    }

    /// Zeroes both encoders and the gyro.
    pub fn reset_measurements(&mut self) {
        self.left_encoder.reset();
        self.right_encoder.reset();
        self.gyro.reset(0.0);
    }
}

/// Makes an object clonable by wrapping it in `Rc` and `RefCell`
pub fn make_cloneable<T>(t: T) -> Rc<RefCell<T>> { Rc::new(RefCell::new(t)) }
