//! PID controller used by the drive-straight and turn maneuvers.
//!
//! One [`Pid`](pid::Pid) instance exists per controlled axis: the distance
//! axis (averaged drive encoders) and the heading axis (gyroscope). They are
//! never active at the same time.
//!
//! # How PID Works
//!
//! PID control calculates motor output based on three terms:
//!
//! - **P (Proportional)**: Output proportional to the error (distance from target).
//! - **I (Integral)**: Output proportional to accumulated error, only while the
//!   error is outside the epsilon band.
//! - **D (Derivative)**: Output opposing the rate of change of the measurement.
//!
//! The formula is: `output = Kp*error + Ki*errorSum - Kd*(current - previous)`
//!
//! # Completion
//!
//! A maneuver is done once the error has stayed within the done range for a
//! minimum number of consecutive evaluations. Before a maneuver starts the
//! controller is reset and primed with one evaluation at the known starting
//! measurement so a stale counter can never end the loop on its first pass.
//!
//! # Tuning
//!
//! Start with Kp and increase until the robot reaches the target.
//! Add Kd to reduce overshoot. Only add Ki if the robot consistently
//! undershoots.

/// The PID controller and its gains.
pub mod pid;

pub use pid::{Pid, PidGains};
