//! V5 device adapters.
//!
//! Wraps [`vexide`] devices so they can be handed to
//! [`Hardware`](super::Hardware). Device errors are logged and replaced with
//! a neutral reading.
//!
//! # Example
//!
//! ```ignore
//! use playbook::peripherals::{Differential, Hardware, make_cloneable, vex::*};
//! use vexide::prelude::*;
//!
//! let left = make_cloneable(vec![Motor::new(peripherals.port_1, Gearset::Green, Direction::Forward)]);
//! let right = make_cloneable(vec![Motor::new(peripherals.port_2, Gearset::Green, Direction::Reverse)]);
//!
//! let hardware = Hardware {
//!     drive:         Differential::new(VexDrive::new(left.clone(), right.clone())),
//!     left_encoder:  Box::new(MotorEncoder::new(left)),
//!     right_encoder: Box::new(MotorEncoder::new(right)),
//!     gyro:          Box::new(VexGyro::new(InertialSensor::new(peripherals.port_10))),
//!     state:         Box::new(CompetitionState),
//! };
//! ```

use std::{cell::RefCell, rc::Rc};

use log::warn;
use vexide::{
    adi::encoder::AdiOpticalEncoder,
    competition::{self, CompetitionMode},
    controller::ControllerState,
    math::Angle,
    prelude::Controller,
    smart::{imu::InertialSensor, motor::Motor},
};

use super::{ControllerButton, DistanceEncoder, DriveOutputs, Gyro, Joystick, RobotState};

/// Voltage corresponding to a full-scale output.
const MAX_VOLTAGE: f64 = 12.0;

/// A group of motors on one side of the drivetrain.
pub type MotorGroup = Rc<RefCell<Vec<Motor>>>;

/// Drive output sink over two motor groups.
pub struct VexDrive {
    left:  MotorGroup,
    right: MotorGroup,
}

impl VexDrive {
    pub fn new(left: MotorGroup, right: MotorGroup) -> Self { Self { left, right } }
}

fn set_group_voltage(group: &MotorGroup, voltage: f64) {
    if let Ok(mut motors) = group.try_borrow_mut() {
        for motor in motors.iter_mut() {
            if let Err(e) = motor.set_voltage(voltage) {
                warn!("Motor Voltage Error: {}", e);
            }
        }
    } else {
        warn!("Error Borrowing Motor Group");
    }
}

impl DriveOutputs for VexDrive {
    fn set_outputs(&mut self, left: f64, right: f64) {
        set_group_voltage(&self.left, left * MAX_VOLTAGE);
        set_group_voltage(&self.right, right * MAX_VOLTAGE);
    }
}

/// Uses the integrated encoders of a motor group as a distance encoder.
///
/// The raw reading is the average motor position in degrees.
pub struct MotorEncoder {
    motors:             MotorGroup,
    distance_per_pulse: f64,
}

impl MotorEncoder {
    pub fn new(motors: MotorGroup) -> Self {
        Self {
            motors,
            distance_per_pulse: 1.0,
        }
    }
}

impl DistanceEncoder for MotorEncoder {
    fn reset(&mut self) {
        if let Ok(mut motors) = self.motors.try_borrow_mut() {
            for motor in motors.iter_mut() {
                if let Err(e) = motor.reset_position() {
                    warn!("Motor Position Reset Error: {}", e);
                }
            }
        }
    }

    fn distance(&self) -> f64 {
        let Ok(motors) = self.motors.try_borrow() else {
            warn!("Error Borrowing Motor Group");
            return 0.0;
        };
        if motors.is_empty() {
            return 0.0;
        }
        let sum: f64 = motors
            .iter()
            .map(|motor| {
                motor
                    .position()
                    .unwrap_or_else(|e| {
                        warn!("Error Getting Motor Encoder Position: {}", e);
                        Angle::from_degrees(0.0)
                    })
                    .as_degrees()
            })
            .sum();
        sum / motors.len() as f64 * self.distance_per_pulse
    }

    fn set_distance_per_pulse(&mut self, distance_per_pulse: f64) {
        self.distance_per_pulse = distance_per_pulse;
    }
}

/// A 3-wire optical shaft encoder.
pub struct AdiEncoder {
    encoder:            AdiOpticalEncoder,
    distance_per_pulse: f64,
}

impl AdiEncoder {
    pub fn new(encoder: AdiOpticalEncoder) -> Self {
        Self {
            encoder,
            distance_per_pulse: 1.0,
        }
    }
}

impl DistanceEncoder for AdiEncoder {
    fn reset(&mut self) {
        if let Err(e) = self.encoder.reset_position() {
            warn!("ADI Encoder Reset Error: {}", e);
        }
    }

    fn distance(&self) -> f64 {
        let ticks = self
            .encoder
            .position()
            .unwrap_or_else(|e| {
                warn!("ADI Encoder Error: {}", e);
                Angle::from_degrees(0.0)
            })
            .as_degrees();
        ticks * self.distance_per_pulse
    }

    fn set_distance_per_pulse(&mut self, distance_per_pulse: f64) {
        self.distance_per_pulse = distance_per_pulse;
    }
}

/// The V5 inertial sensor, read as an unwrapped rotation.
pub struct VexGyro {
    imu: InertialSensor,
}

impl VexGyro {
    pub fn new(imu: InertialSensor) -> Self { Self { imu } }
}

impl Gyro for VexGyro {
    fn reset(&mut self, heading: f64) {
        if let Err(e) = self.imu.set_rotation(Angle::from_degrees(heading)) {
            warn!("Inertial Sensor Error: {}", e);
        }
    }

    fn angle(&self) -> f64 {
        self.imu
            .rotation()
            .map(|a| a.as_degrees())
            .unwrap_or_else(|e| {
                warn!("Inertial Sensor Error: {}", e);
                0.0
            })
    }
}

/// Field control state from the competition system.
pub struct CompetitionState;

impl RobotState for CompetitionState {
    fn is_enabled(&self) -> bool { competition::mode() != CompetitionMode::Disabled }

    fn is_autonomous(&self) -> bool { competition::mode() == CompetitionMode::Autonomous }

    fn is_operator_control(&self) -> bool { competition::mode() == CompetitionMode::Driver }
}

/// The V5 controller, driven from its left stick.
pub struct VexJoystick {
    controller: Controller,
    state:      ControllerState,
}

impl VexJoystick {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            state: ControllerState::default(),
        }
    }
}

impl Joystick for VexJoystick {
    fn update(&mut self) {
        self.state = self.controller.state().unwrap_or_else(|e| {
            warn!("Controller State Error: {}", e);
            ControllerState::default()
        });
    }

    fn x(&self) -> f64 { self.state.left_stick.x() }

    // The V5 stick reports up as positive.
    fn y(&self) -> f64 { -self.state.left_stick.y() }

    fn is_pressed(&self, button: ControllerButton) -> bool {
        let state = match button {
            ControllerButton::ButtonA => self.state.button_a,
            ControllerButton::ButtonB => self.state.button_b,
            ControllerButton::ButtonX => self.state.button_x,
            ControllerButton::ButtonY => self.state.button_y,
            ControllerButton::ButtonUp => self.state.button_up,
            ControllerButton::ButtonDown => self.state.button_down,
            ControllerButton::ButtonLeft => self.state.button_left,
            ControllerButton::ButtonRight => self.state.button_right,
            ControllerButton::ButtonL1 => self.state.button_l1,
            ControllerButton::ButtonL2 => self.state.button_l2,
            ControllerButton::ButtonR1 => self.state.button_r1,
            ControllerButton::ButtonR2 => self.state.button_r2,
        };
        state.is_pressed()
    }
}
