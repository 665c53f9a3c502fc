//! Drive-straight and turn maneuvers.
//!
//! [`MotionController`] owns the drive hardware and one [`Pid`] per axis.
//! Each maneuver comes in two flavours selected per call by [`MotionMode`]:
//!
//! - **PID**: the distance (averaged encoders) or heading (gyro) is fed to
//!   the axis controller and its limited output drives the motors until the
//!   controller reports done.
//! - **Dead reckoning**: the motors run at a fixed configured speed until
//!   the measurement reaches the target.
//!
//! Both flavours run through [`control_loop::run`], so every maneuver ends
//! with a zero command, and stops commanding the moment the robot is no
//! longer enabled in autonomous.
//!
//! # Usage
//!
//! ```
//! use playbook::{
//!     config::Config,
//!     fs::calibration::Calibration,
//!     motion::{control_loop::LoopExit, manager::{MotionController, MotionMode}},
//!     peripherals::mock::{MockRobot, Plant},
//! };
//!
//! let robot = MockRobot::new();
//! robot.set_plant(Plant::Linear { distance_per_output: 0.5, degrees_per_output: 2.0 });
//!
//! let mut motion = MotionController::new(robot.hardware(), &Config::default(), Calibration::default());
//! assert_eq!(motion.drive_straight(3.0, MotionMode::DeadReckoning), LoopExit::Done);
//! assert_eq!(robot.last_command(), Some((0.0, 0.0)));
//! ```

use log::info;

use super::{
    control_loop::{self, LoopExit, Maneuver},
    pid::{Pid, PidGains, pid::abscap},
};
use crate::{
    config::Config,
    fs::calibration::Calibration,
    peripherals::{Differential, DistanceEncoder, Gyro, Hardware, Joystick},
};

/// How a maneuver is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    /// Closed loop on the measured distance or heading.
    Pid,
    /// Fixed speed until the measurement reaches the target.
    DeadReckoning,
}

/// The operations a waypoint can ask of the drivetrain.
pub trait DriveManager {
    /// Drives straight for `distance` units.
    fn drive_straight(&mut self, distance: f64, mode: MotionMode) -> LoopExit;

    /// Turns in place by `degrees`.
    fn turn(&mut self, degrees: i32, mode: MotionMode) -> LoopExit;
}

/// Speeds and limits used by the maneuvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSettings {
    /// Drive PID output limit and dead-reckoning drive speed.
    pub drive_speed: f64,
    /// Turn PID output limit and dead-reckoning turn speed.
    pub turn_speed:  f64,
    /// Bias added to the left side while driving straight with PID.
    pub drive_trim:  f64,
}

impl From<&Config> for MotionSettings {
    fn from(config: &Config) -> Self {
        MotionSettings {
            drive_speed: config.drive_speed.abs(),
            turn_speed:  config.turn_speed.abs(),
            drive_trim:  config.drive_trim,
        }
    }
}

/// Drives the robot through straight and turn maneuvers.
pub struct MotionController {
    hardware:    Hardware,
    encoder_pid: Pid,
    gyro_pid:    Pid,
    settings:    MotionSettings,
}

impl MotionController {
    /// Builds the controller and applies the encoder calibration.
    pub fn new(mut hardware: Hardware, config: &Config, calibration: Calibration) -> Self {
        hardware
            .left_encoder
            .set_distance_per_pulse(calibration.left);
        hardware
            .right_encoder
            .set_distance_per_pulse(calibration.right);

        MotionController {
            hardware,
            encoder_pid: build_pid(config.encoder_gains(), config),
            gyro_pid: build_pid(config.gyro_pid, config),
            settings: MotionSettings::from(config),
        }
    }

    /// Re-reads gains, done policy and speeds from `config`.
    pub fn reload(&mut self, config: &Config) {
        self.encoder_pid = build_pid(config.encoder_gains(), config);
        self.gyro_pid = build_pid(config.gyro_pid, config);
        self.settings = MotionSettings::from(config);
        info!(
            "Reloaded motion gains: encoder {:?}, gyro {:?}",
            config.encoder_gains(),
            config.gyro_pid
        );
    }

    pub fn settings(&self) -> MotionSettings { self.settings }

    pub fn hardware(&self) -> &Hardware { &self.hardware }

    pub fn hardware_mut(&mut self) -> &mut Hardware { &mut self.hardware }

    /// Zeroes both encoders and the gyro.
    pub fn reset_measurements(&mut self) { self.hardware.reset_measurements(); }

    /// Operator arcade drive from a joystick.
    pub fn arcade(&mut self, joystick: &dyn Joystick) {
        self.hardware.drive.joystick_arcade(joystick);
    }

    pub fn stop(&mut self) { self.hardware.drive.stop(); }

    /// Drives straight for `distance` units.
    pub fn drive_straight(&mut self, distance: f64, mode: MotionMode) -> LoopExit {
        info!("Drive {} ({:?})", distance, mode);
        let Hardware {
            drive,
            left_encoder,
            right_encoder,
            state,
            ..
        } = &mut self.hardware;

        left_encoder.reset();
        right_encoder.reset();

        match mode {
            MotionMode::Pid => {
                let pid = &mut self.encoder_pid;
                pid.set_desired_value(distance);
                pid.reset();
                pid.calculate(0.0);

                control_loop::run(
                    &mut PidDrive {
                        pid,
                        left: &**left_encoder,
                        right: &**right_encoder,
                        drive,
                        limit: self.settings.drive_speed,
                        trim: self.settings.drive_trim,
                    },
                    &**state,
                )
            }
            MotionMode::DeadReckoning => control_loop::run(
                &mut DeadReckonDrive {
                    target: distance,
                    left: &**left_encoder,
                    right: &**right_encoder,
                    drive,
                    speed: self.settings.drive_speed,
                },
                &**state,
            ),
        }
    }

    /// Turns in place by `degrees`.
    pub fn turn(&mut self, degrees: i32, mode: MotionMode) -> LoopExit {
        info!("Turn {} ({:?})", degrees, mode);
        let Hardware {
            drive, gyro, state, ..
        } = &mut self.hardware;
        let target = f64::from(degrees);

        match mode {
            MotionMode::Pid => {
                let pid = &mut self.gyro_pid;
                pid.set_desired_value(target);
                gyro.reset(0.0);
                pid.reset();
                pid.calculate(0.0);

                control_loop::run(
                    &mut PidTurn {
                        pid,
                        gyro: &**gyro,
                        drive,
                        limit: self.settings.turn_speed,
                    },
                    &**state,
                )
            }
            MotionMode::DeadReckoning => {
                gyro.reset(0.0);
                control_loop::run(
                    &mut DeadReckonTurn {
                        target,
                        gyro: &**gyro,
                        drive,
                        speed: self.settings.turn_speed,
                    },
                    &**state,
                )
            }
        }
    }
}

impl DriveManager for MotionController {
    fn drive_straight(&mut self, distance: f64, mode: MotionMode) -> LoopExit {
        MotionController::drive_straight(self, distance, mode)
    }

    fn turn(&mut self, degrees: i32, mode: MotionMode) -> LoopExit {
        MotionController::turn(self, degrees, mode)
    }
}

fn build_pid(gains: PidGains, config: &Config) -> Pid {
    Pid::new(gains).with_done_policy(
        config.done_range.unwrap_or(gains.epsilon),
        config.min_done_cycles,
    )
}

fn average(left: &dyn DistanceEncoder, right: &dyn DistanceEncoder) -> f64 {
    (left.distance() + right.distance()) / 2.0
}

/// Whether `measured` has reached `target` coming from zero.
fn reached(measured: f64, target: f64) -> bool {
    if target >= 0.0 {
        measured >= target
    } else {
        measured <= target
    }
}

struct PidDrive<'a> {
    pid:   &'a mut Pid,
    left:  &'a dyn DistanceEncoder,
    right: &'a dyn DistanceEncoder,
    drive: &'a mut Differential,
    limit: f64,
    trim:  f64,
}

impl Maneuver for PidDrive<'_> {
    fn is_done(&mut self) -> bool { self.pid.is_done() }

    fn command(&mut self) {
        let output = abscap(
            self.pid.calculate(average(self.left, self.right)),
            self.limit,
        );
        self.drive
            .set_outputs(abscap(output + self.trim, self.limit), output);
    }

    fn stop(&mut self) { self.drive.stop(); }
}

struct DeadReckonDrive<'a> {
    target: f64,
    left:   &'a dyn DistanceEncoder,
    right:  &'a dyn DistanceEncoder,
    drive:  &'a mut Differential,
    speed:  f64,
}

impl Maneuver for DeadReckonDrive<'_> {
    fn is_done(&mut self) -> bool { reached(average(self.left, self.right), self.target) }

    fn command(&mut self) {
        let speed = self.speed.copysign(self.target);
        self.drive.set_outputs(speed, speed);
    }

    fn stop(&mut self) { self.drive.stop(); }
}

struct PidTurn<'a> {
    pid:   &'a mut Pid,
    gyro:  &'a dyn Gyro,
    drive: &'a mut Differential,
    limit: f64,
}

impl Maneuver for PidTurn<'_> {
    fn is_done(&mut self) -> bool { self.pid.is_done() }

    fn command(&mut self) {
        let output = abscap(self.pid.calculate(-self.gyro.angle()), self.limit);
        self.drive.set_outputs(output, -output);
    }

    fn stop(&mut self) { self.drive.stop(); }
}

struct DeadReckonTurn<'a> {
    target: f64,
    gyro:   &'a dyn Gyro,
    drive:  &'a mut Differential,
    speed:  f64,
}

impl Maneuver for DeadReckonTurn<'_> {
    fn is_done(&mut self) -> bool { reached(self.gyro.angle(), self.target) }

    fn command(&mut self) {
        let speed = self.speed.copysign(self.target);
        self.drive.set_outputs(speed, -speed);
    }

    fn stop(&mut self) { self.drive.stop(); }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::peripherals::mock::{MockRobot, Plant};

    fn controller(robot: &MockRobot, config: &Config) -> MotionController {
        MotionController::new(robot.hardware(), config, Calibration::default())
    }

    fn max_magnitude(commands: &[(f64, f64)]) -> f64 {
        commands
            .iter()
            .map(|(l, r)| l.abs().max(r.abs()))
            .fold(0.0, f64::max)
    }

    #[test]
    fn calibration_is_applied_to_encoders() {
        let robot = MockRobot::new();
        let _motion = MotionController::new(
            robot.hardware(),
            &Config::default(),
            Calibration {
                left:  0.02,
                right: 0.03,
            },
        );
        assert_eq!(robot.distance_per_pulse(), (0.02, 0.03));
    }

    #[test]
    fn pid_drive_finishes_when_measurement_jumps_to_target() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::JumpTo {
            distance: 10.0,
            heading:  0.0,
        });
        let config = Config {
            gyro_pid: PidGains::new(0.5, 0.0, 0.3, 0.1),
            drive_speed: 0.4,
            ..Config::default()
        };
        let mut motion = controller(&robot, &config);

        assert_eq!(motion.drive_straight(10.0, MotionMode::Pid), LoopExit::Done);

        let commands = robot.commands();
        assert_eq!(commands.last(), Some(&(0.0, 0.0)));
        assert!(max_magnitude(&commands) <= 0.4 + 1e-12);
        // One move, min_done_cycles in-range evaluations, then the stop.
        assert_eq!(commands.len(), config.min_done_cycles as usize + 2);
    }

    #[test]
    fn pid_drive_converges_on_linear_plant() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 0.2,
            degrees_per_output:  0.0,
        });
        let config = Config {
            gyro_pid: PidGains::new(0.4, 0.0, 0.0, 0.05),
            drive_speed: 0.5,
            drive_trim: 0.0,
            ..Config::default()
        };
        let mut motion = controller(&robot, &config);

        assert_eq!(motion.drive_straight(5.0, MotionMode::Pid), LoopExit::Done);
        assert_relative_eq!(robot.average_distance(), 5.0, epsilon = 0.05);
        assert!(max_magnitude(&robot.commands()) <= 0.5);
        assert_eq!(robot.encoder_resets(), 2);
    }

    #[test]
    fn pid_drive_trim_biases_left_side_within_limit() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 0.1,
            degrees_per_output:  0.0,
        });
        let config = Config {
            gyro_pid: PidGains::new(0.05, 0.0, 0.0, 0.05),
            drive_speed: 0.25,
            ..Config::default()
        };
        let mut motion = controller(&robot, &config);
        robot.disable_after_polls(3);

        motion.drive_straight(100.0, MotionMode::Pid);
        let (left, right) = robot.commands()[0];
        assert_relative_eq!(right, 0.25);
        assert_relative_eq!(left, 0.25);

        robot.clear_commands();
        robot.disable_after_polls(1);
        motion.drive_straight(2.0, MotionMode::Pid);
        let (left, right) = robot.commands()[0];
        assert_relative_eq!(right, 0.1);
        assert_relative_eq!(left, 0.1 + 0.0038);
    }

    #[test]
    fn pid_drive_stops_on_disable() {
        let robot = MockRobot::new();
        let mut motion = controller(&robot, &Config::default());
        robot.disable_after_polls(4);

        assert_eq!(motion.drive_straight(50.0, MotionMode::Pid), LoopExit::Aborted);
        let commands = robot.commands();
        assert_eq!(commands.len(), 5);
        assert_eq!(commands.last(), Some(&(0.0, 0.0)));
        assert_eq!(robot.polls(), 5);
    }

    #[test]
    fn dead_reckon_drive_runs_at_fixed_speed() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 1.0,
            degrees_per_output:  0.0,
        });
        let mut motion = controller(&robot, &Config::default());

        assert_eq!(
            motion.drive_straight(1.0, MotionMode::DeadReckoning),
            LoopExit::Done
        );
        assert_eq!(
            robot.commands(),
            vec![(0.25, 0.25), (0.25, 0.25), (0.25, 0.25), (0.25, 0.25), (0.0, 0.0)]
        );
    }

    #[test]
    fn dead_reckon_drive_backwards() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 1.0,
            degrees_per_output:  0.0,
        });
        let mut motion = controller(&robot, &Config::default());

        assert_eq!(
            motion.drive_straight(-0.5, MotionMode::DeadReckoning),
            LoopExit::Done
        );
        assert_eq!(robot.commands()[0], (-0.25, -0.25));
        assert_relative_eq!(robot.average_distance(), -0.5);
    }

    #[test]
    fn dead_reckon_drive_stops_on_disable() {
        let robot = MockRobot::new();
        let mut motion = controller(&robot, &Config::default());
        robot.disable_after_polls(2);

        assert_eq!(
            motion.drive_straight(10.0, MotionMode::DeadReckoning),
            LoopExit::Aborted
        );
        assert_eq!(
            robot.commands(),
            vec![(0.25, 0.25), (0.25, 0.25), (0.0, 0.0)]
        );
    }

    #[test]
    fn pid_turn_uses_negated_heading() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::JumpTo {
            distance: 0.0,
            heading:  -90.0,
        });
        let mut motion = controller(&robot, &Config::default());

        assert_eq!(motion.turn(90, MotionMode::Pid), LoopExit::Done);
        let commands = robot.commands();
        assert_eq!(commands[0], (0.25, -0.25));
        assert_eq!(commands.last(), Some(&(0.0, 0.0)));
        assert!(max_magnitude(&commands) <= 0.25);
        assert_eq!(robot.gyro_resets(), 1);
    }

    #[test]
    fn pid_turn_stops_on_disable() {
        let robot = MockRobot::new();
        let mut motion = controller(&robot, &Config::default());
        robot.disable_after_polls(1);

        assert_eq!(motion.turn(45, MotionMode::Pid), LoopExit::Aborted);
        assert_eq!(robot.commands().len(), 2);
        assert_eq!(robot.last_command(), Some((0.0, 0.0)));
    }

    #[test]
    fn dead_reckon_turn_both_directions() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 0.0,
            degrees_per_output:  20.0,
        });
        let mut motion = controller(&robot, &Config::default());

        assert_eq!(motion.turn(10, MotionMode::DeadReckoning), LoopExit::Done);
        assert_eq!(robot.commands()[0], (0.25, -0.25));
        assert_eq!(robot.heading(), 10.0);

        robot.clear_commands();
        assert_eq!(motion.turn(-10, MotionMode::DeadReckoning), LoopExit::Done);
        assert_eq!(robot.commands()[0], (-0.25, 0.25));
        assert_eq!(robot.heading(), -10.0);
    }

    #[test]
    fn dead_reckon_turn_stops_on_disable() {
        let robot = MockRobot::new();
        let mut motion = controller(&robot, &Config::default());
        robot.disable_after_polls(0);

        assert_eq!(motion.turn(30, MotionMode::DeadReckoning), LoopExit::Aborted);
        assert_eq!(robot.commands(), vec![(0.0, 0.0)]);
    }

    #[test]
    fn reload_replaces_speeds() {
        let robot = MockRobot::new();
        let mut motion = controller(&robot, &Config::default());
        motion.reload(&Config {
            drive_speed: -0.6,
            ..Config::default()
        });
        assert_eq!(motion.settings().drive_speed, 0.6);
    }
}
