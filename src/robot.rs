//! Competition mode entry points.
//!
//! [`Robot`] ties the configuration, the motion controller, the play
//! catalog and the recorder together. A competition runtime calls
//! [`autonomous`](Robot::autonomous) and [`driver`](Robot::driver) when the
//! field switches modes.
//!
//! # Example
//!
//! ```ignore
//! use playbook::{config::Config, robot::Robot};
//!
//! let config = Config::load("playbook.toml")?;
//! let mut robot = Robot::new(hardware, config);
//!
//! robot.autonomous();
//! robot.driver(&mut joystick)?;
//! ```

use std::{thread, time::Duration};

use log::{info, warn};

use crate::{
    auton::{playlist::PlayList, scheduler::ReplayReport},
    config::Config,
    error::Result,
    fs::calibration::Calibration,
    motion::manager::MotionController,
    opcontrol::recorder::Recorder,
    peripherals::{Hardware, Joystick},
};

/// Pause between drive updates when not recording.
const DRIVER_PERIOD: Duration = Duration::from_millis(5);

/// A robot running plays in autonomous.
pub struct Robot {
    motion: MotionController,
    config: Config,
}

impl Robot {
    /// Builds the robot, reading the encoder calibration named by the
    /// configuration. A missing calibration falls back to `1.0`.
    pub fn new(hardware: Hardware, config: Config) -> Self {
        let calibration = Calibration::load_or_default(&config.calibration_file, config.delimiter);
        Self::with_calibration(hardware, config, calibration)
    }

    pub fn with_calibration(hardware: Hardware, config: Config, calibration: Calibration) -> Self {
        let motion = MotionController::new(hardware, &config, calibration);
        Robot { motion, config }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn motion(&self) -> &MotionController { &self.motion }

    pub fn motion_mut(&mut self) -> &mut MotionController { &mut self.motion }

    /// Runs the configured play.
    ///
    /// Plays are read from the play directory on every call so files copied
    /// to the robot between matches are picked up. Returns `None` without
    /// moving if the directory cannot be read or the play is not found.
    pub fn autonomous(&mut self) -> Option<ReplayReport> {
        info!("Autonomous");
        self.motion.reset_measurements();

        let report = self.run_selected_play();

        self.motion.reset_measurements();
        self.motion.stop();
        report
    }

    fn run_selected_play(&mut self) -> Option<ReplayReport> {
        let Some(name) = self.config.play_to_use.as_deref() else {
            warn!("No play selected, not moving");
            return None;
        };
        let plays = match PlayList::from_dir(
            &self.config.play_dir,
            &self.config.play_extension,
            self.config.delimiter,
        ) {
            Ok(plays) => plays,
            Err(e) => {
                warn!("Cannot load plays: {}", e);
                return None;
            }
        };
        plays.play(name, &mut self.motion, self.config.motion_mode())
    }

    /// Runs driver control until the robot leaves operator control.
    ///
    /// With robot logging enabled the session is recorded to the output
    /// play file and the number of captured waypoints is returned.
    /// Otherwise the robot is simply driven arcade style and `0` is
    /// returned. The drive is stopped either way.
    pub fn driver(&mut self, joystick: &mut dyn Joystick) -> Result<usize> {
        if self.config.do_robot_logging {
            info!("Tele-op, recording");
            let mut recorder =
                Recorder::new(&self.config.output_play_file, self.config.delimiter);
            return recorder.run(self.motion.hardware_mut(), joystick);
        }

        info!("Tele-op");
        loop {
            let state = &self.motion.hardware().state;
            if !(state.is_enabled() && state.is_operator_control()) {
                break;
            }
            joystick.update();
            self.motion.arcade(joystick);
            thread::sleep(DRIVER_PERIOD);
        }
        self.motion.stop();
        Ok(0)
    }

    /// Replaces the configuration and reloads PID gains and speeds from it.
    pub fn reload_pid(&mut self, config: Config) {
        self.motion.reload(&config);
        self.config = config;
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::{
        motion::pid::PidGains,
        peripherals::{
            ControllerButton,
            mock::{JoystickFrame, MockJoystick, MockRobot, Plant},
        },
    };

    fn config(play_dir: &Path) -> Config {
        Config {
            play_dir: play_dir.to_path_buf(),
            play_to_use: Some("Auto".to_string()),
            use_pid: false,
            calibration_file: play_dir.join("missing-calibration.txt"),
            ..Config::default()
        }
    }

    fn moving_robot() -> MockRobot {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 1.0,
            degrees_per_output:  20.0,
        });
        robot
    }

    #[test]
    fn autonomous_runs_selected_play() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.auto"), "#Auto\n0, drive, 1\n0, turn, 10\n").unwrap();
        fs::write(dir.path().join("b.auto"), "#Other\n0, drive, 50\n").unwrap();
        let robot = moving_robot();
        let mut bot = Robot::new(robot.hardware(), config(dir.path()));

        let report = bot.autonomous().unwrap();
        assert_eq!(report.executed, 2);
        assert_eq!(report.aborted, 0);
        assert!(robot.commands().contains(&(0.25, -0.25)));
        assert_eq!(robot.last_command(), Some((0.0, 0.0)));
        assert_eq!(robot.distance_per_pulse(), (1.0, 1.0));
    }

    #[test]
    fn autonomous_without_plays_does_not_move() {
        let dir = tempfile::tempdir().unwrap();
        let robot = moving_robot();
        let mut bot = Robot::new(robot.hardware(), config(&dir.path().join("absent")));

        assert_eq!(bot.autonomous(), None);
        assert_eq!(robot.commands(), vec![(0.0, 0.0)]);
    }

    #[test]
    fn autonomous_without_selection_does_not_move() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.auto"), "#Auto\n0, drive, 1\n").unwrap();
        let robot = moving_robot();
        let mut bot = Robot::new(
            robot.hardware(),
            Config {
                play_to_use: None,
                ..config(dir.path())
            },
        );

        assert_eq!(bot.autonomous(), None);
        assert_eq!(robot.commands(), vec![(0.0, 0.0)]);
    }

    #[test]
    fn driver_without_logging_drives_arcade() {
        let dir = tempfile::tempdir().unwrap();
        let robot = moving_robot();
        robot.operator_control_for(2);
        let mut stick = MockJoystick::new();
        stick.script([JoystickFrame::axes(0.0, -0.5), JoystickFrame::axes(0.0, 0.0)]);
        let mut bot = Robot::new(robot.hardware(), config(dir.path()));

        assert_eq!(bot.driver(&mut stick).unwrap(), 0);
        assert_eq!(robot.commands()[0], (0.5, 0.5));
        assert_eq!(robot.last_command(), Some((0.0, 0.0)));
    }

    #[test]
    fn driver_with_logging_records() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("recorded.auto");
        let robot = moving_robot();
        robot.operator_control_for(2);
        let mut stick = MockJoystick::new();
        stick.script([
            JoystickFrame::axes(0.0, -1.0),
            JoystickFrame::axes(0.0, 0.0).with(ControllerButton::ButtonA),
        ]);
        let mut bot = Robot::new(
            robot.hardware(),
            Config {
                do_robot_logging: true,
                output_play_file: output.clone(),
                ..config(dir.path())
            },
        );

        assert_eq!(bot.driver(&mut stick).unwrap(), 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "0, drive, 1\n");
    }

    #[test]
    fn reload_pid_replaces_config() {
        let dir = tempfile::tempdir().unwrap();
        let robot = MockRobot::new();
        let mut bot = Robot::new(robot.hardware(), config(dir.path()));
        let gains = PidGains::new(1.0, 0.0, 0.0, 0.5);

        bot.reload_pid(Config {
            gyro_pid: gains,
            turn_speed: 0.7,
            ..config(dir.path())
        });
        assert_eq!(bot.config().gyro_pid, gains);
        assert_eq!(bot.motion().settings().turn_speed, 0.7);
    }
}
