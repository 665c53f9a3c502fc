//! Records operator driving as a play file.
//!
//! While recording, the operator drives the robot arcade style. Each press
//! of a capture button appends one waypoint describing the motion since the
//! previous capture:
//!
//! - [`DRIVE_BUTTON`] records a drive of the average encoder distance.
//! - [`TURN_BUTTON`] records a turn of the gyro angle, in whole degrees.
//!
//! Encoders and gyro are zeroed after every capture. The first capture
//! fixes the time origin, so it is always written at `0` ms and later ones
//! at their offset from it. The output is a regular play file and can be
//! loaded back with [`Play::load`](crate::auton::play::Play::load).

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use log::{info, warn};

use crate::{
    auton::waypoint::{Action, Waypoint},
    error::{PlaybookError, Result},
    peripherals::{
        ControllerButton, Hardware, Joystick, RobotState,
        controller::{ButtonEvent, ButtonEvents},
    },
};

/// Captures a drive waypoint.
pub const DRIVE_BUTTON: ControllerButton = ControllerButton::ButtonA;
/// Captures a turn waypoint.
pub const TURN_BUTTON: ControllerButton = ControllerButton::ButtonB;

/// Appends captured waypoints to a play file.
pub struct Recorder {
    path:      PathBuf,
    delimiter: char,
    origin:    Option<Instant>,
    events:    ButtonEvents,
    recorded:  usize,
}

impl Recorder {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        let mut events = ButtonEvents::new();
        events.watch(DRIVE_BUTTON);
        events.watch(TURN_BUTTON);
        Recorder {
            path: path.into(),
            delimiter,
            origin: None,
            events,
            recorded: 0,
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Waypoints written so far.
    pub fn recorded(&self) -> usize { self.recorded }

    /// Records until operator control ends, then stops the drive.
    ///
    /// Any existing output file is removed first.
    ///
    /// # Errors
    ///
    /// [`PlaybookError::FileAccess`] if the output file cannot be removed
    /// or appended to. The drive is stopped in that case too.
    pub fn run(&mut self, hardware: &mut Hardware, joystick: &mut dyn Joystick) -> Result<usize> {
        info!("Recording operator input to {}", self.path.display());
        let result = self.clear().and_then(|()| self.capture(hardware, joystick));
        hardware.drive.stop();
        match &result {
            Ok(count) => info!("Recorded {} waypoints", count),
            Err(e) => warn!("Recording stopped: {}", e),
        }
        result
    }

    fn clear(&mut self) -> Result<()> {
        self.origin = None;
        self.recorded = 0;
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(PlaybookError::file_access(&self.path, e))
            }
            _ => Ok(()),
        }
    }

    fn capture(&mut self, hardware: &mut Hardware, joystick: &mut dyn Joystick) -> Result<usize> {
        loop {
            hardware.reset_measurements();
            let Some(action) = self.next_action(hardware, joystick) else {
                return Ok(self.recorded);
            };

            let now = Instant::now();
            let origin = *self.origin.get_or_insert(now);
            let trigger_ms = u64::try_from(now.duration_since(origin).as_millis()).unwrap_or(u64::MAX);
            self.append(&Waypoint::new(trigger_ms, action))?;
        }
    }

    /// Drives from the joystick until a capture button is pressed. `None`
    /// once operator control ends.
    fn next_action(&mut self, hardware: &mut Hardware, joystick: &mut dyn Joystick) -> Option<Action> {
        while operator_active(&*hardware.state) {
            joystick.update();
            self.events.update(joystick);
            hardware.drive.joystick_arcade(joystick);

            if self.events.event(DRIVE_BUTTON) == ButtonEvent::Pressed {
                return Some(Action::Drive {
                    distance: hardware.average_distance(),
                });
            }
            if self.events.event(TURN_BUTTON) == ButtonEvent::Pressed {
                return Some(Action::Turn {
                    degrees: hardware.gyro.angle().trunc() as i32,
                });
            }
        }
        None
    }

    fn append(&mut self, waypoint: &Waypoint) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PlaybookError::file_access(&self.path, e))?;
        writeln!(file, "{}", waypoint.to_line(self.delimiter))
            .map_err(|e| PlaybookError::file_access(&self.path, e))?;
        self.recorded += 1;
        info!("Captured {}", waypoint);
        Ok(())
    }
}

fn operator_active(state: &dyn RobotState) -> bool { state.is_enabled() && state.is_operator_control() }
