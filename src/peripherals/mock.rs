//! In-memory hardware for tests and off-robot simulation.
//!
//! [`MockRobot`] is a shared handle to a tiny simulated robot. Every device
//! handle it hands out (drive, encoders, gyro, state) refers to the same
//! world, so a test can move the handles into a
//! [`MotionController`](crate::motion::manager::MotionController) and still
//! inspect what was commanded.
//!
//! The world can move in response to motor commands through a [`Plant`],
//! and the robot state can be scripted to drop out of autonomous after a
//! number of polls.
//!
//! # Example
//!
//! ```
//! use playbook::peripherals::{DriveOutputs, mock::{MockRobot, Plant}};
//!
//! let robot = MockRobot::new();
//! robot.set_plant(Plant::Linear { distance_per_output: 2.0, degrees_per_output: 0.0 });
//!
//! let mut drive = robot.drive();
//! drive.set_outputs(0.5, 0.5);
//! assert_eq!(robot.average_distance(), 1.0);
//! ```

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::{
    ControllerButton, Differential, DistanceEncoder, DriveOutputs, Gyro, Hardware, Joystick,
    RobotState, make_cloneable,
};

/// How the simulated world reacts to a motor command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Plant {
    /// Nothing moves; sensors only change when set explicitly.
    Static,
    /// Each command advances each encoder by `side * distance_per_output`
    /// and the heading by `(left - right) / 2 * degrees_per_output`.
    Linear {
        distance_per_output: f64,
        degrees_per_output:  f64,
    },
    /// The first non-zero command teleports the robot to the given distance
    /// and heading.
    JumpTo { distance: f64, heading: f64 },
}

#[derive(Debug)]
struct World {
    commands:       Vec<(f64, f64)>,
    plant:          Plant,
    left_raw:       f64,
    right_raw:      f64,
    left_scale:     f64,
    right_scale:    f64,
    heading:        f64,
    encoder_resets: usize,
    gyro_resets:    usize,
    enabled:        bool,
    autonomous:     bool,
    operator:       bool,
    polls:          usize,
    disable_after:  Option<usize>,
    operator_polls: Option<usize>,
}

impl Default for World {
    fn default() -> Self {
        World {
            commands:       Vec::new(),
            plant:          Plant::Static,
            left_raw:       0.0,
            right_raw:      0.0,
            left_scale:     1.0,
            right_scale:    1.0,
            heading:        0.0,
            encoder_resets: 0,
            gyro_resets:    0,
            enabled:        true,
            autonomous:     true,
            operator:       false,
            polls:          0,
            disable_after:  None,
            operator_polls: None,
        }
    }
}

impl World {
    fn apply(&mut self, left: f64, right: f64) {
        self.commands.push((left, right));
        match self.plant {
            Plant::Static => {}
            Plant::Linear {
                distance_per_output,
                degrees_per_output,
            } => {
                self.left_raw += left * distance_per_output;
                self.right_raw += right * distance_per_output;
                self.heading += (left - right) / 2.0 * degrees_per_output;
            }
            Plant::JumpTo { distance, heading } => {
                if left != 0.0 || right != 0.0 {
                    self.left_raw = distance / self.left_scale;
                    self.right_raw = distance / self.right_scale;
                    self.heading = heading;
                }
            }
        }
    }
}

/// Shared handle to a simulated robot.
#[derive(Clone, Debug)]
pub struct MockRobot {
    world: Rc<RefCell<World>>,
}

impl Default for MockRobot {
    fn default() -> Self { Self::new() }
}

impl MockRobot {
    /// A static, enabled robot in autonomous mode.
    pub fn new() -> Self {
        MockRobot {
            world: make_cloneable(World::default()),
        }
    }

    pub fn drive(&self) -> MockDrive { MockDrive(self.clone()) }

    pub fn left_encoder(&self) -> MockEncoder {
        MockEncoder {
            robot: self.clone(),
            side:  Side::Left,
        }
    }

    pub fn right_encoder(&self) -> MockEncoder {
        MockEncoder {
            robot: self.clone(),
            side:  Side::Right,
        }
    }

    pub fn gyro(&self) -> MockGyro { MockGyro(self.clone()) }

    pub fn state(&self) -> MockState { MockState(self.clone()) }

    /// Bundles every device of this robot.
    pub fn hardware(&self) -> Hardware {
        Hardware {
            drive:         Differential::new(self.drive()),
            left_encoder:  Box::new(self.left_encoder()),
            right_encoder: Box::new(self.right_encoder()),
            gyro:          Box::new(self.gyro()),
            state:         Box::new(self.state()),
        }
    }

    pub fn set_plant(&self, plant: Plant) { self.world.borrow_mut().plant = plant; }

    /// Every `(left, right)` command received so far.
    pub fn commands(&self) -> Vec<(f64, f64)> { self.world.borrow().commands.clone() }

    pub fn last_command(&self) -> Option<(f64, f64)> {
        self.world.borrow().commands.last().copied()
    }

    pub fn clear_commands(&self) { self.world.borrow_mut().commands.clear(); }

    /// Sets both encoders to report `left` and `right`.
    pub fn set_distances(&self, left: f64, right: f64) {
        let mut w = self.world.borrow_mut();
        w.left_raw = left / w.left_scale;
        w.right_raw = right / w.right_scale;
    }

    pub fn average_distance(&self) -> f64 {
        let w = self.world.borrow();
        (w.left_raw * w.left_scale + w.right_raw * w.right_scale) / 2.0
    }

    pub fn set_heading(&self, heading: f64) { self.world.borrow_mut().heading = heading; }

    pub fn heading(&self) -> f64 { self.world.borrow().heading }

    /// Distance-per-pulse constants applied to the `(left, right)` encoders.
    pub fn distance_per_pulse(&self) -> (f64, f64) {
        let w = self.world.borrow();
        (w.left_scale, w.right_scale)
    }

    pub fn encoder_resets(&self) -> usize { self.world.borrow().encoder_resets }

    pub fn gyro_resets(&self) -> usize { self.world.borrow().gyro_resets }

    pub fn set_enabled(&self, enabled: bool) { self.world.borrow_mut().enabled = enabled; }

    pub fn set_autonomous(&self, autonomous: bool) {
        self.world.borrow_mut().autonomous = autonomous;
    }

    /// Puts the robot in operator control for the next `polls` calls to
    /// [`RobotState::is_operator_control`].
    pub fn operator_control_for(&self, polls: usize) {
        let mut w = self.world.borrow_mut();
        w.autonomous = false;
        w.operator = true;
        w.operator_polls = Some(polls);
    }

    /// Reports enabled for the next `polls` calls to
    /// [`RobotState::is_enabled`], disabled afterwards.
    pub fn disable_after_polls(&self, polls: usize) {
        let mut w = self.world.borrow_mut();
        w.polls = 0;
        w.disable_after = Some(polls);
    }

    /// Number of `is_enabled` polls since the last
    /// [`disable_after_polls`](Self::disable_after_polls).
    pub fn polls(&self) -> usize { self.world.borrow().polls }
}

/// Drive output handle of a [`MockRobot`].
#[derive(Clone, Debug)]
pub struct MockDrive(MockRobot);

impl DriveOutputs for MockDrive {
    fn set_outputs(&mut self, left: f64, right: f64) {
        self.0.world.borrow_mut().apply(left, right);
    }
}

#[derive(Clone, Copy, Debug)]
enum Side {
    Left,
    Right,
}

/// Encoder handle of a [`MockRobot`].
#[derive(Clone, Debug)]
pub struct MockEncoder {
    robot: MockRobot,
    side:  Side,
}

impl DistanceEncoder for MockEncoder {
    fn reset(&mut self) {
        let mut w = self.robot.world.borrow_mut();
        w.encoder_resets += 1;
        match self.side {
            Side::Left => w.left_raw = 0.0,
            Side::Right => w.right_raw = 0.0,
        }
    }

    fn distance(&self) -> f64 {
        let w = self.robot.world.borrow();
        match self.side {
            Side::Left => w.left_raw * w.left_scale,
            Side::Right => w.right_raw * w.right_scale,
        }
    }

    fn set_distance_per_pulse(&mut self, distance_per_pulse: f64) {
        let mut w = self.robot.world.borrow_mut();
        match self.side {
            Side::Left => w.left_scale = distance_per_pulse,
            Side::Right => w.right_scale = distance_per_pulse,
        }
    }
}

/// Gyro handle of a [`MockRobot`].
#[derive(Clone, Debug)]
pub struct MockGyro(MockRobot);

impl Gyro for MockGyro {
    fn reset(&mut self, heading: f64) {
        let mut w = self.0.world.borrow_mut();
        w.gyro_resets += 1;
        w.heading = heading;
    }

    fn angle(&self) -> f64 { self.0.world.borrow().heading }
}

/// Robot state handle of a [`MockRobot`].
#[derive(Clone, Debug)]
pub struct MockState(MockRobot);

impl RobotState for MockState {
    fn is_enabled(&self) -> bool {
        let mut w = self.0.world.borrow_mut();
        w.polls += 1;
        match w.disable_after {
            Some(limit) => w.enabled && w.polls <= limit,
            None => w.enabled,
        }
    }

    fn is_autonomous(&self) -> bool { self.0.world.borrow().autonomous }

    fn is_operator_control(&self) -> bool {
        let mut guard = self.0.world.borrow_mut();
        let w = &mut *guard;
        match w.operator_polls {
            Some(0) => {
                w.operator = false;
                false
            }
            Some(left) => {
                w.operator_polls = Some(left - 1);
                w.operator
            }
            None => w.operator,
        }
    }
}

/// One sampled joystick state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoystickFrame {
    pub x:       f64,
    pub y:       f64,
    pub pressed: Vec<ControllerButton>,
}

impl JoystickFrame {
    /// A frame with the stick at `(x, y)` and no buttons held.
    pub fn axes(x: f64, y: f64) -> Self {
        JoystickFrame {
            x,
            y,
            pressed: Vec::new(),
        }
    }

    /// Same axes, with `button` held.
    pub fn with(mut self, button: ControllerButton) -> Self {
        self.pressed.push(button);
        self
    }
}

#[derive(Debug, Default)]
struct JoystickInner {
    current: JoystickFrame,
    script:  VecDeque<JoystickFrame>,
}

/// A scriptable joystick.
///
/// Each [`Joystick::update`] pops the next scripted frame; once the script
/// runs out the last state is kept.
#[derive(Clone, Debug, Default)]
pub struct MockJoystick {
    inner: Rc<RefCell<JoystickInner>>,
}

impl MockJoystick {
    pub fn new() -> Self { Self::default() }

    pub fn set_axes(&self, x: f64, y: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.current.x = x;
        inner.current.y = y;
    }

    pub fn press(&self, button: ControllerButton) {
        self.inner.borrow_mut().current.pressed.push(button);
    }

    pub fn release_all(&self) { self.inner.borrow_mut().current.pressed.clear(); }

    /// Queues frames to be applied one per update.
    pub fn script<I: IntoIterator<Item = JoystickFrame>>(&self, frames: I) {
        self.inner.borrow_mut().script.extend(frames);
    }
}

impl Joystick for MockJoystick {
    fn update(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(frame) = inner.script.pop_front() {
            inner.current = frame;
        }
    }

    fn x(&self) -> f64 { self.inner.borrow().current.x }

    fn y(&self) -> f64 { self.inner.borrow().current.y }

    fn is_pressed(&self, button: ControllerButton) -> bool {
        self.inner.borrow().current.pressed.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_one_world() {
        let robot = MockRobot::new();
        let mut hw = robot.hardware();
        robot.set_distances(2.0, 4.0);
        assert_eq!(hw.average_distance(), 3.0);

        hw.reset_measurements();
        assert_eq!(robot.average_distance(), 0.0);
        assert_eq!(robot.encoder_resets(), 2);
        assert_eq!(robot.gyro_resets(), 1);
    }

    #[test]
    fn linear_plant_turns_on_differential_output() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::Linear {
            distance_per_output: 1.0,
            degrees_per_output:  10.0,
        });
        let mut drive = robot.drive();
        drive.set_outputs(0.5, -0.5);
        assert_eq!(robot.heading(), 5.0);
        assert_eq!(robot.average_distance(), 0.0);
    }

    #[test]
    fn jump_plant_ignores_zero_commands() {
        let robot = MockRobot::new();
        robot.set_plant(Plant::JumpTo {
            distance: 10.0,
            heading:  0.0,
        });
        let mut drive = robot.drive();
        drive.set_outputs(0.0, 0.0);
        assert_eq!(robot.average_distance(), 0.0);
        drive.set_outputs(0.1, 0.1);
        assert_eq!(robot.average_distance(), 10.0);
    }

    #[test]
    fn scale_applies_to_distance() {
        let robot = MockRobot::new();
        let mut left = robot.left_encoder();
        left.set_distance_per_pulse(0.5);
        robot.set_distances(3.0, 0.0);
        assert_eq!(left.distance(), 3.0);
        assert_eq!(robot.distance_per_pulse(), (0.5, 1.0));
    }

    #[test]
    fn disable_after_polls() {
        let robot = MockRobot::new();
        let state = robot.state();
        robot.disable_after_polls(2);
        assert!(state.is_enabled());
        assert!(state.is_enabled());
        assert!(!state.is_enabled());
        assert_eq!(robot.polls(), 3);
    }

    #[test]
    fn operator_control_countdown() {
        let robot = MockRobot::new();
        let state = robot.state();
        robot.operator_control_for(1);
        assert!(!state.is_autonomous());
        assert!(state.is_operator_control());
        assert!(!state.is_operator_control());
    }

    #[test]
    fn joystick_script_advances_per_update() {
        let mut stick = MockJoystick::new();
        stick.script([
            JoystickFrame::axes(0.1, 0.2),
            JoystickFrame::axes(0.0, 0.0).with(ControllerButton::ButtonA),
        ]);
        stick.update();
        assert_eq!(stick.x(), 0.1);
        stick.update();
        assert!(stick.is_pressed(ControllerButton::ButtonA));
        stick.update();
        assert!(stick.is_pressed(ControllerButton::ButtonA));
    }
}
