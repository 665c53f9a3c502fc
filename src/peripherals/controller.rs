//! Controller buttons and press-edge detection.
//!
//! A [`Joystick`] only reports whether a button is held right now. Recording
//! needs discrete events instead: one waypoint per press, no matter how long
//! the button stays down. [`ButtonEvents`] tracks the previous level of up to
//! eight watched buttons and turns levels into edges.
//!
//! # Example
//!
//! ```
//! use playbook::peripherals::{
//!     controller::{ButtonEvent, ButtonEvents, ControllerButton},
//!     mock::MockJoystick,
//! };
//!
//! let stick = MockJoystick::new();
//! let mut events = ButtonEvents::new();
//! events.watch(ControllerButton::ButtonA);
//!
//! stick.press(ControllerButton::ButtonA);
//! events.update(&stick);
//! assert_eq!(events.event(ControllerButton::ButtonA), ButtonEvent::Pressed);
//!
//! events.update(&stick);
//! assert_eq!(events.event(ControllerButton::ButtonA), ButtonEvent::Held);
//! ```

use heapless::Vec;
use log::warn;

use super::Joystick;

/// Maximum number of buttons a [`ButtonEvents`] can watch.
pub const MAX_WATCHED_BUTTONS: usize = 8;

/// Enum for easily getting Controller Buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerButton {
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    ButtonUp,
    ButtonDown,
    ButtonLeft,
    ButtonRight,
    ButtonL1,
    ButtonL2,
    ButtonR1,
    ButtonR2,
}

/// The edge observed on a button between two updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Not held, and was not held before.
    Idle,
    /// Went down since the last update.
    Pressed,
    /// Still down.
    Held,
    /// Went up since the last update.
    Released,
}

/// Tracks the level of a single button.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonEdge {
    was_pressed: bool,
}

impl ButtonEdge {
    /// Feeds the current level and returns the resulting edge.
    pub fn update(&mut self, pressed: bool) -> ButtonEvent {
        let event = match (self.was_pressed, pressed) {
            (false, false) => ButtonEvent::Idle,
            (false, true) => ButtonEvent::Pressed,
            (true, true) => ButtonEvent::Held,
            (true, false) => ButtonEvent::Released,
        };
        self.was_pressed = pressed;
        event
    }
}

#[derive(Clone, Copy, Debug)]
struct Watched {
    button: ControllerButton,
    edge:   ButtonEdge,
    last:   ButtonEvent,
}

/// Edge detection for a small set of buttons.
#[derive(Clone, Debug, Default)]
pub struct ButtonEvents {
    watched: Vec<Watched, MAX_WATCHED_BUTTONS>,
}

impl ButtonEvents {
    pub fn new() -> Self { Self::default() }

    /// Starts tracking `button`. Watching a button twice is a no-op.
    ///
    /// Only [`MAX_WATCHED_BUTTONS`] buttons can be tracked; extra buttons
    /// are ignored with a warning.
    pub fn watch(&mut self, button: ControllerButton) {
        if self.watched.iter().any(|w| w.button == button) {
            return;
        }
        let entry = Watched {
            button,
            edge: ButtonEdge::default(),
            last: ButtonEvent::Idle,
        };
        if self.watched.push(entry).is_err() {
            warn!("Cannot watch {:?}: already tracking {} buttons", button, MAX_WATCHED_BUTTONS);
        }
    }

    /// Samples every watched button once.
    pub fn update(&mut self, joystick: &dyn Joystick) {
        for w in self.watched.iter_mut() {
            w.last = w.edge.update(joystick.is_pressed(w.button));
        }
    }

    /// The edge seen on `button` during the last [`update`](Self::update).
    ///
    /// Unwatched buttons always report [`ButtonEvent::Idle`].
    pub fn event(&self, button: ControllerButton) -> ButtonEvent {
        self.watched
            .iter()
            .find(|w| w.button == button)
            .map_or(ButtonEvent::Idle, |w| w.last)
    }
}
