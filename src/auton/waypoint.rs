//! Timestamped motion commands.
//!
//! A [`Waypoint`] pairs a trigger time, in milliseconds since the start of
//! autonomous, with the [`Action`] to run at that time. In a play file every
//! waypoint is one line of three delimited fields:
//!
//! ```text
//! 0, turn, 90
//! 1500, drive, 24.5
//! ```
//!
//! Extra fields after the magnitude are ignored.

use std::fmt;

use log::debug;

use crate::error::{PlaybookError, Result};

/// What a waypoint asks the drivetrain to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Drive straight, in the distance unit of the calibrated encoders.
    Drive { distance: f64 },
    /// Turn in place by a signed number of whole degrees.
    Turn { degrees: i32 },
}

impl Action {
    /// The lower-case keyword used in play files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Action::Drive { .. } => "drive",
            Action::Turn { .. } => "turn",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Drive { distance } => write!(f, "drive {}", distance),
            Action::Turn { degrees } => write!(f, "turn {}", degrees),
        }
    }
}

/// A motion command scheduled at a fixed offset from the start of autonomous.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    trigger_ms: u64,
    action:     Action,
}

impl Waypoint {
    pub const fn new(trigger_ms: u64, action: Action) -> Self { Waypoint { trigger_ms, action } }

    pub const fn drive(trigger_ms: u64, distance: f64) -> Self {
        Self::new(trigger_ms, Action::Drive { distance })
    }

    pub const fn turn(trigger_ms: u64, degrees: i32) -> Self {
        Self::new(trigger_ms, Action::Turn { degrees })
    }

    /// Milliseconds after the start of autonomous at which this waypoint runs.
    pub fn trigger_ms(&self) -> u64 { self.trigger_ms }

    pub fn action(&self) -> Action { self.action }

    /// Renders the waypoint as one play file line.
    pub fn to_line(&self, delimiter: char) -> String {
        let magnitude = match self.action {
            Action::Drive { distance } => distance.to_string(),
            Action::Turn { degrees } => degrees.to_string(),
        };
        format!(
            "{}{delimiter} {}{delimiter} {}",
            self.trigger_ms,
            self.action.keyword(),
            magnitude
        )
    }

    /// Parses one data line of a play file.
    ///
    /// Returns `Ok(None)` when the action keyword is neither `drive` nor
    /// `turn` (compared case-insensitively). A turn magnitude is truncated
    /// towards zero to whole degrees.
    ///
    /// # Errors
    ///
    /// [`PlaybookError::Parse`] tagged with `line_no` if the line has fewer
    /// than three fields or a field is not a valid number.
    pub fn parse_line(line: &str, line_no: usize, delimiter: char) -> Result<Option<Self>> {
        let mut fields = line.split(delimiter).map(str::trim);
        let (Some(time), Some(kind), Some(magnitude)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(PlaybookError::parse(
                line_no,
                format!("expected time{delimiter} kind{delimiter} magnitude"),
            ));
        };

        let is_turn = kind.eq_ignore_ascii_case("turn");
        if !is_turn && !kind.eq_ignore_ascii_case("drive") {
            debug!("line {}: ignoring action {:?}", line_no, kind);
            return Ok(None);
        }

        let trigger_ms: u64 = time
            .parse()
            .map_err(|_| PlaybookError::parse(line_no, format!("bad time {time:?}")))?;
        let value: f64 = magnitude
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| PlaybookError::parse(line_no, format!("bad magnitude {magnitude:?}")))?;

        let action = if is_turn {
            Action::Turn {
                degrees: value.trunc() as i32,
            }
        } else {
            Action::Drive { distance: value }
        };
        Ok(Some(Waypoint::new(trigger_ms, action)))
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}ms", self.action, self.trigger_ms)
    }
}
