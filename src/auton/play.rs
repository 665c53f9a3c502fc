//! Plays: named waypoint sequences loaded from files.
//!
//! A play file is UTF-8 text with one record per line:
//!
//! ```text
//! #Left side two cubes
//! // recorded 2015-02-14
//! 0, turn, 90
//! 1500, drive, 24.5
//! ```
//!
//! - A line starting with `#` names the play. When several are present the
//!   last one wins.
//! - Blank lines and `//` annotations are skipped.
//! - Every other line is a [`Waypoint`]. A line that does not parse is
//!   logged and dropped; the rest of the file still loads.
//!
//! The loaded waypoints are always sorted by trigger time. The sort is
//! stable, so waypoints sharing a trigger time keep their file order.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use super::waypoint::Waypoint;
use crate::{
    error::{PlaybookError, Result},
    fs::is_skipped_line,
};

/// An ordered, named collection of waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Play {
    name:      Option<String>,
    source:    PathBuf,
    waypoints: Vec<Waypoint>,
}

impl Play {
    /// Builds a play, sorting `waypoints` by trigger time.
    pub fn new(name: Option<String>, source: impl Into<PathBuf>, mut waypoints: Vec<Waypoint>) -> Self {
        waypoints.sort_by_key(Waypoint::trigger_ms);
        Play {
            name,
            source: source.into(),
            waypoints,
        }
    }

    /// Reads and parses the play file at `path`.
    ///
    /// # Errors
    ///
    /// [`PlaybookError::FileAccess`] if the file cannot be read. Malformed
    /// lines never fail the load.
    pub fn load(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PlaybookError::file_access(path, e))?;
        let play = Self::parse(&text, path, delimiter);
        info!(
            "Loaded play {:?} with {} waypoints from {}",
            play.name().unwrap_or("<unnamed>"),
            play.len(),
            path.display()
        );
        Ok(play)
    }

    /// Parses play file contents. `source` is only kept for reporting.
    pub fn parse(text: &str, source: impl Into<PathBuf>, delimiter: char) -> Self {
        let source = source.into();
        let mut name = None;
        let mut waypoints = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if is_skipped_line(line) {
                continue;
            }
            if let Some(rest) = line.trim_start().strip_prefix('#') {
                name = Some(rest.trim().to_string());
                continue;
            }
            match Waypoint::parse_line(line, index + 1, delimiter) {
                Ok(Some(waypoint)) => waypoints.push(waypoint),
                Ok(None) => {}
                Err(e) => warn!("{}: skipping {}", source.display(), e),
            }
        }

        Play::new(name, source, waypoints)
    }

    /// Display name from the last `#` line, if there was one.
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// The file this play was loaded from.
    pub fn source(&self) -> &Path { &self.source }

    /// Waypoints in ascending trigger time.
    pub fn waypoints(&self) -> &[Waypoint] { &self.waypoints }

    pub fn into_waypoints(self) -> Vec<Waypoint> { self.waypoints }

    pub fn len(&self) -> usize { self.waypoints.len() }

    pub fn is_empty(&self) -> bool { self.waypoints.is_empty() }

    /// Renders the play in file form: the name line, then one line per
    /// waypoint.
    pub fn render(&self, delimiter: char) -> String {
        let mut text = String::new();
        if let Some(name) = &self.name {
            text.push('#');
            text.push_str(name);
            text.push('\n');
        }
        for waypoint in &self.waypoints {
            text.push_str(&waypoint.to_line(delimiter));
            text.push('\n');
        }
        text
    }

    /// Writes [`render`](Self::render) to `path`, replacing its contents.
    pub fn write_to(&self, path: impl AsRef<Path>, delimiter: char) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render(delimiter)).map_err(|e| PlaybookError::file_access(path, e))
    }
}
