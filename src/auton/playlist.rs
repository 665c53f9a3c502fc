//! A catalog of plays selectable by name.
//!
//! The catalog is built once from a set of play files, usually every file
//! with the play extension in the configured play directory. A file that
//! cannot be read is logged and left out; building the catalog never fails
//! because of one bad file.
//!
//! Names are compared by content. If two files carry the same name, the one
//! loaded first wins and the other is unreachable by name. Directory scans
//! load files in path order so the winner does not depend on the
//! filesystem.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use super::{
    play::Play,
    scheduler::{ReplayReport, Scheduler},
};
use crate::{
    error::{PlaybookError, Result},
    motion::manager::{DriveManager, MotionMode},
};

/// Plays loaded from a directory or file list.
#[derive(Clone, Debug, Default)]
pub struct PlayList {
    plays: Vec<Play>,
}

impl PlayList {
    /// Loads every file in `files`, in the given order.
    pub fn from_files<I, P>(files: I, delimiter: char) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut list = PlayList::default();
        for file in files {
            match Play::load(file.as_ref(), delimiter) {
                Ok(play) => list.insert(play),
                Err(e) => warn!("Leaving play out of the catalog: {}", e),
            }
        }
        info!("Play catalog holds {} plays", list.len());
        list
    }

    /// Loads every file in `dir` whose extension is `extension`.
    ///
    /// # Errors
    ///
    /// [`PlaybookError::FileAccess`] if the directory itself cannot be
    /// listed.
    pub fn from_dir(dir: impl AsRef<Path>, extension: &str, delimiter: char) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| PlaybookError::file_access(dir, e))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
            .collect();
        files.sort();
        debug!(
            "Found {} .{} files in {}",
            files.len(),
            extension,
            dir.display()
        );

        Ok(Self::from_files(files, delimiter))
    }

    /// Adds a play. A play whose name is already taken is kept but can only
    /// be reached through [`plays`](Self::plays).
    pub fn insert(&mut self, play: Play) {
        match play.name() {
            Some(name) if self.find(name).is_some() => warn!(
                "Play name {:?} in {} is already used, keeping the earlier play",
                name,
                play.source().display()
            ),
            Some(_) => {}
            None => debug!("{} has no name line", play.source().display()),
        }
        self.plays.push(play);
    }

    /// The first play named `name`.
    pub fn find(&self, name: &str) -> Option<&Play> {
        self.plays.iter().find(|play| play.name() == Some(name))
    }

    /// Names of every named play, in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> { self.plays.iter().filter_map(Play::name) }

    pub fn plays(&self) -> &[Play] { &self.plays }

    pub fn len(&self) -> usize { self.plays.len() }

    pub fn is_empty(&self) -> bool { self.plays.is_empty() }

    /// Replays the play named `name` on `drive`.
    ///
    /// Returns `None` without touching `drive` if no play has that name.
    pub fn play<D: DriveManager + ?Sized>(
        &self,
        name: &str,
        drive: &mut D,
        mode: MotionMode,
    ) -> Option<ReplayReport> {
        let Some(play) = self.find(name) else {
            warn!("No play named {:?}, not moving", name);
            return None;
        };
        info!("Running play {:?} from {}", name, play.source().display());
        Some(Scheduler::new(play).run(drive, mode))
    }
}
