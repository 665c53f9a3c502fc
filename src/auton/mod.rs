//! Autonomous replay.
//!
//! Data flows from a play file to the motors:
//!
//! ```text
//! file -> Play (parse, sort) -> Scheduler (wait, dispatch) -> DriveManager
//! ```
//!
//! [`PlayList`](playlist::PlayList) sits on top, resolving the configured
//! play name to a play and running a scheduler over it.
//!
//! # Example
//!
//! ```ignore
//! use playbook::auton::playlist::PlayList;
//!
//! let plays = PlayList::from_dir("plays", "auto", ',')?;
//! plays.play("Left side two cubes", &mut motion, MotionMode::Pid);
//! ```

/// Play files: loading, parsing and writing.
pub mod play;
/// Play catalog and selection by name.
pub mod playlist;
/// Time-based waypoint replay.
pub mod scheduler;
/// Timestamped drive and turn commands.
pub mod waypoint;
