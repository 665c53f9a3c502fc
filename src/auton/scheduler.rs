//! Time-based waypoint replay.
//!
//! A [`Scheduler`] captures its start instant when it is constructed and
//! replays a sorted waypoint list against it. Before each waypoint it waits
//! until the waypoint's trigger time has elapsed, then runs the action on
//! the calling thread and only moves on once the action has returned.
//!
//! # Timing
//!
//! - A waypoint whose trigger time has already passed runs immediately.
//! - The wait can be cut short through an [`InterruptHandle`]. An
//!   interrupted wait is logged and the pending action runs right away; the
//!   wait is never resumed.
//! - An interrupt sent while an action is running is kept and ends the
//!   next wait.
//!
//! # Example
//!
//! ```
//! use playbook::{
//!     auton::{scheduler::Scheduler, waypoint::Waypoint},
//!     motion::{control_loop::LoopExit, manager::{DriveManager, MotionMode}},
//! };
//!
//! #[derive(Default)]
//! struct Recording(Vec<String>);
//!
//! impl DriveManager for Recording {
//!     fn drive_straight(&mut self, distance: f64, _: MotionMode) -> LoopExit {
//!         self.0.push(format!("drive {distance}"));
//!         LoopExit::Done
//!     }
//!     fn turn(&mut self, degrees: i32, _: MotionMode) -> LoopExit {
//!         self.0.push(format!("turn {degrees}"));
//!         LoopExit::Done
//!     }
//! }
//!
//! let mut drive = Recording::default();
//! let scheduler = Scheduler::from_waypoints(vec![Waypoint::drive(20, 3.0), Waypoint::turn(0, 90)]);
//! let report = scheduler.run(&mut drive, MotionMode::Pid);
//!
//! assert_eq!(drive.0, ["turn 90", "drive 3"]);
//! assert_eq!(report.executed, 2);
//! ```

use std::{
    path::Path,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, info, warn};

use super::{
    play::Play,
    waypoint::{Action, Waypoint},
};
use crate::{
    error::Result,
    motion::{
        control_loop::LoopExit,
        manager::{DriveManager, MotionMode},
    },
};

/// How the wait before a waypoint ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The trigger time had already passed.
    Immediate,
    /// The full wait elapsed.
    Elapsed,
    /// The wait was cut short by an [`InterruptHandle`].
    Interrupted,
}

/// Summary of one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Waypoints whose action was invoked.
    pub executed:    usize,
    /// Actions that ended because the robot left enabled autonomous.
    pub aborted:     usize,
    /// Waits that were cut short.
    pub interrupted: usize,
    /// Waypoints that were already due when their turn came.
    pub late:        usize,
}

/// Cuts a [`Scheduler`] wait short. Can be sent to another thread.
#[derive(Clone, Debug)]
pub struct InterruptHandle {
    tx: Sender<()>,
}

impl InterruptHandle {
    /// Interrupts the current wait, or the next one if the scheduler is not
    /// waiting. Returns `false` if an interrupt was already pending.
    pub fn interrupt(&self) -> bool { self.tx.try_send(()).is_ok() }
}

/// Replays a fixed waypoint list once.
pub struct Scheduler {
    waypoints:  Vec<Waypoint>,
    start:      Instant,
    interrupts: Receiver<()>,
    // Held so the channel never disconnects.
    handle:     InterruptHandle,
}

impl Scheduler {
    /// Creates a scheduler whose clock starts now.
    pub fn from_waypoints(mut waypoints: Vec<Waypoint>) -> Self {
        waypoints.sort_by_key(Waypoint::trigger_ms);
        let (tx, rx) = bounded(1);
        Scheduler {
            waypoints,
            start: Instant::now(),
            interrupts: rx,
            handle: InterruptHandle { tx },
        }
    }

    pub fn new(play: &Play) -> Self { Self::from_waypoints(play.waypoints().to_vec()) }

    /// Loads a play file and creates a scheduler for it.
    ///
    /// # Errors
    ///
    /// [`PlaybookError::FileAccess`](crate::error::PlaybookError::FileAccess)
    /// if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        Ok(Self::from_waypoints(
            Play::load(path, delimiter)?.into_waypoints(),
        ))
    }

    /// The instant trigger times are measured from.
    pub fn start(&self) -> Instant { self.start }

    pub fn waypoints(&self) -> &[Waypoint] { &self.waypoints }

    pub fn interrupt_handle(&self) -> InterruptHandle { self.handle.clone() }

    /// Replays every waypoint in order, blocking until the last action
    /// returns.
    pub fn run<D: DriveManager + ?Sized>(self, drive: &mut D, mode: MotionMode) -> ReplayReport {
        info!(
            "Replaying {} waypoints ({:?})",
            self.waypoints.len(),
            mode
        );
        let mut report = ReplayReport::default();

        for waypoint in &self.waypoints {
            match self.wait_for(waypoint) {
                WaitOutcome::Immediate => report.late += 1,
                WaitOutcome::Elapsed => {}
                WaitOutcome::Interrupted => {
                    warn!("Wait for {} interrupted, running it now", waypoint);
                    report.interrupted += 1;
                }
            }

            debug!("Running {}", waypoint);
            let exit = match waypoint.action() {
                Action::Drive { distance } => drive.drive_straight(distance, mode),
                Action::Turn { degrees } => drive.turn(degrees, mode),
            };
            report.executed += 1;
            if exit == LoopExit::Aborted {
                warn!("{} aborted: robot left enabled autonomous", waypoint);
                report.aborted += 1;
            }
        }

        info!("Replay finished: {:?}", report);
        report
    }

    fn wait_for(&self, waypoint: &Waypoint) -> WaitOutcome {
        let due = Duration::from_millis(waypoint.trigger_ms());
        let wait = due.saturating_sub(self.start.elapsed());
        if wait.is_zero() {
            return WaitOutcome::Immediate;
        }
        match self.interrupts.recv_timeout(wait) {
            Ok(()) => WaitOutcome::Interrupted,
            Err(_) => WaitOutcome::Elapsed,
        }
    }
}
