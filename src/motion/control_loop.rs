//! The poll-and-command loop shared by every maneuver.
//!
//! Each maneuver (PID or dead-reckoned, drive or turn) only supplies three
//! things through [`Maneuver`]: a completion check, one command step and a
//! stop. [`run`] owns the ordering and the safety rules:
//!
//! 1. The completion check runs first on every pass.
//! 2. The robot state is read fresh on every pass; once the robot is not
//!    both enabled and autonomous the loop exits before commanding again.
//! 3. However the loop ends, including by panic, [`Maneuver::stop`] is the
//!    last thing sent to the motors.
//!
//! The loop never sleeps. It runs as fast as the hardware reads allow.

use log::debug;

use crate::peripherals::RobotState;

/// Why a maneuver loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The maneuver reached its target.
    Done,
    /// The robot left the enabled autonomous state first.
    Aborted,
}

/// One closed- or open-loop motion.
pub trait Maneuver {
    /// Whether the target has been reached. Polled before every command.
    fn is_done(&mut self) -> bool;

    /// Reads the measurement and sends one motor command.
    fn command(&mut self);

    /// Commands zero output.
    fn stop(&mut self);
}

/// Whether a maneuver may keep commanding motors.
pub fn may_command(state: &dyn RobotState) -> bool { state.is_enabled() && state.is_autonomous() }

struct StopGuard<'a, M: Maneuver + ?Sized>(&'a mut M);

impl<M: Maneuver + ?Sized> Drop for StopGuard<'_, M> {
    fn drop(&mut self) { self.0.stop(); }
}

/// Runs `maneuver` until it is done or the robot stops being enabled and
/// autonomous.
pub fn run<M: Maneuver + ?Sized>(maneuver: &mut M, state: &dyn RobotState) -> LoopExit {
    let guard = StopGuard(maneuver);
    let mut cycles: u64 = 0;
    let exit = loop {
        if guard.0.is_done() {
            break LoopExit::Done;
        }
        if !may_command(state) {
            break LoopExit::Aborted;
        }
        guard.0.command();
        cycles += 1;
    };
    debug!("Maneuver ended with {:?} after {} commands", exit, cycles);
    drop(guard);
    exit
}
