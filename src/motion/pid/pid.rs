//! Single-axis PID controller with a consecutive-cycle completion policy.
//!
//! # Usage
//!
//! ```
//! use playbook::motion::pid::{Pid, PidGains};
//!
//! let mut pid = Pid::new(PidGains::new(0.08, 0.01, 0.3, 0.1));
//! pid.set_desired_value(24.0);
//! pid.reset();
//! pid.calculate(0.0); // prime at the known starting measurement
//!
//! let output = pid.calculate(3.0);
//! assert!(output > 0.0);
//! assert!(!pid.is_done());
//! ```

use log::trace;
use serde::Deserialize;

/// Default number of consecutive in-range evaluations before a maneuver is done.
pub const DEFAULT_MIN_DONE_CYCLES: u32 = 10;

/// Largest step added to the error sum in a single evaluation.
const ERROR_INCREMENT: f64 = 1.0;

/// The four tuning constants of a [`Pid`].
///
/// Configuration files store these as a four element list
/// `[kp, ki, kd, epsilon]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct PidGains {
    /// Proportional gain.
    pub kp:      f64,
    /// Integral gain.
    pub ki:      f64,
    /// Derivative gain.
    pub kd:      f64,
    /// Error band inside which the error sum is cleared instead of grown.
    ///
    /// Also the default done range of a controller built from these gains.
    pub epsilon: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64, epsilon: f64) -> Self {
        PidGains {
            kp,
            ki,
            kd,
            epsilon,
        }
    }
}

impl From<[f64; 4]> for PidGains {
    fn from([kp, ki, kd, epsilon]: [f64; 4]) -> Self { PidGains::new(kp, ki, kd, epsilon) }
}

/// A PID controller for one axis.
///
/// The controller does not own any hardware. Callers feed it measurements
/// through [`calculate`](Pid::calculate) and forward the returned output to
/// the motors themselves.
#[derive(Clone, Debug)]
pub struct Pid {
    gains:           PidGains,
    desired:         f64,
    error_sum:       f64,
    previous:        f64,
    max_output:      f64,
    done_range:      f64,
    min_done_cycles: u32,
    done_cycles:     u32,
}

impl Pid {
    /// Creates a controller with an output range of `[-1.0, 1.0]`, a done
    /// range equal to `gains.epsilon` and [`DEFAULT_MIN_DONE_CYCLES`].
    pub fn new(gains: PidGains) -> Self {
        Pid {
            gains,
            desired: 0.0,
            error_sum: 0.0,
            previous: 0.0,
            max_output: 1.0,
            done_range: gains.epsilon.abs(),
            min_done_cycles: DEFAULT_MIN_DONE_CYCLES,
            done_cycles: 0,
        }
    }

    /// Sets the completion policy.
    ///
    /// `min_done_cycles` is raised to 1 so a freshly reset controller never
    /// reports done.
    pub fn with_done_policy(mut self, done_range: f64, min_done_cycles: u32) -> Self {
        self.done_range = done_range.abs();
        self.min_done_cycles = min_done_cycles.max(1);
        self
    }

    /// Replaces the gains, keeping the controller state.
    pub fn tune(&mut self, gains: PidGains) { self.gains = gains; }

    pub fn gains(&self) -> PidGains { self.gains }

    /// Sets the symmetric limit applied to every output.
    pub fn set_max_output(&mut self, max_output: f64) { self.max_output = max_output.abs(); }

    pub fn set_desired_value(&mut self, desired: f64) { self.desired = desired; }

    pub fn desired_value(&self) -> f64 { self.desired }

    pub fn error_sum(&self) -> f64 { self.error_sum }

    pub fn previous_value(&self) -> f64 { self.previous }

    pub fn reset_error_sum(&mut self) { self.error_sum = 0.0; }

    /// Clears the previous measurement and the done counter.
    pub fn reset_previous_value(&mut self) {
        self.previous = 0.0;
        self.done_cycles = 0;
    }

    /// Resets all episode state. Call before every new maneuver.
    pub fn reset(&mut self) {
        self.reset_error_sum();
        self.reset_previous_value();
    }

    /// Evaluates the controller at `current` and returns the limited output.
    ///
    /// Every evaluation also advances the completion policy: the done
    /// counter grows while `|desired - current| <= done_range` and drops to
    /// zero otherwise.
    pub fn calculate(&mut self, current: f64) -> f64 {
        let error = self.desired - current;

        let p = self.gains.kp * error;

        if error > self.gains.epsilon {
            if self.error_sum < 0.0 {
                self.error_sum = 0.0;
            }
            self.error_sum += error.min(ERROR_INCREMENT);
        } else if error < -self.gains.epsilon {
            if self.error_sum > 0.0 {
                self.error_sum = 0.0;
            }
            self.error_sum += error.max(-ERROR_INCREMENT);
        } else {
            self.error_sum = 0.0;
        }
        let i = self.gains.ki * self.error_sum;

        let d = self.gains.kd * (current - self.previous);

        let output = abscap(p + i - d, self.max_output);
        self.previous = current;

        if error.abs() <= self.done_range {
            self.done_cycles = self.done_cycles.saturating_add(1);
        } else {
            self.done_cycles = 0;
        }

        trace!(
            "pid desired={:.3} current={:.3} p={:.3} i={:.3} d={:.3} out={:.3}",
            self.desired, current, p, i, d, output
        );
        output
    }

    /// Whether the error has been in range for enough consecutive evaluations.
    pub fn is_done(&self) -> bool { self.done_cycles >= self.min_done_cycles }
}

/// Limits `val` to `[-cap, cap]`.
pub fn abscap(val: f64, cap: f64) -> f64 {
    let cap = cap.abs();
    if val > cap {
        cap
    } else if val < -cap {
        -cap
    } else {
        val
    }
}
