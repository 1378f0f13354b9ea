//! Simulation time as a discrete step counter

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of clock steps that make up one accounting period.
pub const STEPS_PER_PERIOD: u64 = 16;

/// One period is a week; longer intervals are multiples of it.
pub const WEEK: u64 = 1;
pub const MONTH: u64 = 4;
pub const YEAR: u64 = 48;

/// An immutable point in simulation time, measured in steps since epoch.
///
/// `SimTime` is a plain value: advancing it returns a new value and the
/// total order is the order of the underlying step counts. Overflow is not
/// handled; a u64 step counter outlives any realistic run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn new(steps: u64) -> Self {
        Self(steps)
    }

    pub fn steps(self) -> u64 {
        self.0
    }

    /// Return a new time `steps` later. `self` is unchanged.
    pub fn advance(self, steps: u64) -> SimTime {
        SimTime(self.0 + steps)
    }

    /// Index of the period this time falls in.
    pub fn period(self) -> u64 {
        self.0 / STEPS_PER_PERIOD
    }

    /// Step offset within the current period.
    pub fn step_in_period(self) -> u64 {
        self.0 % STEPS_PER_PERIOD
    }

    pub fn is_period_start(self) -> bool {
        self.step_in_period() == 0
    }

    pub fn is_period_end(self) -> bool {
        self.step_in_period() == STEPS_PER_PERIOD - 1
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} (period {})", self.0, self.period())
    }
}
