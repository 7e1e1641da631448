use std::fmt::{self, Display};
use std::time::Duration;

/// Identifies one attempt or one mounting of the waitlist flow. Timers
/// scheduled under an older epoch are stale and must not touch newer state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    /// The first epoch. Nothing has been mounted yet.
    pub fn zero() -> Self {
        Self(0)
    }

    /// The epoch after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that should happen once some time has passed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Timer {
    /// Stop pretending to load and show the outcome
    RevealOutcome,

    /// Show the last outcome again after it was closed to "join the waitlist".
    /// Stale once the user makes another attempt.
    ReopenOutcome(Epoch),

    /// Show a fresh outcome after the waitlist failed. Stale once the user
    /// makes another attempt.
    RetriggerOutcome(Epoch),

    /// Advance the waitlist flow mounted under the given epoch
    Waitlist(Epoch, WaitlistTimer),
}

/// Timers that only make sense inside a waitlist flow.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaitlistTimer {
    /// The in-progress step is done
    StepComplete,

    /// All steps are done; ask the user to confirm
    ShowConfirm,

    /// The user confirmed; tell them it didn't work
    ShowFailure,
}

/// A request to deliver `timer` back to whoever asked, after `after`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// How long to wait
    pub after: Duration,

    /// What to deliver when the wait is over
    pub timer: Timer,
}

impl Schedule {
    /// Build a new schedule request
    pub fn new(after: Duration, timer: Timer) -> Self {
        Self { after, timer }
    }
}

/// Every cosmetic delay in the app.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timings {
    /// Fake loading after too many attempts
    pub loading: Duration,

    /// Gap between closing the outcome dialog and reopening it
    pub reopen_outcome: Duration,

    /// How long each waitlist step takes
    pub waitlist_step: Duration,

    /// Pause after the last step before asking for confirmation
    pub waitlist_confirm: Duration,

    /// Pause between confirming and failing
    pub waitlist_failure: Duration,

    /// Pause between closing a failed waitlist and the next outcome
    pub retrigger_outcome: Duration,
}

impl Timings {
    /// Multiply every delay by `factor`, or `None` if any result would be
    /// negative, NaN, or too long for a `Duration`.
    #[must_use]
    pub fn checked_scaled(self, factor: f64) -> Option<Self> {
        let scale = |delay: Duration| Duration::try_from_secs_f64(delay.as_secs_f64() * factor).ok();

        Some(Self {
            loading: scale(self.loading)?,
            reopen_outcome: scale(self.reopen_outcome)?,
            waitlist_step: scale(self.waitlist_step)?,
            waitlist_confirm: scale(self.waitlist_confirm)?,
            waitlist_failure: scale(self.waitlist_failure)?,
            retrigger_outcome: scale(self.retrigger_outcome)?,
        })
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            loading: Duration::from_millis(2000),
            reopen_outcome: Duration::from_millis(500),
            waitlist_step: Duration::from_millis(1500),
            waitlist_confirm: Duration::from_millis(500),
            waitlist_failure: Duration::from_millis(800),
            retrigger_outcome: Duration::from_millis(300),
        }
    }
}
