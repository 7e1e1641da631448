use crate::timer::{Epoch, Schedule, Timer, Timings, WaitlistTimer};
use std::collections::BTreeSet;

/// The fake progress we pretend to make, in order.
pub const STEPS: [&str; 6] = [
    "Checking waitlist availability...",
    "Verifying user credentials...",
    "Analyzing booking patterns...",
    "Processing request...",
    "Contacting administrator...",
    "Finalizing registration...",
];

/// Title shown once the waitlist fails
pub const FAILURE_TITLE: &str = "Waitlist Full";

/// Explanation shown once the waitlist fails
pub const FAILURE_MESSAGE: &str = "Sorry, you're too late. The waitlist for this date is already full. Please try selecting another date.";

/// Small print under the failure
pub const FAILURE_ASIDE: &str = "(All dates are full too, by the way)";

/// Where a waitlist flow is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitlistStage {
    /// Working through `STEPS`. `step` is in progress (or `STEPS.len()` once
    /// everything is done) and `completed` holds the finished ones.
    Running {
        step: usize,
        completed: BTreeSet<usize>,
    },

    /// Asking the user to confirm. Once they have, `submitted` is set and we
    /// wait a beat before failing.
    Confirming { submitted: bool },

    /// It didn't work. It never works.
    Failed,
}

impl WaitlistStage {
    fn initial() -> Self {
        Self::Running {
            step: 0,
            completed: BTreeSet::new(),
        }
    }
}

/// How a single step should be drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    InProgress,
    Complete,
}

/// How a flow ended, so the owner knows whether to complain again.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaitlistExit {
    /// Closed before reaching the failure
    Cancelled,

    /// Closed after seeing "Waitlist Full"
    AfterFailure,
}

/// A multi-stage dialog that pretends to put you on a waitlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistFlow {
    epoch: Epoch,
    stage: WaitlistStage,
    timings: Timings,
}

impl WaitlistFlow {
    /// Start a brand new flow. Returns the timer for the first step, which the
    /// caller must schedule.
    pub fn open(epoch: Epoch, timings: Timings) -> (Self, Schedule) {
        tracing::debug!(%epoch, "opening waitlist flow");

        let flow = Self {
            epoch,
            stage: WaitlistStage::initial(),
            timings,
        };
        let first = flow.schedule(timings.waitlist_step, WaitlistTimer::StepComplete);

        (flow, first)
    }

    /// Which mounting this flow belongs to
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Where we are
    pub fn stage(&self) -> &WaitlistStage {
        &self.stage
    }

    /// How the step at `index` should be drawn
    pub fn step_status(&self, index: usize) -> StepStatus {
        match &self.stage {
            WaitlistStage::Running { step, completed } => {
                if completed.contains(&index) {
                    StepStatus::Complete
                } else if *step == index {
                    StepStatus::InProgress
                } else {
                    StepStatus::Pending
                }
            }
            WaitlistStage::Confirming { .. } | WaitlistStage::Failed => StepStatus::Complete,
        }
    }

    /// Every step label along with how it should be drawn
    pub fn steps(&self) -> impl Iterator<Item = (&'static str, StepStatus)> + '_ {
        STEPS
            .iter()
            .enumerate()
            .map(|(index, label)| (*label, self.step_status(index)))
    }

    /// Handle a timer meant for this flow. Timers that don't make sense for
    /// the current stage are dropped.
    pub fn fire(&mut self, timer: WaitlistTimer) -> Option<Schedule> {
        match (&mut self.stage, timer) {
            (WaitlistStage::Running { step, completed }, WaitlistTimer::StepComplete)
                if *step < STEPS.len() =>
            {
                completed.insert(*step);
                *step += 1;
                tracing::debug!(epoch = %self.epoch, step = *step, "waitlist step complete");

                if *step < STEPS.len() {
                    Some(self.schedule(self.timings.waitlist_step, WaitlistTimer::StepComplete))
                } else {
                    Some(self.schedule(self.timings.waitlist_confirm, WaitlistTimer::ShowConfirm))
                }
            }

            (WaitlistStage::Running { step, .. }, WaitlistTimer::ShowConfirm)
                if *step == STEPS.len() =>
            {
                tracing::debug!(epoch = %self.epoch, "asking for waitlist confirmation");
                self.stage = WaitlistStage::Confirming { submitted: false };

                None
            }

            (WaitlistStage::Confirming { submitted: true }, WaitlistTimer::ShowFailure) => {
                tracing::info!(epoch = %self.epoch, "waitlist is full");
                self.stage = WaitlistStage::Failed;

                None
            }

            (stage, timer) => {
                tracing::debug!(epoch = %self.epoch, ?stage, ?timer, "ignoring waitlist timer");

                None
            }
        }
    }

    /// The user pressed "Confirm & Join Waitlist". Only does anything while
    /// we're waiting for exactly that.
    pub fn confirm(&mut self) -> Option<Schedule> {
        match self.stage {
            WaitlistStage::Confirming { submitted: false } => {
                tracing::debug!(epoch = %self.epoch, "waitlist confirmed");
                self.stage = WaitlistStage::Confirming { submitted: true };

                Some(self.schedule(self.timings.waitlist_failure, WaitlistTimer::ShowFailure))
            }
            _ => None,
        }
    }

    /// Tear the flow down. Any timers still in flight for this epoch become
    /// stale.
    pub fn close(self) -> WaitlistExit {
        let exit = if self.stage == WaitlistStage::Failed {
            WaitlistExit::AfterFailure
        } else {
            WaitlistExit::Cancelled
        };

        tracing::debug!(epoch = %self.epoch, ?exit, "closing waitlist flow");

        exit
    }

    fn schedule(&self, after: std::time::Duration, timer: WaitlistTimer) -> Schedule {
        Schedule::new(after, Timer::Waitlist(self.epoch, timer))
    }
}
