use crate::attempts::AttemptCount;
use crate::content::Outcome;

/// What "Join Waitlist" actually does.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WaitlistWiring {
    /// Close the outcome dialog and start a waitlist flow
    #[default]
    OpenWaitlist,

    /// Close the outcome dialog, then reopen the same one a moment later.
    /// The waitlist flow never starts. This is a known inconsistency kept
    /// around for anyone who wants the old behavior.
    ReopenOutcome,
}

/// Buttons on the outcome dialog.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutcomeChoice {
    /// "Join Waitlist for This Date"
    JoinWaitlist,

    /// "Try Again"
    TryAgain,
}

/// What the owner of the dialog should do after a choice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutcomeReply {
    /// Just close the dialog
    Close,

    /// Close the dialog; the user wants on the waitlist
    JoinWaitlist,
}

/// The failure dialog shown after a booking attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutcomeDialog {
    outcome: Outcome,
    attempts: AttemptCount,
}

impl OutcomeDialog {
    /// Show `outcome` to someone who has tried `attempts` times.
    pub fn new(outcome: Outcome, attempts: AttemptCount) -> Self {
        Self { outcome, attempts }
    }

    /// The text to display
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// How many attempts this dialog is reacting to
    pub fn attempts(&self) -> AttemptCount {
        self.attempts
    }

    /// Whether we offer the "Join Waitlist" button
    pub fn offers_waitlist(&self) -> bool {
        self.attempts.offers_waitlist()
    }

    /// Handle a button press. Returns `None` if the button isn't on offer, in
    /// which case the dialog stays open.
    pub fn choose(&self, choice: OutcomeChoice) -> Option<OutcomeReply> {
        match choice {
            OutcomeChoice::TryAgain => Some(OutcomeReply::Close),
            OutcomeChoice::JoinWaitlist if self.offers_waitlist() => {
                Some(OutcomeReply::JoinWaitlist)
            }
            OutcomeChoice::JoinWaitlist => None,
        }
    }
}
