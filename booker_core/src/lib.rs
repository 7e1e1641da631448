//! The functional core of booker: a booking page where every date is taken.

/// How many times the user has tried.
pub mod attempts;
pub use attempts::AttemptCount;

/// The booking page itself, tying everything else together.
pub mod booking;
pub use booking::Booking;

/// Made-up names and excuses.
pub mod content;
pub use content::Outcome;

/// The "this date is taken" dialog.
pub mod outcome;
pub use outcome::{OutcomeChoice, OutcomeDialog, WaitlistWiring};

/// Things that happen later, and how much later.
pub mod timer;
pub use timer::{Epoch, Schedule, Timer, Timings};

/// The waitlist that always fills up just before you get on it.
pub mod waitlist;
pub use waitlist::{StepStatus, WaitlistFlow, WaitlistStage};
