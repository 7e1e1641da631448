use std::fmt::{self, Display};
use std::ops::Deref;

/// How many times the user has tried to book a date. Only ever goes up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AttemptCount(pub u32);

impl AttemptCount {
    /// Names start getting weird at this many attempts.
    pub const ABSURD_NAMES: u32 = 3;

    /// We start dropping hints at this many attempts.
    pub const HINT: u32 = 3;

    /// At this many attempts, messages stop following the script and get
    /// picked at random. This is also when the waitlist shows up.
    pub const RANDOM_MESSAGES: u32 = 5;

    /// At this many attempts, we pretend to think very hard before failing.
    pub const LOADING: u32 = 7;

    /// Nobody has tried anything yet.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Count one more attempt, returning the new count.
    pub fn increment(&mut self) -> Self {
        self.0 = self.0.saturating_add(1);
        *self
    }

    /// Should the booking card show the "try picking yesterday" hint?
    pub fn shows_hint(self) -> bool {
        self.0 >= Self::HINT
    }

    /// Should names come from the absurd pool?
    pub fn absurd_names(self) -> bool {
        self.0 >= Self::ABSURD_NAMES
    }

    /// Should messages be picked at random from the whole pool?
    pub fn random_messages(self) -> bool {
        self.0 >= Self::RANDOM_MESSAGES
    }

    /// Should the outcome dialog offer to join the waitlist?
    pub fn offers_waitlist(self) -> bool {
        self.0 >= Self::RANDOM_MESSAGES
    }

    /// Should confirming show a fake loading state first?
    pub fn needs_loading(self) -> bool {
        self.0 >= Self::LOADING
    }
}

impl Display for AttemptCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for AttemptCount {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
