use crate::attempts::AttemptCount;
use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::fmt::{self, Display};

/// Who booked the date, for the first few attempts.
pub const NORMAL_NAMES: [&str; 10] = [
    "@starboy98",
    "@glitterfrog",
    "@m4trixqueen",
    "@coolguy2003",
    "@luna_dreamer",
    "@pixel_warrior",
    "@neon_ninja",
    "@sarah_smith",
    "@john_doe123",
    "@musiclover99",
];

/// Who booked the date, once the user has been at it for a while.
pub const ABSURD_NAMES: [&str; 10] = [
    "@chronos_eater",
    "@calendar_devourer",
    "@timelord420",
    "@date_destroyer",
    "@temporal_vacuum",
    "@infinity_hopper",
    "@multiverse_monopoly",
    "@quantum_booker",
    "@void_scheduler",
    "@entropy_enthusiast",
];

/// Ways of saying "no". The first five are shown in order; after that we
/// pick from all of them.
pub const MESSAGES: [&str; 8] = [
    "This date is already booked by user",
    "Sorry, this date was just grabbed by",
    "Oh no… that date's booked by",
    "This date is reserved for",
    "Already taken by",
    "We're all out of dates. Time itself is fully reserved by",
    "The fabric of spacetime at this date belongs to",
    "This particular moment in history is owned by",
];

/// Get a random source. Pass a seed to get the same names and messages every
/// time; otherwise we seed from the clock.
#[expect(clippy::cast_sign_loss)]
pub fn rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::new(
            // We're OK with underflow if the clock is somehow pre-1970
            Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64,
            0xa02_bdbf_7bb3_c0a7, // Stream (default)
        ),
    }
}

/// Pick the name of whoever "already booked" the date.
pub fn pick_actor_name(attempts: AttemptCount, rng: &mut impl Rng) -> &'static str {
    let pool: &[&'static str] = if attempts.absurd_names() {
        &ABSURD_NAMES
    } else {
        &NORMAL_NAMES
    };

    pool[rng.gen_range(0..pool.len())]
}

/// Pick the message explaining why the date is taken. Early attempts get a
/// fixed script and never touch `rng`.
pub fn pick_message(attempts: AttemptCount, rng: &mut impl Rng) -> &'static str {
    if attempts.random_messages() {
        MESSAGES[rng.gen_range(0..MESSAGES.len())]
    } else {
        MESSAGES[(*attempts).min(4) as usize]
    }
}

/// What we show the user after they try to book something.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The fake user who got there first
    pub actor_name: &'static str,

    /// The excuse
    pub message: &'static str,
}

impl Outcome {
    /// Make up a fresh outcome for this many attempts.
    pub fn generate(attempts: AttemptCount, rng: &mut impl Rng) -> Self {
        Self {
            actor_name: pick_actor_name(attempts, rng),
            message: pick_message(attempts, rng),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}. Try another.", self.message, self.actor_name)
    }
}
