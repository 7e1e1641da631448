use booker_core::Timer;
use crossterm::event::KeyEvent;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// A timer the booking page asked for is due
    TimerFired(Timer),

    /// A little time passed; spin the spinners
    TimePassed,

    /// Something bad happened; display it to the user
    Problem(String),
}
