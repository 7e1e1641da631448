use super::Action;
use booker_core::Schedule;
use tokio::time;

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    /// Wait a while, then deliver the timer back to the app
    Wait(Schedule),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self) -> Option<Action> {
        match self {
            Self::Wait(Schedule { after, timer }) => {
                tracing::trace!(?after, ?timer, "waiting");

                time::sleep(after).await;

                Some(Action::TimerFired(timer))
            }
        }
    }
}

impl From<Schedule> for Effect {
    fn from(schedule: Schedule) -> Self {
        Self::Wait(schedule)
    }
}
