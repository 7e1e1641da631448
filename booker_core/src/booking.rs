use crate::attempts::AttemptCount;
use crate::content::Outcome;
use crate::outcome::{OutcomeChoice, OutcomeDialog, OutcomeReply, WaitlistWiring};
use crate::timer::{Epoch, Schedule, Timer, Timings};
use crate::waitlist::{WaitlistExit, WaitlistFlow};
use chrono::NaiveDate;
use rand_pcg::Pcg32;

/// Shown on the booking card once the user has been at it for a while
pub const HINT: &str = "Tip: Try picking yesterday";

/// The booking page: a date, a button, and a growing sense of futility.
///
/// Everything here is synchronous. Anything that should happen later comes
/// back as a `Schedule`, and the caller hands the `Timer` back to `fire` when
/// the time comes.
#[derive(Debug)]
pub struct Booking {
    /// The date the user picked, if any
    selected_date: Option<NaiveDate>,

    /// How many times the user has pressed "Continue" with a date picked
    attempts: AttemptCount,

    /// Are we pretending to think?
    loading: bool,

    /// The last outcome we made up. Kept around so the dialog can be shown
    /// again without making up a new one.
    outcome: Option<Outcome>,

    /// Is the outcome dialog visible?
    outcome_open: bool,

    /// The waitlist flow, if mounted. Closing drops it, so opening again
    /// always starts from scratch.
    waitlist: Option<WaitlistFlow>,

    /// Moves on with every attempt and every waitlist mount. Timers carry
    /// the epoch they were scheduled under so late ones can be dropped.
    epoch: Epoch,

    /// What "Join Waitlist" does
    wiring: WaitlistWiring,

    /// How long all the fake delays are
    timings: Timings,

    /// Where names and messages come from
    rng: Pcg32,
}

impl Booking {
    /// Create a new booking page with default timings and wiring.
    pub fn new(rng: Pcg32) -> Self {
        Self {
            selected_date: None,
            attempts: AttemptCount::zero(),
            loading: false,
            outcome: None,
            outcome_open: false,
            waitlist: None,
            epoch: Epoch::zero(),
            wiring: WaitlistWiring::default(),
            timings: Timings::default(),
            rng,
        }
    }

    /// Use different delays
    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Change what "Join Waitlist" does
    #[must_use]
    pub fn with_wiring(mut self, wiring: WaitlistWiring) -> Self {
        self.wiring = wiring;
        self
    }

    /// The date the user picked, if any
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// How many times the user has tried so far
    pub fn attempts(&self) -> AttemptCount {
        self.attempts
    }

    /// Are we pretending to look the date up?
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Should the card show `HINT`?
    pub fn shows_hint(&self) -> bool {
        self.attempts.shows_hint()
    }

    /// Whether "Continue" does anything right now. The dialogs are modal, so
    /// the button is out of reach while either one is up.
    pub fn can_confirm(&self) -> bool {
        self.selected_date.is_some()
            && !self.loading
            && !self.outcome_open
            && self.waitlist.is_none()
    }

    /// The outcome dialog, if it's visible
    pub fn outcome_dialog(&self) -> Option<OutcomeDialog> {
        if self.outcome_open {
            self.outcome
                .map(|outcome| OutcomeDialog::new(outcome, self.attempts))
        } else {
            None
        }
    }

    /// The waitlist flow, if it's mounted
    pub fn waitlist(&self) -> Option<&WaitlistFlow> {
        self.waitlist.as_ref()
    }

    /// Pick (or clear) a date.
    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        tracing::debug!(?date, "selecting date");
        self.selected_date = date;
    }

    /// The user pressed "Continue". Does nothing without a date, while we're
    /// already loading, or while a dialog is in the way.
    pub fn confirm(&mut self) -> Vec<Schedule> {
        if !self.can_confirm() {
            tracing::debug!(
                date = ?self.selected_date,
                loading = self.loading,
                "ignoring confirmation"
            );
            return vec![];
        }

        let attempts = self.attempts.increment();
        self.epoch = self.epoch.next();
        tracing::info!(%attempts, date = ?self.selected_date, "booking attempt");

        if attempts.needs_loading() {
            self.loading = true;

            vec![Schedule::new(self.timings.loading, Timer::RevealOutcome)]
        } else {
            self.show_fresh_outcome();

            vec![]
        }
    }

    /// The user pressed a button on the outcome dialog.
    pub fn choose_outcome(&mut self, choice: OutcomeChoice) -> Vec<Schedule> {
        let Some(dialog) = self.outcome_dialog() else {
            return vec![];
        };

        match dialog.choose(choice) {
            None => vec![],
            Some(OutcomeReply::Close) => {
                tracing::debug!("closing outcome dialog");
                self.outcome_open = false;

                vec![]
            }
            Some(OutcomeReply::JoinWaitlist) => {
                self.outcome_open = false;

                match self.wiring {
                    WaitlistWiring::OpenWaitlist => self.open_waitlist(),
                    WaitlistWiring::ReopenOutcome => {
                        tracing::debug!("closing outcome dialog to reopen it");

                        vec![Schedule::new(
                            self.timings.reopen_outcome,
                            Timer::ReopenOutcome(self.epoch),
                        )]
                    }
                }
            }
        }
    }

    /// The user pressed "Confirm & Join Waitlist".
    pub fn confirm_waitlist(&mut self) -> Vec<Schedule> {
        self.waitlist
            .as_mut()
            .and_then(WaitlistFlow::confirm)
            .into_iter()
            .collect()
    }

    /// The user closed the waitlist dialog, whether by cancelling or after
    /// it failed. If it failed, we line up another outcome.
    pub fn close_waitlist(&mut self) -> Vec<Schedule> {
        match self.waitlist.take().map(WaitlistFlow::close) {
            Some(WaitlistExit::AfterFailure) => vec![Schedule::new(
                self.timings.retrigger_outcome,
                Timer::RetriggerOutcome(self.epoch),
            )],
            Some(WaitlistExit::Cancelled) | None => vec![],
        }
    }

    /// Some time has passed and a timer we asked for is due.
    pub fn fire(&mut self, timer: Timer) -> Vec<Schedule> {
        match timer {
            Timer::RevealOutcome if self.loading => {
                self.loading = false;

                if self.waitlist.is_none() {
                    self.show_fresh_outcome();
                }

                vec![]
            }

            Timer::ReopenOutcome(epoch)
                if epoch == self.epoch && self.outcome.is_some() && self.waitlist.is_none() =>
            {
                tracing::debug!("reopening outcome dialog");
                self.outcome_open = true;

                vec![]
            }

            Timer::RetriggerOutcome(epoch)
                if epoch == self.epoch && !self.loading && self.waitlist.is_none() =>
            {
                self.show_fresh_outcome();

                vec![]
            }

            Timer::Waitlist(epoch, waitlist_timer) => match &mut self.waitlist {
                Some(flow) if flow.epoch() == epoch => {
                    flow.fire(waitlist_timer).into_iter().collect()
                }
                _ => {
                    tracing::debug!(%epoch, ?waitlist_timer, "dropping stale waitlist timer");

                    vec![]
                }
            },

            _ => {
                tracing::debug!(?timer, "ignoring timer");

                vec![]
            }
        }
    }

    /// Make up an outcome for the current attempt count and show it.
    fn show_fresh_outcome(&mut self) {
        let outcome = Outcome::generate(self.attempts, &mut self.rng);
        tracing::info!(attempts = %self.attempts, %outcome, "showing outcome");

        self.outcome = Some(outcome);
        self.outcome_open = true;
    }

    fn open_waitlist(&mut self) -> Vec<Schedule> {
        self.epoch = self.epoch.next();
        let (flow, first) = WaitlistFlow::open(self.epoch, self.timings);
        self.waitlist = Some(flow);

        vec![first]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::{self, ABSURD_NAMES, MESSAGES};
    use crate::timer::WaitlistTimer;
    use crate::waitlist::{StepStatus, WaitlistStage};
    use proptest::prelude::*;
    use proptest_state_machine::{prop_state_machine, ReferenceStateMachine, StateMachineTest};

    fn booking() -> Booking {
        Booking::new(content::rng(Some(7)))
    }

    fn with_date() -> Booking {
        let mut booking = booking();
        booking.select_date(NaiveDate::from_ymd_opt(2024, 2, 29));
        booking
    }

    /// Confirm and dismiss until we've made `n` attempts
    fn attempt(booking: &mut Booking, n: u32) {
        while *booking.attempts() < n {
            for schedule in booking.confirm() {
                booking.fire(schedule.timer);
            }
            booking.choose_outcome(OutcomeChoice::TryAgain);
        }
    }

    /// Deliver timers right away until nothing else is scheduled
    fn drain(booking: &mut Booking, mut pending: Vec<Schedule>) {
        while let Some(schedule) = pending.pop() {
            pending.extend(booking.fire(schedule.timer));
        }
    }

    #[test]
    fn confirm_without_date_is_a_no_op() {
        let mut booking = booking();

        assert!(booking.confirm().is_empty());
        assert_eq!(booking.attempts(), AttemptCount::zero());
        assert!(booking.outcome_dialog().is_none());
    }

    #[test]
    fn first_attempt_opens_dialog_immediately() {
        let mut booking = with_date();

        assert!(booking.confirm().is_empty());
        assert_eq!(booking.attempts(), AttemptCount(1));

        let dialog = booking.outcome_dialog().expect("dialog should be open");
        assert_eq!(dialog.outcome().message, MESSAGES[1]);
        assert!(!dialog.offers_waitlist());
    }

    #[test]
    fn seventh_attempt_loads_first() {
        let mut booking = with_date();
        attempt(&mut booking, 6);
        assert!(!booking.is_loading());

        let scheduled = booking.confirm();
        assert_eq!(
            scheduled,
            vec![Schedule::new(Timings::default().loading, Timer::RevealOutcome)]
        );
        assert!(booking.is_loading());
        assert!(!booking.can_confirm());
        assert!(booking.outcome_dialog().is_none());

        // pressing again while loading does nothing
        assert!(booking.confirm().is_empty());
        assert_eq!(booking.attempts(), AttemptCount(7));

        booking.fire(Timer::RevealOutcome);
        assert!(!booking.is_loading());
        assert!(booking.outcome_dialog().is_some());
    }

    #[test]
    fn hint_shows_from_third_attempt() {
        let mut booking = with_date();

        attempt(&mut booking, 2);
        assert!(!booking.shows_hint());

        attempt(&mut booking, 3);
        assert!(booking.shows_hint());
    }

    #[test]
    fn waitlist_happy_path_ends_in_failure() {
        let mut booking = with_date();
        attempt(&mut booking, 4);
        booking.confirm();

        let scheduled = booking.choose_outcome(OutcomeChoice::JoinWaitlist);
        assert!(booking.outcome_dialog().is_none());

        let epoch = booking.waitlist().expect("waitlist should be open").epoch();
        drain(&mut booking, scheduled);
        assert_eq!(
            booking.waitlist().map(WaitlistFlow::stage),
            Some(&WaitlistStage::Confirming { submitted: false })
        );

        let scheduled = booking.confirm_waitlist();
        assert_eq!(
            scheduled.iter().map(|s| s.timer).collect::<Vec<_>>(),
            vec![Timer::Waitlist(epoch, WaitlistTimer::ShowFailure)]
        );
        drain(&mut booking, scheduled);
        assert_eq!(
            booking.waitlist().map(WaitlistFlow::stage),
            Some(&WaitlistStage::Failed)
        );

        // closing after failure brings the outcome back without counting an attempt
        let scheduled = booking.close_waitlist();
        assert_eq!(
            scheduled,
            vec![Schedule::new(
                Timings::default().retrigger_outcome,
                Timer::RetriggerOutcome(epoch)
            )]
        );
        drain(&mut booking, scheduled);
        assert_eq!(booking.attempts(), AttemptCount(5));
        assert!(booking.outcome_dialog().is_some());
    }

    #[test]
    fn cancelling_waitlist_shows_nothing() {
        let mut booking = with_date();
        attempt(&mut booking, 4);
        booking.confirm();
        booking.choose_outcome(OutcomeChoice::JoinWaitlist);

        assert!(booking.close_waitlist().is_empty());
        assert!(booking.waitlist().is_none());
        assert!(booking.outcome_dialog().is_none());
    }

    #[test]
    fn reopened_waitlist_starts_over_and_ignores_old_timers() {
        let mut booking = with_date();
        attempt(&mut booking, 4);
        booking.confirm();

        let stale = booking.choose_outcome(OutcomeChoice::JoinWaitlist);
        booking.fire(stale[0].timer);
        booking.close_waitlist();

        booking.confirm();
        let fresh = booking.choose_outcome(OutcomeChoice::JoinWaitlist);
        assert_ne!(stale, fresh);

        // a timer from the first flow lands on the second one
        booking.fire(stale[0].timer);
        assert_eq!(
            booking.waitlist().map(|flow| flow.step_status(0)),
            Some(StepStatus::InProgress)
        );
        assert_eq!(
            booking.waitlist().map(WaitlistFlow::stage),
            Some(&WaitlistStage::Running {
                step: 0,
                completed: std::collections::BTreeSet::new()
            })
        );
    }

    /// Run the waitlist from the open outcome dialog all the way to failure,
    /// returning the timers it used along the way.
    fn fail_waitlist(booking: &mut Booking) -> Vec<Schedule> {
        let mut used = Vec::new();
        let mut pending = booking.choose_outcome(OutcomeChoice::JoinWaitlist);

        while let Some(schedule) = pending.pop() {
            used.push(schedule);
            pending.extend(booking.fire(schedule.timer));
        }

        let failure = booking.confirm_waitlist();
        used.extend(failure.iter().copied());
        drain(booking, failure);

        assert_eq!(
            booking.waitlist().map(WaitlistFlow::stage),
            Some(&WaitlistStage::Failed)
        );

        used
    }

    #[test]
    fn rejoining_after_failure_starts_over() {
        let mut booking = with_date();
        attempt(&mut booking, 4);
        booking.confirm();

        let old_timers = fail_waitlist(&mut booking);
        let retrigger = booking.close_waitlist();
        drain(&mut booking, retrigger);
        assert!(booking.outcome_dialog().is_some());

        let first = booking.choose_outcome(OutcomeChoice::JoinWaitlist);
        assert_eq!(
            booking.waitlist().map(WaitlistFlow::stage),
            Some(&WaitlistStage::Running {
                step: 0,
                completed: std::collections::BTreeSet::new()
            })
        );

        // nothing the failed flow scheduled moves the new one along
        for schedule in &old_timers {
            assert!(booking.fire(schedule.timer).is_empty());
        }
        assert_eq!(
            booking.waitlist().map(|flow| flow.step_status(0)),
            Some(StepStatus::InProgress)
        );

        // not even once the new flow is waiting on its own failure
        drain(&mut booking, first);
        booking.confirm_waitlist();
        for schedule in &old_timers {
            booking.fire(schedule.timer);
        }
        assert_eq!(
            booking.waitlist().map(WaitlistFlow::stage),
            Some(&WaitlistStage::Confirming { submitted: true })
        );
    }

    #[test]
    fn retrigger_is_dropped_once_the_user_tries_again() {
        let mut booking = with_date();
        attempt(&mut booking, 5);
        booking.confirm();

        fail_waitlist(&mut booking);
        let retrigger = booking.close_waitlist();
        assert_eq!(retrigger.len(), 1);

        // the user beats the retrigger to the button, reaching attempt 7
        let reveal = booking.confirm();
        assert!(booking.is_loading());

        drain(&mut booking, retrigger);
        assert!(booking.is_loading());
        assert!(booking.outcome_dialog().is_none());

        drain(&mut booking, reveal);
        assert!(!booking.is_loading());
        assert_eq!(booking.attempts(), AttemptCount(7));
        assert!(booking.outcome_dialog().is_some());
    }

    #[test]
    fn retrigger_leaves_a_newer_outcome_alone() {
        let mut booking = with_date();
        attempt(&mut booking, 4);
        booking.confirm();

        fail_waitlist(&mut booking);
        let retrigger = booking.close_waitlist();

        booking.confirm();
        let shown = booking.outcome_dialog().map(|d| *d.outcome());
        assert!(shown.is_some());

        drain(&mut booking, retrigger);
        assert_eq!(booking.outcome_dialog().map(|d| *d.outcome()), shown);
    }

    #[test]
    fn reopen_is_dropped_once_the_user_tries_again() {
        let mut booking = with_date().with_wiring(WaitlistWiring::ReopenOutcome);
        attempt(&mut booking, 5);
        booking.confirm();

        let reopen = booking.choose_outcome(OutcomeChoice::JoinWaitlist);
        assert!(booking.outcome_dialog().is_none());

        let reveal = booking.confirm();
        assert!(booking.is_loading());

        drain(&mut booking, reopen);
        assert!(booking.outcome_dialog().is_none());

        drain(&mut booking, reveal);
        assert!(booking.outcome_dialog().is_some());
    }

    #[test]
    fn reopen_wiring_brings_back_the_same_outcome() {
        let mut booking = with_date().with_wiring(WaitlistWiring::ReopenOutcome);
        attempt(&mut booking, 4);
        booking.confirm();
        let before = booking.outcome_dialog().map(|d| *d.outcome());

        let scheduled = booking.choose_outcome(OutcomeChoice::JoinWaitlist);
        assert!(booking.outcome_dialog().is_none());
        assert!(booking.waitlist().is_none());
        assert_eq!(
            scheduled,
            vec![Schedule::new(
                Timings::default().reopen_outcome,
                Timer::ReopenOutcome(booking.epoch)
            )]
        );

        drain(&mut booking, scheduled);
        assert_eq!(booking.outcome_dialog().map(|d| *d.outcome()), before);
    }

    #[test]
    fn absurd_names_after_enough_attempts() {
        let mut booking = with_date();
        attempt(&mut booking, 2);
        booking.confirm();

        let name = booking
            .outcome_dialog()
            .map(|d| d.outcome().actor_name)
            .unwrap_or_default();
        assert!(ABSURD_NAMES.contains(&name));
    }

    // Property Test
    #[derive(Debug, Clone)]
    enum Transition {
        SelectDate(Option<NaiveDate>),
        Confirm,
        TryAgain,
        JoinWaitlist,
        CloseWaitlist,
        FireReveal,
    }

    #[derive(Debug, Clone)]
    struct RefState {
        has_date: bool,
        attempts: u32,
        loading: bool,
        outcome_open: bool,
        waitlist_open: bool,
    }

    impl ReferenceStateMachine for RefState {
        type State = RefState;

        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(RefState {
                has_date: false,
                attempts: 0,
                loading: false,
                outcome_open: false,
                waitlist_open: false,
            })
            .boxed()
        }

        fn transitions(_: &Self::State) -> BoxedStrategy<Self::Transition> {
            prop_oneof![
                2 => proptest::option::of(crate::test::date()).prop_map(Transition::SelectDate),
                10 => Just(Transition::Confirm),
                5 => Just(Transition::TryAgain),
                2 => Just(Transition::JoinWaitlist),
                2 => Just(Transition::CloseWaitlist),
                3 => Just(Transition::FireReveal),
            ]
            .boxed()
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::SelectDate(date) => {
                    state.has_date = date.is_some();
                }
                Transition::Confirm => {
                    if state.has_date
                        && !state.loading
                        && !state.outcome_open
                        && !state.waitlist_open
                    {
                        state.attempts += 1;

                        if state.attempts >= AttemptCount::LOADING {
                            state.loading = true;
                        } else {
                            state.outcome_open = true;
                        }
                    }
                }
                Transition::TryAgain => {
                    state.outcome_open = false;
                }
                Transition::JoinWaitlist => {
                    if state.outcome_open && state.attempts >= AttemptCount::RANDOM_MESSAGES {
                        state.outcome_open = false;
                        state.waitlist_open = true;
                    }
                }
                Transition::CloseWaitlist => {
                    state.waitlist_open = false;
                }
                Transition::FireReveal => {
                    if state.loading {
                        state.loading = false;
                        state.outcome_open = !state.waitlist_open;
                    }
                }
            }

            state
        }
    }

    struct BookingStateMachine {}

    impl StateMachineTest for BookingStateMachine {
        type SystemUnderTest = Booking;

        type Reference = RefState;

        fn init_test(
            _: &<Self::Reference as proptest_state_machine::ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            booking()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            ref_state: &<Self::Reference as proptest_state_machine::ReferenceStateMachine>::State,
            transition: <Self::Reference as proptest_state_machine::ReferenceStateMachine>::Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::SelectDate(date) => {
                    state.select_date(date);
                }
                Transition::Confirm => {
                    state.confirm();
                }
                Transition::TryAgain => {
                    state.choose_outcome(OutcomeChoice::TryAgain);
                }
                Transition::JoinWaitlist => {
                    state.choose_outcome(OutcomeChoice::JoinWaitlist);
                }
                Transition::CloseWaitlist => {
                    state.close_waitlist();
                }
                Transition::FireReveal => {
                    state.fire(Timer::RevealOutcome);
                }
            }

            assert_eq!(*state.attempts(), ref_state.attempts);
            assert_eq!(state.is_loading(), ref_state.loading);
            assert_eq!(state.outcome_dialog().is_some(), ref_state.outcome_open);
            assert_eq!(state.waitlist().is_some(), ref_state.waitlist_open);

            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            _: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            assert!(
                !(state.outcome_dialog().is_some() && state.waitlist().is_some()),
                "both dialogs are open"
            );
        }
    }

    prop_state_machine! {
        #[test]
        fn state_machine(sequential 1..40 => BookingStateMachine);
    }
}
