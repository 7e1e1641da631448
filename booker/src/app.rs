use crate::focus_ring;
use booker_core::{booking::HINT, Booking, OutcomeChoice, Schedule, WaitlistStage};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use layout::Flex;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::process::ExitCode;

mod action;
pub use action::Action;

mod calendar;
use calendar::Calendar;

mod effect;
pub use effect::Effect;

mod popover;
use popover::Popover;

focus_ring!(OutcomeButton, TryAgain, JoinWaitlist);
focus_ring!(ConfirmButton, Confirm, Cancel);

/// Frames for anything that's pretending to work
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The "functional core" of the app.
#[derive(Debug)]
pub struct App {
    /// The booking page we're showing
    booking: Booking,

    /// Where the user is in the date picker
    calendar: Calendar,

    /// Are we showing keyboard shortcuts?
    help: bool,

    /// Which button on the outcome dialog is focused
    outcome_focus: OutcomeButton,

    /// Which button on the waitlist confirmation is focused
    confirm_focus: ConfirmButton,

    /// Current spinner frame
    spinner: usize,

    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Set when we're done and want to exit with this code
    exit: Option<ExitCode>,
}

impl App {
    /// Create a new instance of the app
    pub fn new(booking: Booking, today: NaiveDate) -> Self {
        Self {
            booking,
            calendar: Calendar::new(today),
            help: false,
            outcome_focus: OutcomeButton::default(),
            confirm_focus: ConfirmButton::default(),
            spinner: 0,
            status_line: None,
            exit: None,
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]);
        let [body_area, status_area] = vertical.areas(frame.area());

        self.render_card(frame, body_area);

        let popover = if self.help {
            Some(Popover::Help)
        } else if let Some(flow) = self.booking.waitlist() {
            Some(Popover::Waitlist {
                flow,
                focus: self.confirm_focus,
                spinner: self.spinner_frame(),
            })
        } else {
            self.booking
                .outcome_dialog()
                .map(|dialog| Popover::Outcome {
                    focus: self.effective_outcome_focus(dialog.offers_waitlist()),
                    dialog,
                })
        };

        if let Some(popover) = popover {
            popover.render(frame, body_area);
        }

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => "Press ? for help",
        });

        frame.render_widget(status, status_area);
    }

    fn render_card(&self, frame: &mut Frame, body_area: Rect) {
        let card_vert = Layout::vertical([Constraint::Length(18)]).flex(Flex::Center);
        let card_horiz = Layout::horizontal([Constraint::Length(48)]).flex(Flex::Center);

        let [card_area] = card_vert.areas(body_area);
        let [card_area] = card_horiz.areas(card_area);

        let card = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(" Book Your Date ").bold().centered());
        let inner = card.inner(card_area);
        frame.render_widget(card, card_area);

        let [description_area, hint_area, _, calendar_area, _, button_area, attempts_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(Calendar::HEIGHT),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(inner);

        frame.render_widget(
            Paragraph::new("Select a date to schedule your appointment")
                .dim()
                .centered(),
            description_area,
        );

        if self.booking.shows_hint() {
            frame.render_widget(
                Paragraph::new(format!("{HINT} ;)")).italic().dim().centered(),
                hint_area,
            );
        }

        let [calendar_area] = Layout::horizontal([Constraint::Length(Calendar::WIDTH)])
            .flex(Flex::Center)
            .areas(calendar_area);
        self.calendar
            .render(frame, calendar_area, self.booking.selected_date());

        let button = if self.booking.is_loading() {
            Paragraph::new(format!("[ {} Loading... ]", self.spinner_frame()))
        } else {
            Paragraph::new("[ Continue ]")
        };
        let button = if self.booking.selected_date().is_none() || self.booking.is_loading() {
            button.dark_gray()
        } else {
            button.bold().reversed()
        };
        frame.render_widget(button.centered(), button_area);

        let attempts = self.booking.attempts();
        if *attempts > 0 {
            frame.render_widget(
                Paragraph::new(format!("Attempts: {attempts}")).dim().centered(),
                attempts_area,
            );
        }
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        let scheduled = match action {
            Action::Key(key) => self.handle_key(key),
            Action::TimerFired(timer) => self.booking.fire(timer),
            Action::TimePassed => {
                self.spinner = self.spinner.wrapping_add(1);

                vec![]
            }
            Action::Problem(problem) => {
                tracing::warn!(%problem, "problem reported to app");
                self.status_line = Some(problem);

                vec![]
            }
        };

        scheduled.into_iter().map(Effect::from).collect()
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Schedule> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = Some(ExitCode::SUCCESS);
            return vec![];
        }

        if self.help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('q' | '?') | KeyCode::F(1)
            ) {
                self.help = false;
            }

            return vec![];
        }

        if let Some(stage) = self.booking.waitlist().map(|flow| flow.stage().clone()) {
            return self.handle_waitlist_key(key, &stage);
        }

        if let Some(dialog) = self.booking.outcome_dialog() {
            return self.handle_outcome_key(key, dialog.offers_waitlist());
        }

        self.handle_booking_key(key)
    }

    fn handle_booking_key(&mut self, key: KeyEvent) -> Vec<Schedule> {
        match key.code {
            KeyCode::Char('q') => {
                self.exit = Some(ExitCode::SUCCESS);
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.help = true;
            }
            KeyCode::Left | KeyCode::Char('h') => self.calendar.move_days(-1),
            KeyCode::Right | KeyCode::Char('l') => self.calendar.move_days(1),
            KeyCode::Up | KeyCode::Char('k') => self.calendar.move_days(-7),
            KeyCode::Down | KeyCode::Char('j') => self.calendar.move_days(7),
            KeyCode::PageUp | KeyCode::Char('p') => self.calendar.move_months(-1),
            KeyCode::PageDown | KeyCode::Char('n') => self.calendar.move_months(1),
            KeyCode::Char('t') => self.calendar.go_to_today(),
            KeyCode::Char(' ') => {
                let date = self.calendar.toggle(self.booking.selected_date());
                self.booking.select_date(date);
            }
            KeyCode::Esc => self.booking.select_date(None),
            KeyCode::Enter | KeyCode::Char('c') => {
                if self.booking.selected_date().is_none() {
                    self.status_line = Some("Pick a date first (space selects)".to_owned());
                }

                return self.booking.confirm();
            }
            _ => {
                self.status_line = Some(format!("Unknown key {:?}", key.code));
            }
        }

        vec![]
    }

    fn handle_outcome_key(&mut self, key: KeyEvent, offers_waitlist: bool) -> Vec<Schedule> {
        let choice = match key.code {
            KeyCode::Tab if offers_waitlist => {
                self.outcome_focus = self.outcome_focus.next();
                None
            }
            KeyCode::BackTab if offers_waitlist => {
                self.outcome_focus = self.outcome_focus.prev();
                None
            }
            KeyCode::Enter => Some(match self.effective_outcome_focus(offers_waitlist) {
                OutcomeButton::TryAgain => OutcomeChoice::TryAgain,
                OutcomeButton::JoinWaitlist => OutcomeChoice::JoinWaitlist,
            }),
            KeyCode::Char('w') => Some(OutcomeChoice::JoinWaitlist),
            KeyCode::Char('t') | KeyCode::Esc => Some(OutcomeChoice::TryAgain),
            _ => None,
        };

        let Some(choice) = choice else {
            return vec![];
        };

        let scheduled = self.booking.choose_outcome(choice);

        if self.booking.outcome_dialog().is_none() {
            self.outcome_focus = OutcomeButton::default();
        }

        scheduled
    }

    fn handle_waitlist_key(&mut self, key: KeyEvent, stage: &WaitlistStage) -> Vec<Schedule> {
        let scheduled = match (stage, key.code) {
            (_, KeyCode::Esc) | (WaitlistStage::Failed, KeyCode::Enter) => {
                self.booking.close_waitlist()
            }

            (WaitlistStage::Confirming { submitted: false }, KeyCode::Tab) => {
                self.confirm_focus = self.confirm_focus.next();
                vec![]
            }
            (WaitlistStage::Confirming { submitted: false }, KeyCode::BackTab) => {
                self.confirm_focus = self.confirm_focus.prev();
                vec![]
            }
            (WaitlistStage::Confirming { submitted: false }, KeyCode::Enter) => {
                match self.confirm_focus {
                    ConfirmButton::Confirm => self.booking.confirm_waitlist(),
                    ConfirmButton::Cancel => self.booking.close_waitlist(),
                }
            }
            (WaitlistStage::Confirming { submitted: false }, KeyCode::Char('y')) => {
                self.booking.confirm_waitlist()
            }
            (WaitlistStage::Confirming { submitted: false }, KeyCode::Char('n')) => {
                self.booking.close_waitlist()
            }

            _ => vec![],
        };

        if self.booking.waitlist().is_none() {
            self.confirm_focus = ConfirmButton::default();
        }

        scheduled
    }

    /// "Join Waitlist" can only have focus if it's on screen
    fn effective_outcome_focus(&self, offers_waitlist: bool) -> OutcomeButton {
        if offers_waitlist {
            self.outcome_focus
        } else {
            OutcomeButton::TryAgain
        }
    }

    fn spinner_frame(&self) -> &'static str {
        SPINNER[self.spinner % SPINNER.len()]
    }
}
