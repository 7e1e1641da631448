use super::{ConfirmButton, OutcomeButton};
use booker_core::{
    waitlist::{FAILURE_ASIDE, FAILURE_MESSAGE, FAILURE_TITLE},
    OutcomeDialog, StepStatus, WaitlistFlow, WaitlistStage,
};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Dialogs shown above the booking card.
#[derive(Debug)]
pub enum Popover<'a> {
    /// Show a table of keyboard shortcuts
    Help,

    /// "This date is already booked by…"
    Outcome {
        dialog: OutcomeDialog,
        focus: OutcomeButton,
    },

    /// The waitlist flow, at whatever stage it's in
    Waitlist {
        flow: &'a WaitlistFlow,
        focus: ConfirmButton,
        spinner: &'static str,
    },
}

impl Popover<'_> {
    /// Render the popover centered over `body_area`
    pub fn render(&self, frame: &mut Frame<'_>, body_area: Rect) {
        match self {
            Popover::Help => {
                let popup_area = centered(body_area, 17);

                let popup = Table::new(
                    [
                        Row::new(vec!["? / F1", "Display this help"]),
                        Row::new(vec!["arrows / hjkl", "Move around the calendar"]),
                        Row::new(vec!["p / n", "Previous / next month"]),
                        Row::new(vec!["t", "Jump to today"]),
                        Row::new(vec!["space", "Select the highlighted date"]),
                        Row::new(vec!["enter / c", "Continue"]),
                        Row::new(vec!["escape", "Clear the selected date"]),
                        Row::new(vec!["q", "Quit / Close help"]),
                        Row::new(vec!["", ""]),
                        Row::new(vec!["tab (dialogs)", "Focus the next button"]),
                        Row::new(vec!["enter (dialogs)", "Press the focused button"]),
                        Row::new(vec!["w (error)", "Join the waitlist"]),
                        Row::new(vec!["t / esc (error)", "Try again"]),
                        Row::new(vec!["y / n (waitlist)", "Confirm / cancel"]),
                    ],
                    [Constraint::Max(18), Constraint::Fill(1)],
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Keyboard Shortcuts")
                        .padding(Padding::horizontal(1))
                        .border_style(Style::new().blue()),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }

            Popover::Outcome { dialog, focus } => {
                let outcome = dialog.outcome();

                let mut lines = vec![
                    Line::from("✗ Error").red().bold(),
                    Line::default(),
                    Line::from(vec![
                        Span::raw(format!("{} ", outcome.message)),
                        Span::raw(outcome.actor_name).cyan().bold(),
                        Span::raw(". Try another."),
                    ]),
                    Line::default(),
                ];

                if dialog.offers_waitlist() {
                    lines.push(button(
                        "Join Waitlist for This Date",
                        *focus == OutcomeButton::JoinWaitlist,
                    ));
                }
                lines.push(button("Try Again", *focus == OutcomeButton::TryAgain));

                render_dialog(frame, body_area, lines, Color::Red);
            }

            Popover::Waitlist {
                flow,
                focus,
                spinner,
            } => {
                let lines = match flow.stage() {
                    WaitlistStage::Running { .. } | WaitlistStage::Confirming { submitted: true } => {
                        let mut lines = vec![
                            Line::from("Joining Waitlist").bold(),
                            Line::from("Please wait while we process your request...").dim(),
                            Line::default(),
                        ];

                        lines.extend(flow.steps().map(|(label, status)| step(label, status, *spinner)));

                        lines
                    }

                    WaitlistStage::Confirming { submitted: false } => vec![
                        Line::from("✔ Almost There!").green().bold(),
                        Line::default(),
                        Line::from(
                            "You're about to join the waitlist for this date. Please confirm to proceed.",
                        ),
                        Line::default(),
                        button(
                            "Confirm & Join Waitlist",
                            *focus == ConfirmButton::Confirm,
                        ),
                        button("Cancel", *focus == ConfirmButton::Cancel),
                    ],

                    WaitlistStage::Failed => vec![
                        Line::from(format!("✗ {FAILURE_TITLE}")).red().bold(),
                        Line::default(),
                        Line::from(FAILURE_MESSAGE),
                        Line::from(FAILURE_ASIDE).dim().italic(),
                        Line::default(),
                        button("Try Another Date", true),
                    ],
                };

                let border = if matches!(flow.stage(), WaitlistStage::Failed) {
                    Color::Red
                } else {
                    Color::Blue
                };

                render_dialog(frame, body_area, lines, border);
            }
        }
    }
}

/// Center a box of the given height (and most of the width) over `area`
fn centered(area: Rect, height: u16) -> Rect {
    let popup_vert = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let popup_horiz = Layout::horizontal([Constraint::Percentage(60)]).flex(Flex::Center);

    let [popup_area] = popup_vert.areas(area);
    let [popup_area] = popup_horiz.areas(popup_area);

    popup_area
}

#[expect(clippy::cast_possible_truncation)]
fn render_dialog(frame: &mut Frame<'_>, body_area: Rect, lines: Vec<Line<'_>>, border: Color) {
    // +2 for the border, +2 for padding, and a little slack for wrapping
    let popup_area = centered(body_area, lines.len() as u16 + 6);

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::uniform(1))
                .border_style(Style::new().fg(border)),
        );

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

fn button(label: &str, focused: bool) -> Line<'static> {
    let line = Line::from(format!("[ {label} ]"));

    if focused {
        line.add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        line
    }
}

fn step(label: &'static str, status: StepStatus, spinner: &'static str) -> Line<'static> {
    match status {
        StepStatus::Complete => Line::from(vec![Span::raw("✔ ").green(), Span::raw(label).bold()]),
        StepStatus::InProgress => Line::from(vec![Span::raw(format!("{spinner} ")).blue(), Span::raw(label)]),
        StepStatus::Pending => Line::from(vec![Span::raw("○ "), Span::raw(label)]).dark_gray(),
    }
}
