use chrono::{Datelike, Days, Months, NaiveDate};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A single-date month picker. Any date can be picked; it won't help.
#[derive(Debug)]
pub struct Calendar {
    /// The highlighted day. The month shown is always the cursor's month.
    cursor: NaiveDate,

    /// Today, for highlighting
    today: NaiveDate,
}

impl Calendar {
    /// Lines needed to draw the widget, borders included
    pub const HEIGHT: u16 = 10;

    /// Columns needed to draw the widget, borders included
    pub const WIDTH: u16 = 24;

    /// Start with the cursor on today
    pub fn new(today: NaiveDate) -> Self {
        Self {
            cursor: today,
            today,
        }
    }

    /// The day under the cursor
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// Move the cursor by some number of days. Stays put at the edges of
    /// time.
    pub fn move_days(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };

        if let Some(moved) = moved {
            self.cursor = moved;
        }
    }

    /// Move the cursor by some number of months, clamping the day to the end
    /// of shorter months.
    pub fn move_months(&mut self, months: i32) {
        let moved = if months >= 0 {
            self.cursor
                .checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.cursor
                .checked_sub_months(Months::new(months.unsigned_abs()))
        };

        if let Some(moved) = moved {
            self.cursor = moved;
        }
    }

    /// Jump back to today
    pub fn go_to_today(&mut self) {
        self.cursor = self.today;
    }

    /// What to select when the user presses space on the cursor: the cursor,
    /// unless it's already selected, in which case nothing.
    pub fn toggle(&self, selected: Option<NaiveDate>) -> Option<NaiveDate> {
        if selected == Some(self.cursor) {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Rows of the month grid, Sunday first. `None` pads days outside the
    /// month.
    fn weeks(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let Some(first) = self.cursor.with_day(1) else {
            return vec![];
        };

        let offset = first.weekday().num_days_from_sunday() as usize;
        let mut weeks = Vec::with_capacity(6);
        let mut week = [None; 7];

        for (slot, date) in (offset..).zip(first.iter_days()) {
            if date.month() != first.month() {
                break;
            }

            week[slot % 7] = Some(date);

            if slot % 7 == 6 {
                weeks.push(week);
                week = [None; 7];
            }
        }

        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }

        weeks
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, selected: Option<NaiveDate>) {
        let mut lines = vec![Line::from(
            ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
                .iter()
                .map(|day| Span::raw(format!("{day} ")).fg(Color::DarkGray))
                .collect::<Vec<_>>(),
        )];

        for week in self.weeks() {
            lines.push(Line::from(
                week.iter()
                    .map(|slot| match slot {
                        Some(date) => {
                            Span::styled(format!("{:>2} ", date.day()), self.style(*date, selected))
                        }
                        None => Span::raw("   "),
                    })
                    .collect::<Vec<_>>(),
            ));
        }

        let calendar = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.cursor.format("%B %Y").to_string()),
        );

        frame.render_widget(calendar, area);
    }

    fn style(&self, date: NaiveDate, selected: Option<NaiveDate>) -> Style {
        let mut style = Style::default();

        if date == self.today {
            style = style.fg(Color::Yellow);
        }

        if Some(date) == selected {
            style = style.bg(Color::Blue).fg(Color::White);
        }

        if date == self.cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }

        style
    }
}
