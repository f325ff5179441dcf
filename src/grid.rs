use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::Serialize;

use crate::action::Action;
use crate::calendar::{self, MonthIndex};
use crate::codec::PayloadCodec;
use crate::config::{Config, MAX_YEAR_SPAN};
use crate::decorator::DayDecorator;
use crate::error::{Error, ErrorKind, Result};

const COLUMNS: usize = 7;
const MONTH_PICKER_COLUMNS: usize = 6;
const BLANK_LABEL: &str = " ";

/// A single clickable cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new<S: Into<String>>(label: S, payload: String) -> Self {
        Button {
            label: label.into(),
            payload,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GridRow(pub Vec<Button>);

impl GridRow {
    pub fn buttons(&self) -> &[Button] {
        &self.0
    }
}

/// Rows of buttons, top to bottom.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GridMatrix {
    pub rows: Vec<GridRow>,
}

impl GridMatrix {
    /// Rows of a month grid preceding the week rows: controls and day names.
    pub const HEADER_ROWS: usize = 2;

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// The week rows of a month grid.
    pub fn body(&self) -> &[GridRow] {
        self.rows.get(Self::HEADER_ROWS..).unwrap_or(&[])
    }
}

pub struct GridBuilder<'a> {
    config: &'a Config,
    codec: &'a dyn PayloadCodec,
    decorator: &'a dyn DayDecorator,
}

impl<'a> GridBuilder<'a> {
    pub fn new(
        config: &'a Config,
        codec: &'a dyn PayloadCodec,
        decorator: &'a dyn DayDecorator,
    ) -> Self {
        GridBuilder {
            config,
            codec,
            decorator,
        }
    }

    fn payload(&self, action: Action, day: u32, month: &MonthIndex) -> String {
        self.codec
            .encode_action(action, day as i32, month.month_number() as i32, month.year())
    }

    fn control(&self, label: &str, action: Action, month: &MonthIndex) -> Button {
        Button::new(label, self.payload(action, 0, month))
    }

    fn blank(&self, month: &MonthIndex) -> Button {
        self.control(BLANK_LABEL, Action::SilentNoop, month)
    }

    fn day_button(&self, date: &NaiveDate, today: &NaiveDate, month: &MonthIndex) -> Button {
        let (label, unselectable) = self.decorator.render_label(date, today);
        let action = if unselectable {
            Action::SelectUnselectable
        } else {
            Action::SelectDay
        };

        Button::new(label, self.payload(action, date.day(), month))
    }

    fn header(&self, month: &MonthIndex, today: &NaiveDate) -> GridRow {
        let current = MonthIndex::from(today);
        let home = if current == *month {
            self.control(&self.config.home_label, Action::SilentNoop, month)
        } else {
            self.control(&self.config.home_label, Action::ShowSelected, &current)
        };

        GridRow(vec![
            self.control("<<", Action::PrevYear, month),
            self.control("<", Action::PrevMonth, month),
            self.control(
                self.config.month_name(month.month_number()),
                Action::SelectMonth,
                month,
            ),
            home,
            self.control(&month.year().to_string(), Action::SelectYear, month),
            self.control(">", Action::NextMonth, month),
            self.control(">>", Action::NextYear, month),
        ])
    }

    fn day_names(&self, month: &MonthIndex) -> GridRow {
        GridRow(
            self.config
                .day_names
                .iter()
                .map(|name| self.control(name, Action::SilentNoop, month))
                .collect(),
        )
    }

    /// Lays out `month` as a header row, a day-name row and one row per
    /// Monday-first week. Days outside the month are blank no-op cells.
    pub fn build(&self, month: &MonthIndex, today: &NaiveDate) -> Result<GridMatrix> {
        let start = calendar::first_of_month(&month.month(), month.year());
        let end = calendar::last_of_month(&month.month(), month.year());
        let (start, end) = start.zip(end).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("cannot render {}/{}", month.month_number(), month.year()),
            )
        })?;

        let week_rows = calendar::week_rows(&month.month(), month.year())? as usize;
        let last_day = end.day();
        let leading = calendar::weekday_from_monday(&start) as usize - 1;

        let mut rows = Vec::with_capacity(GridMatrix::HEADER_ROWS + week_rows);
        rows.push(self.header(month, today));
        rows.push(self.day_names(month));

        let mut days = start.iter_days().take(last_day as usize);

        let mut first = Vec::with_capacity(COLUMNS);
        first.extend(std::iter::repeat_with(|| self.blank(month)).take(leading));
        first.extend(
            days.by_ref()
                .take(COLUMNS - leading)
                .map(|date| self.day_button(&date, today, month)),
        );
        rows.push(GridRow(first));

        for _ in 0..week_rows.saturating_sub(2) {
            rows.push(GridRow(
                days.by_ref()
                    .take(COLUMNS)
                    .map(|date| self.day_button(&date, today, month))
                    .collect(),
            ));
        }

        let mut last: Vec<Button> = days
            .map(|date| self.day_button(&date, today, month))
            .collect();
        let trailing = COLUMNS.saturating_sub(last.len());
        last.extend(std::iter::repeat_with(|| self.blank(month)).take(trailing));
        rows.push(GridRow(last));

        Ok(GridMatrix { rows })
    }

    /// Twelve months in two rows, each confirming its month of `year`.
    pub fn month_picker(&self, year: i32) -> GridMatrix {
        let rows = (1..=12u32)
            .chunks(MONTH_PICKER_COLUMNS)
            .into_iter()
            .map(|chunk| {
                GridRow(
                    chunk
                        .map(|number| {
                            Button::new(
                                self.config.month_name(number),
                                self.codec
                                    .encode_action(Action::ShowSelected, 0, number as i32, year),
                            )
                        })
                        .collect(),
                )
            })
            .collect();

        GridMatrix { rows }
    }

    /// One row of years centred on the displayed year, keeping its month.
    /// The row never exceeds `MAX_YEAR_SPAN + 1` cells, whatever the config says.
    pub fn year_picker(&self, month: &MonthIndex) -> GridMatrix {
        let backward = self.config.years_backward.min(MAX_YEAR_SPAN);
        let forward = self.config.years_forward.min(MAX_YEAR_SPAN - backward);
        if (backward, forward) != (self.config.years_backward, self.config.years_forward) {
            log::warn!(
                "Year picker limited to {} years back and {} forward",
                backward,
                forward
            );
        }

        let first = month.year() - i32::from(backward);
        let last = month.year() + i32::from(forward);

        let row = (first..=last)
            .map(|year| {
                Button::new(
                    year.to_string(),
                    self.codec.encode_action(
                        Action::ShowSelected,
                        0,
                        month.month_number() as i32,
                        year,
                    ),
                )
            })
            .collect();

        GridMatrix {
            rows: vec![GridRow(row)],
        }
    }
}
