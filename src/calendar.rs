use chrono::{Datelike, Month, NaiveDate, Weekday};
use num_traits::FromPrimitive;

use crate::error::{Error, ErrorKind, Result};

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    last_of_month(month, year).map_or(0, |date| date.day())
}

pub fn first_of_month(month: &Month, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
}

/// Last day of `month`, computed as the first of the following month minus one day.
pub fn last_of_month(month: &Month, year: i32) -> Option<NaiveDate> {
    if month.number_from_month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)
    }
    .and_then(|date| date.pred_opt())
}

/// Number of the last ISO week (52 or 53) of the given ISO week-numbering year.
pub fn last_iso_week(iso_year: i32) -> u32 {
    // Dec 28th always lies in the last ISO week of its year
    NaiveDate::from_ymd_opt(iso_year, 12, 28).map_or(52, |date| date.iso_week().week())
}

/// ISO weekday of `date` in 1..=7 with Monday as 1 and Sunday as 7.
pub fn weekday_from_monday(date: &NaiveDate) -> u32 {
    match date.weekday() {
        Weekday::Sun => 7,
        other => other.number_from_monday(),
    }
}

/// Number of Monday-first week rows needed to lay out `month`.
///
/// Counted from the ISO week numbers of the first and last day. When both days
/// fall into different ISO years (late December spilling into week 1, or early
/// January still belonging to week 52/53) the weeks of the first day's ISO year
/// are counted up to its last week and the remainder is added on top.
pub fn week_rows(month: &Month, year: i32) -> Result<u32> {
    let (start, end) = first_of_month(month, year)
        .zip(last_of_month(month, year))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("{} {} is out of range", month.name(), year),
            )
        })?;

    let start_week = start.iso_week();
    let end_week = end.iso_week();

    let rows = if start_week.year() != end_week.year() {
        (last_iso_week(start_week.year()) - start_week.week() + 1) + end_week.week()
    } else {
        end_week.week() - start_week.week() + 1
    };

    Ok(rows)
}

/// Strip any time-of-day component from a date-like value.
pub fn to_naive_date<D: Datelike>(date: &D) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), date.day())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    /// Month numbers outside 1..=12 yield `None`.
    pub fn from_numbers(month: i32, year: i32) -> Option<Self> {
        Month::from_i32(month).map(|index| MonthIndex { index, year })
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn month_number(&self) -> u32 {
        self.index.number_from_month()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next(&self) -> Self {
        let next_month = self.index.succ();

        MonthIndex {
            index: next_month,
            year: if next_month == Month::January {
                self.year + 1
            } else {
                self.year
            },
        }
    }

    pub fn prev(&self) -> Self {
        let prev_month = self.index.pred();

        MonthIndex {
            index: prev_month,
            year: if prev_month == Month::December {
                self.year - 1
            } else {
                self.year
            },
        }
    }

    pub fn next_year(&self) -> Self {
        MonthIndex {
            index: self.index,
            year: self.year + 1,
        }
    }

    pub fn prev_year(&self) -> Self {
        MonthIndex {
            index: self.index,
            year: self.year - 1,
        }
    }
}

impl<T: Datelike> From<&T> for MonthIndex {
    fn from(m: &T) -> Self {
        MonthIndex::new(Month::from_u32(m.month()).unwrap_or(Month::January), m.year())
    }
}
