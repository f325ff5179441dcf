use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::convert::TryFrom;

use crate::action::Action;
use crate::calendar::{to_naive_date, MonthIndex};
use crate::codec::{CallbackCodec, Payload, PayloadCodec};
use crate::config::Config;
use crate::decorator::{DayDecorator, Decorator};
use crate::error::Result;
use crate::grid::{GridBuilder, GridMatrix};

/// A day the user clicked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub date: NaiveDate,
    pub unselectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Reply {
    /// Replace the keyboard with this grid.
    Grid(GridMatrix),
    /// A day was picked, no new grid.
    Selected(Selection),
    /// Nothing to do.
    Empty,
}

impl Reply {
    pub fn grid(&self) -> Option<&GridMatrix> {
        match self {
            Reply::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Reply::Selected(selection) => Some(selection),
            _ => None,
        }
    }
}

/// Answers button clicks. Holds no state besides its config snapshot, so every
/// reply depends only on the payload and the reference time.
pub struct Navigator<'a, C = CallbackCodec, D = Decorator> {
    config: &'a Config,
    codec: C,
    decorator: D,
}

impl<'a> Navigator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Navigator {
            config,
            codec: CallbackCodec,
            decorator: Decorator::new(config.decorations.clone(), config.unselectable.clone()),
        }
    }
}

impl<'a, C: PayloadCodec, D: DayDecorator> Navigator<'a, C, D> {
    pub fn with_parts(config: &'a Config, codec: C, decorator: D) -> Self {
        Navigator {
            config,
            codec,
            decorator,
        }
    }

    fn builder(&self) -> GridBuilder<'_> {
        GridBuilder::new(self.config, &self.codec, &self.decorator)
    }

    /// The full month grid for `month`.
    pub fn calendar(&self, month: &MonthIndex, today: &NaiveDate) -> Result<GridMatrix> {
        self.builder().build(month, today)
    }

    fn render(&self, month: &MonthIndex, today: &NaiveDate) -> Reply {
        match self.calendar(month, today) {
            Ok(grid) => Reply::Grid(grid),
            Err(err) => {
                log::warn!("{}, showing current month instead", err);
                self.render_current(today)
            }
        }
    }

    fn render_current(&self, today: &NaiveDate) -> Reply {
        match self.calendar(&MonthIndex::from(today), today) {
            Ok(grid) => Reply::Grid(grid),
            Err(err) => {
                log::error!("Could not render current month: {}", err);
                Reply::Empty
            }
        }
    }

    fn select(&self, action: Action, payload: &Payload, today: &NaiveDate) -> Reply {
        let date = u32::try_from(payload.month)
            .ok()
            .zip(u32::try_from(payload.day).ok())
            .and_then(|(month, day)| NaiveDate::from_ymd_opt(payload.year, month, day));

        match date {
            Some(date) => Reply::Selected(Selection {
                date,
                unselectable: action == Action::SelectUnselectable
                    || self.decorator.is_unselectable(&date),
            }),
            None => {
                log::warn!(
                    "Selected day {:02}.{:02}.{:04} does not exist",
                    payload.day,
                    payload.month,
                    payload.year
                );
                self.render_current(today)
            }
        }
    }

    /// Decodes `input` and answers it relative to `now`. Never fails: anything
    /// unrecognized shows the month `now` falls into.
    pub fn process<T: Datelike>(&self, input: &str, now: &T) -> Reply {
        let today = match to_naive_date(now) {
            Some(today) => today,
            None => {
                log::error!("Reference date is out of range");
                return Reply::Empty;
            }
        };

        let payload = self.codec.decode(input);
        let action = match payload.action() {
            Some(action) => action,
            None => {
                log::debug!("Unrecognized payload '{}'", input);
                return self.render_current(&today);
            }
        };

        log::debug!("Dispatching {:?} for '{}'", action, input);

        if action.is_selection() {
            return self.select(action, &payload, &today);
        }
        if action == Action::SilentNoop {
            return Reply::Empty;
        }

        let month = match MonthIndex::from_numbers(payload.month, payload.year) {
            Some(month) => month,
            None => {
                log::warn!("Payload '{}' carries no valid month", input);
                return self.render_current(&today);
            }
        };

        match action {
            Action::PrevMonth => self.render(&month.prev(), &today),
            Action::NextMonth => self.render(&month.next(), &today),
            Action::PrevYear => self.render(&month.prev_year(), &today),
            Action::NextYear => self.render(&month.next_year(), &today),
            Action::SelectMonth => Reply::Grid(self.builder().month_picker(month.year())),
            Action::SelectYear => Reply::Grid(self.builder().year_picker(&month)),
            Action::ShowSelected => self.render(&month, &today),
            Action::SilentNoop | Action::SelectDay | Action::SelectUnselectable => Reply::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::{DecorationSet, UnselectableRule};
    use chrono::{Month, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn grid(reply: Reply) -> GridMatrix {
        match reply {
            Reply::Grid(grid) => grid,
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn select_day_is_terminal() {
        let config = Config::default();
        let navigator = Navigator::new(&config);

        for now in [noon(2023, 1, 1), noon(1999, 12, 31), noon(2040, 7, 4)].iter() {
            assert_eq!(
                navigator.process("calendar/sed_01.01.2023", now),
                Reply::Selected(Selection {
                    date: date(2023, 1, 1),
                    unselectable: false,
                })
            );
        }
    }

    #[test]
    fn unselectable_click_still_returns_date() {
        let config = Config::builder()
            .unselectable(UnselectableRule::default().block(&date(2023, 1, 5)))
            .build()
            .unwrap();
        let navigator = Navigator::new(&config);
        let now = noon(2023, 1, 1);

        let reply = navigator.process("calendar/unsd_05.01.2023", &now);
        assert_eq!(
            reply.selection(),
            Some(&Selection {
                date: date(2023, 1, 5),
                unselectable: true,
            })
        );

        // a stale "sed" payload for a now blocked day is flagged as well
        let reply = navigator.process("calendar/sed_05.01.2023", &now);
        assert!(reply.selection().unwrap().unselectable);
    }

    #[test]
    fn month_rollover_matches_direct_calendar() {
        let config = Config::default();
        let navigator = Navigator::new(&config);
        let now = noon(2023, 6, 15);
        let today = date(2023, 6, 15);

        for &year in [1999, 2017, 2018, 2023].iter() {
            let next = grid(navigator.process(&format!("calendar/nxm_00.12.{}", year), &now));
            let direct = navigator
                .calendar(&MonthIndex::new(Month::January, year + 1), &today)
                .unwrap();
            assert_eq!(next, direct);

            let prev = grid(navigator.process(&format!("calendar/prm_00.01.{}", year), &now));
            let direct = navigator
                .calendar(&MonthIndex::new(Month::December, year - 1), &today)
                .unwrap();
            assert_eq!(prev, direct);
        }
    }

    #[test]
    fn year_navigation_keeps_month() {
        let config = Config::default();
        let navigator = Navigator::new(&config);
        let now = noon(2023, 6, 15);
        let today = date(2023, 6, 15);

        assert_eq!(
            grid(navigator.process("calendar/nxy_00.02.2023", &now)),
            navigator
                .calendar(&MonthIndex::new(Month::February, 2024), &today)
                .unwrap()
        );
        assert_eq!(
            grid(navigator.process("calendar/pry_00.02.2023", &now)),
            navigator
                .calendar(&MonthIndex::new(Month::February, 2022), &today)
                .unwrap()
        );
    }

    #[test]
    fn pickers() {
        let config = Config::default();
        let navigator = Navigator::new(&config);
        let now = noon(2023, 6, 15);

        let months = grid(navigator.process("calendar/sem_00.03.2021", &now));
        assert_eq!(months.rows().len(), 2);
        assert_eq!(
            months.rows()[0].buttons()[0].payload,
            "calendar/shs_00.01.2021"
        );

        let years = grid(navigator.process("calendar/sey_00.03.2021", &now));
        assert_eq!(years.rows().len(), 1);
        assert_eq!(years.rows()[0].buttons().len(), 7);
        assert_eq!(years.rows()[0].buttons()[0].label, "2018");
        assert_eq!(years.rows()[0].buttons()[6].label, "2024");
    }

    #[test]
    fn show_selected_renders_target() {
        let config = Config::default();
        let navigator = Navigator::new(&config);
        let now = noon(2023, 6, 15);

        let shown = grid(navigator.process("calendar/shs_00.09.2020", &now));
        assert_eq!(shown.rows()[0].buttons()[2].label, "Sep");
        assert_eq!(shown.rows()[0].buttons()[4].label, "2020");
        // home points back to the reference month
        assert_eq!(
            shown.rows()[0].buttons()[3].payload,
            "calendar/shs_00.06.2023"
        );
    }

    #[test]
    fn silent_noop_is_empty() {
        let config = Config::default();
        let navigator = Navigator::new(&config);
        assert_eq!(
            navigator.process("calendar/sil_00.06.2023", &noon(2023, 6, 15)),
            Reply::Empty
        );
    }

    #[test]
    fn unrecognized_input_shows_current_month() {
        let config = Config::default();
        let navigator = Navigator::new(&config);
        let now = noon(2023, 6, 15);
        let current = navigator
            .calendar(&MonthIndex::new(Month::June, 2023), &date(2023, 6, 15))
            .unwrap();

        for input in [
            "",
            "garbage",
            "calendar/what_01.01.2023",
            "calendar/shs_00.13.2023",
            "calendar/nxm_00.00.2023",
            "calendar/sed_31.02.2023",
            "calendar/sed_00.02.2023",
        ]
        .iter()
        {
            assert_eq!(grid(navigator.process(input, &now)), current, "{}", input);
        }
    }

    #[test]
    fn custom_decorations_flow_into_grid() {
        let decorations = DecorationSet {
            current_day: crate::decorator::Decoration::new("*", ""),
            ..DecorationSet::default()
        };
        let config = Config::builder().decorations(decorations).build().unwrap();
        let navigator = Navigator::new(&config);

        let shown = grid(navigator.process("calendar/shs_00.06.2023", &noon(2023, 6, 15)));
        assert!(shown
            .body()
            .iter()
            .flat_map(|row| row.buttons())
            .any(|b| b.label == "*15" && b.payload == "calendar/sed_15.06.2023"));
    }
}
