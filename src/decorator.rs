use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::calendar::to_naive_date;

/// Text placed around a day number.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDecoration")]
pub struct Decoration {
    prefix: String,
    postfix: String,
    #[serde(skip)]
    len: usize,
}

#[derive(Deserialize)]
struct RawDecoration {
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    postfix: String,
}

impl From<RawDecoration> for Decoration {
    fn from(raw: RawDecoration) -> Self {
        Decoration::new(raw.prefix, raw.postfix)
    }
}

impl Decoration {
    pub fn new<P: Into<String>, Q: Into<String>>(prefix: P, postfix: Q) -> Self {
        let prefix = prefix.into();
        let postfix = postfix.into();
        let len = prefix.len() + postfix.len();

        Decoration {
            prefix,
            postfix,
            len,
        }
    }

    pub fn postfix_only<Q: Into<String>>(postfix: Q) -> Self {
        Decoration::new(String::new(), postfix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    /// Combined byte length of prefix and postfix.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSet {
    pub current_day: Decoration,
    pub unselectable: Decoration,
    pub pick: Decoration,
}

impl Default for DecorationSet {
    fn default() -> Self {
        DecorationSet {
            current_day: Decoration::default(),
            unselectable: Decoration::postfix_only("❌"),
            pick: Decoration::default(),
        }
    }
}

impl DecorationSet {
    /// Upper bound on the extra bytes a label may carry besides the day number.
    pub fn max_len(&self) -> usize {
        self.current_day.len() + self.unselectable.len().max(self.pick.len())
    }
}

fn min_date() -> NaiveDate {
    NaiveDate::MIN
}

fn max_date() -> NaiveDate {
    NaiveDate::MAX
}

/// Dates that may not be picked: everything outside `[lower, upper]` plus an
/// explicit set of blocked days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnselectableRule {
    #[serde(default = "min_date")]
    pub lower: NaiveDate,
    #[serde(default = "max_date")]
    pub upper: NaiveDate,
    #[serde(default)]
    pub blocked: BTreeSet<NaiveDate>,
}

impl Default for UnselectableRule {
    fn default() -> Self {
        UnselectableRule {
            lower: min_date(),
            upper: max_date(),
            blocked: BTreeSet::new(),
        }
    }
}

impl UnselectableRule {
    pub fn lower<D: Datelike>(mut self, date: &D) -> Self {
        self.lower = to_naive_date(date).unwrap_or_else(min_date);
        self
    }

    pub fn upper<D: Datelike>(mut self, date: &D) -> Self {
        self.upper = to_naive_date(date).unwrap_or_else(max_date);
        self
    }

    pub fn block<D: Datelike>(mut self, date: &D) -> Self {
        if let Some(date) = to_naive_date(date) {
            self.blocked.insert(date);
        }
        self
    }

    /// Checks `date` at day granularity; any time-of-day component is ignored.
    pub fn is_unselectable<D: Datelike>(&self, date: &D) -> bool {
        match to_naive_date(date) {
            Some(day) => day < self.lower || day > self.upper || self.blocked.contains(&day),
            None => true,
        }
    }
}

/// Decides whether a day can be picked and how its button is labeled.
pub trait DayDecorator {
    fn is_unselectable(&self, date: &NaiveDate) -> bool;

    /// Returns the label for `date` and whether it is unselectable. `today`
    /// marks the current day.
    fn render_label(&self, date: &NaiveDate, today: &NaiveDate) -> (String, bool);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decorator {
    decorations: DecorationSet,
    rule: UnselectableRule,
}

impl Decorator {
    pub fn new(decorations: DecorationSet, rule: UnselectableRule) -> Self {
        Decorator { decorations, rule }
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn rule(&self) -> &UnselectableRule {
        &self.rule
    }
}

impl DayDecorator for Decorator {
    fn is_unselectable(&self, date: &NaiveDate) -> bool {
        self.rule.is_unselectable(date)
    }

    fn render_label(&self, date: &NaiveDate, today: &NaiveDate) -> (String, bool) {
        let unselectable = self.is_unselectable(date);
        let is_today = date == today;

        let eligibility = if unselectable {
            &self.decorations.unselectable
        } else {
            &self.decorations.pick
        };

        // at most two digits for the day itself
        let mut label = String::with_capacity(self.decorations.max_len() + 2);
        label.push_str(eligibility.prefix());
        if is_today {
            label.push_str(self.decorations.current_day.prefix());
        }
        label.push_str(&date.day().to_string());
        if is_today {
            label.push_str(self.decorations.current_day.postfix());
        }
        label.push_str(eligibility.postfix());

        (label, unselectable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule() -> UnselectableRule {
        UnselectableRule::default()
            .lower(&date(2023, 1, 10))
            .upper(&date(2023, 1, 20))
            .block(&date(2023, 1, 15))
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let rule = rule();
        assert!(rule.is_unselectable(&date(2023, 1, 9)));
        assert!(!rule.is_unselectable(&date(2023, 1, 10)));
        assert!(!rule.is_unselectable(&date(2023, 1, 20)));
        assert!(rule.is_unselectable(&date(2023, 1, 21)));
    }

    #[test]
    fn blocked_dates_are_unselectable() {
        let rule = rule();
        assert!(rule.is_unselectable(&date(2023, 1, 15)));
        assert!(!rule.is_unselectable(&date(2023, 1, 16)));
    }

    #[test]
    fn time_of_day_is_ignored() {
        let rule = UnselectableRule::default()
            .lower(&date(2023, 1, 10).and_hms_opt(18, 30, 0).unwrap())
            .upper(&date(2023, 1, 20).and_hms_opt(6, 0, 0).unwrap())
            .block(&date(2023, 1, 15).and_hms_opt(12, 0, 0).unwrap());

        let late = date(2023, 1, 20).and_hms_opt(23, 59, 59).unwrap();
        let early = date(2023, 1, 10).and_hms_opt(0, 0, 1).unwrap();
        let blocked = date(2023, 1, 15).and_hms_opt(1, 2, 3).unwrap();

        assert!(!rule.is_unselectable(&late));
        assert!(!rule.is_unselectable(&early));
        assert!(rule.is_unselectable(&blocked));
    }

    #[test]
    fn default_rule_allows_everything() {
        let rule = UnselectableRule::default();
        assert!(!rule.is_unselectable(&date(1, 1, 1)));
        assert!(!rule.is_unselectable(&date(9999, 12, 31)));
    }

    #[test]
    fn default_labels() {
        let decorator = Decorator::new(DecorationSet::default(), rule());
        let today = date(2023, 1, 12);

        assert_eq!(
            decorator.render_label(&date(2023, 1, 12), &today),
            ("12".to_owned(), false)
        );
        assert_eq!(
            decorator.render_label(&date(2023, 1, 5), &today),
            ("5❌".to_owned(), true)
        );
    }

    #[test]
    fn decorations_compose_in_order() {
        let decorations = DecorationSet {
            current_day: Decoration::new("[", "]"),
            unselectable: Decoration::new("(", ")"),
            pick: Decoration::new("<", ">"),
        };
        let decorator = Decorator::new(decorations, rule());
        let today = date(2023, 1, 15);

        assert_eq!(
            decorator.render_label(&date(2023, 1, 15), &today).0,
            "([15])"
        );
        assert_eq!(decorator.render_label(&date(2023, 1, 11), &today).0, "<11>");

        let today = date(2023, 1, 11);
        assert_eq!(decorator.render_label(&date(2023, 1, 11), &today).0, "<[11]>");
        assert_eq!(decorator.render_label(&date(2023, 1, 3), &today).0, "(3)");
    }

    #[test]
    fn decoration_length_is_precomputed() {
        let decoration = Decoration::new("ab", "❌");
        assert_eq!(decoration.len(), 2 + "❌".len());
        assert!(Decoration::default().is_empty());
    }

    #[test]
    fn decoration_set_from_toml() {
        let set: DecorationSet = toml::from_str(
            r#"
            [current_day]
            prefix = "*"

            [pick]
            postfix = "✓"
            "#,
        )
        .unwrap();

        assert_eq!(set.current_day, Decoration::new("*", ""));
        assert_eq!(set.pick, Decoration::postfix_only("✓"));
        assert_eq!(set.unselectable, Decoration::postfix_only("❌"));
        assert_eq!(set.pick.len(), "✓".len());
    }
}
