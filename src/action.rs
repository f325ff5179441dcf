use derive_more::Display;
use phf::phf_map;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;

/// What a button click asks the calendar to do.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Action {
    #[display(fmt = "prm")]
    PrevMonth,
    #[display(fmt = "nxm")]
    NextMonth,
    #[display(fmt = "pry")]
    PrevYear,
    #[display(fmt = "nxy")]
    NextYear,
    #[display(fmt = "sem")]
    SelectMonth,
    #[display(fmt = "sey")]
    SelectYear,
    #[display(fmt = "shs")]
    ShowSelected,
    #[display(fmt = "sil")]
    SilentNoop,
    #[display(fmt = "sed")]
    SelectDay,
    #[display(fmt = "unsd")]
    SelectUnselectable,
}

static TOKENS: phf::Map<&'static str, Action> = phf_map! {
    "prm" => Action::PrevMonth,
    "nxm" => Action::NextMonth,
    "pry" => Action::PrevYear,
    "nxy" => Action::NextYear,
    "sem" => Action::SelectMonth,
    "sey" => Action::SelectYear,
    "shs" => Action::ShowSelected,
    "sil" => Action::SilentNoop,
    "sed" => Action::SelectDay,
    "unsd" => Action::SelectUnselectable,
};

impl Action {
    pub const ALL: [Action; 10] = [
        Action::PrevMonth,
        Action::NextMonth,
        Action::PrevYear,
        Action::NextYear,
        Action::SelectMonth,
        Action::SelectYear,
        Action::ShowSelected,
        Action::SilentNoop,
        Action::SelectDay,
        Action::SelectUnselectable,
    ];

    pub fn from_token(token: &str) -> Option<Action> {
        TOKENS.get(token).copied()
    }

    pub fn is_selection(&self) -> bool {
        matches!(self, Action::SelectDay | Action::SelectUnselectable)
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "unknown action '{}'", _0)]
pub struct UnknownAction(pub String);

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::from_token(s).ok_or_else(|| UnknownAction(s.to_owned()))
    }
}
