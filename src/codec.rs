use nom::{
    bytes::complete::{tag, take_till1, take_while_m_n},
    character::complete::char,
    combinator::all_consuming,
    sequence::{preceded, tuple},
    IResult,
};
use serde::Serialize;

use crate::action::Action;

/// Prefix of every payload this crate issues.
pub const PAYLOAD_PREFIX: &str = "calendar/";

/// Decoded click data of a single button.
///
/// `Payload::default()` is the zero payload and stands for input that could not
/// be parsed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub action: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

impl Payload {
    pub fn new(action: Action, day: i32, month: i32, year: i32) -> Self {
        Payload {
            action: action.to_string(),
            day,
            month,
            year,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Payload::default()
    }

    /// The action if its token is one of the known ones.
    pub fn action(&self) -> Option<Action> {
        Action::from_token(&self.action)
    }
}

/// Turns an action and a date into the opaque string carried by a button and back.
///
/// Decoding never fails: anything unparseable becomes the zero [`Payload`].
pub trait PayloadCodec {
    fn encode(&self, action: &str, day: i32, month: i32, year: i32) -> String;
    fn decode(&self, input: &str) -> Payload;

    fn encode_action(&self, action: Action, day: i32, month: i32, year: i32) -> String {
        self.encode(&action.to_string(), day, month, year)
    }
}

/// The `calendar/<action>_DD.MM.YYYY` wire format.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallbackCodec;

impl CallbackCodec {
    fn encode_day_or_month(value: i32) -> String {
        if value <= 0 {
            "00".to_owned()
        } else {
            format!("{:02}", value)
        }
    }

    // Negative years lose their sign and collapse to "0000"
    fn encode_year(value: i32) -> String {
        if value < 0 {
            "0000".to_owned()
        } else {
            format!("{:04}", value)
        }
    }

    fn digits(count: usize) -> impl Fn(&str) -> IResult<&str, &str> {
        move |input| take_while_m_n(count, count, |c: char| c.is_ascii_digit())(input)
    }

    fn parse(input: &str) -> IResult<&str, (&str, &str, &str, &str)> {
        all_consuming(tuple((
            preceded(tag(PAYLOAD_PREFIX), take_till1(|c: char| c == '_')),
            preceded(char('_'), Self::digits(2)),
            preceded(char('.'), Self::digits(2)),
            preceded(char('.'), Self::digits(4)),
        )))(input)
    }

    fn parse_number(digits: &str) -> i32 {
        digits.parse::<i32>().unwrap_or(0)
    }
}

impl PayloadCodec for CallbackCodec {
    fn encode(&self, action: &str, day: i32, month: i32, year: i32) -> String {
        let mut out = String::with_capacity(PAYLOAD_PREFIX.len() + action.len() + 11);
        out.push_str(PAYLOAD_PREFIX);
        out.push_str(action);
        out.push('_');
        out.push_str(&Self::encode_day_or_month(day));
        out.push('.');
        out.push_str(&Self::encode_day_or_month(month));
        out.push('.');
        out.push_str(&Self::encode_year(year));
        out
    }

    fn decode(&self, input: &str) -> Payload {
        match Self::parse(input) {
            Ok((_, (action, day, month, year))) => Payload {
                action: action.to_owned(),
                day: Self::parse_number(day),
                month: Self::parse_number(month),
                year: Self::parse_number(year),
            },
            Err(err) => {
                log::debug!("Could not decode payload '{}': {}", input, err);
                Payload::default()
            }
        }
    }
}
