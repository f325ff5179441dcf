//! Inline calendar keyboards for chat bots.
//!
//! A month is rendered as a grid of [`grid::Button`]s whose payloads encode an
//! [`action::Action`] and a date. Feeding a clicked payload back into
//! [`navigation::Navigator::process`] yields the next grid or the picked day.

pub mod action;
pub mod calendar;
pub mod codec;
pub mod config;
pub mod decorator;
pub mod error;
pub mod grid;
pub mod navigation;

pub use action::Action;
pub use codec::{CallbackCodec, Payload, PayloadCodec};
pub use config::{Config, ConfigBuilder, SharedConfig};
pub use decorator::{DayDecorator, Decoration, DecorationSet, Decorator, UnselectableRule};
pub use error::{Error, ErrorKind, Result};
pub use grid::{Button, GridBuilder, GridMatrix, GridRow};
pub use navigation::{Navigator, Reply, Selection};
