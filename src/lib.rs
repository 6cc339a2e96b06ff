#![warn(missing_docs, unsafe_code)]
//! Colored, width-aligned terminal rendering for structured log records.
//!
//! A [`CliHandler`] renders each [`Record`] as one line:
//!
//! ```text
//! INF <app::net:42> server listening time=2024-05-01T12:00:00Z port=8080
//! ```
//!
//! Build one with [`CliHandler::builder`], pick one of the five [`Style`]
//! presets (or build your own with [`Style::builder`]), and log through a
//! [`Logger`] or the [`info!`]-family macros. With the `log` feature a
//! [`Logger`] can also be installed as the global `log` logger.

pub mod color;
mod config;
mod error;
mod handler;
mod level;
mod logger;
mod pool;
mod record;
mod sink;
mod style;
mod timefmt;
mod value;

#[cfg(feature = "log")]
mod bridge;

pub use color::{Color, Paint};
pub use config::HandlerBuilder;
pub use error::{Error, Result};
pub use handler::{CliHandler, Handler, Redactor};
pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use record::{CallSite, Record};
pub use sink::{ColorMode, ParseColorModeError, Target};
pub use style::{
    AffixStyle, AttrStyle, CallerStyle, LabelStyle, LevelStyle, Style, StyleBuilder,
};
pub use timefmt::TimeFormat;
pub use value::{Attr, HumanDuration, Value};
