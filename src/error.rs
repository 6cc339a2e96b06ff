use std::io;

use thiserror::Error;

use crate::Level;

/// The result type for this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// An error that can occur while building a handler or rendering a record.
#[derive(Debug, Error)]
pub enum Error {
    /// The record carries a severity that maps to no rendering bucket.
    #[error("unknown log level: {0}")]
    UnknownLevel(Level),

    /// Writing to the output sink (or opening the output file) failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The configured time format could not be parsed.
    #[error("invalid time format {layout:?}: {source}")]
    InvalidTimeFormat {
        /// The rejected format string.
        layout: String,
        /// Why `time` rejected it.
        source: time::error::InvalidFormatDescription,
    },
}
