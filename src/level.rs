use core::fmt;

/// Log severity.
///
/// Levels are ordered integers so a front end may produce values between the
/// named ones. Only [`Level::DEBUG`], [`Level::INFO`], [`Level::WARN`] and
/// anything at or above [`Level::ERROR`] can be rendered; every other value is
/// rejected by the handler.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Level(i32);

impl Level {
    /// Debug
    pub const DEBUG: Self = Self(-4);
    /// Info
    pub const INFO: Self = Self(0);
    /// Warn
    pub const WARN: Self = Self(4);
    /// Error
    pub const ERROR: Self = Self(8);

    /// Builds a level from its raw value.
    #[inline]
    #[must_use]
    pub const fn from_i32(v: i32) -> Self {
        Self(v)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::INFO
    }
}

impl fmt::Display for Level {
    /// `DEBUG`, `INFO`, `WARN`, `ERROR`, or the nearest lower name plus an
    /// offset such as `INFO+2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = if self.0 < Self::INFO.0 {
            ("DEBUG", Self::DEBUG.0)
        } else if self.0 < Self::WARN.0 {
            ("INFO", Self::INFO.0)
        } else if self.0 < Self::ERROR.0 {
            ("WARN", Self::WARN.0)
        } else {
            ("ERROR", Self::ERROR.0)
        };
        let delta = i64::from(self.0) - i64::from(base);
        if delta == 0 {
            f.write_str(name)
        } else {
            write!(f, "{name}{delta:+}")
        }
    }
}

/// Returned when a string names no known level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLevelError;

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: debug, info, warn, error")
    }
}

impl std::error::Error for ParseLevelError {}

impl core::str::FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("debug") {
            Ok(Self::DEBUG)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::INFO)
        } else if s.eq_ignore_ascii_case("warn") || s.eq_ignore_ascii_case("warning") {
            Ok(Self::WARN)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Self::ERROR)
        } else {
            Err(ParseLevelError)
        }
    }
}

impl core::convert::TryFrom<&str> for Level {
    type Error = ParseLevelError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(feature = "log")]
impl From<log::Level> for Level {
    /// `log` has no level below debug that we can render, so trace folds into debug.
    fn from(l: log::Level) -> Self {
        match l {
            log::Level::Trace | log::Level::Debug => Self::DEBUG,
            log::Level::Info => Self::INFO,
            log::Level::Warn => Self::WARN,
            log::Level::Error => Self::ERROR,
        }
    }
}
