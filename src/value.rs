use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

/// A key/value pair attached to a record or a handler.
#[derive(Clone, Debug, PartialEq)]
pub struct Attr {
    /// The key. Attributes with an empty key are never rendered.
    pub key: Cow<'static, str>,
    /// The value.
    pub value: Value,
}

/// An attribute value.
#[derive(Clone)]
pub enum Value {
    /// String
    String(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Timestamp, rendered with the handler's time format
    Time(OffsetDateTime),
    /// Duration, rendered like `1.5s` or `2m3s`
    Duration(Duration),
    /// Nested attributes, rendered with a dotted key path
    Group(Vec<Attr>),
    /// Anything else, rendered through `Display`
    Any(Arc<dyn fmt::Display + Send + Sync>),
}

impl Attr {
    /// Creates an attribute.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// String attribute.
    #[must_use]
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// Signed integer attribute.
    #[must_use]
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, Value::Int(value))
    }

    /// Unsigned integer attribute.
    #[must_use]
    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, Value::Uint(value))
    }

    /// Float attribute.
    #[must_use]
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    /// Boolean attribute.
    #[must_use]
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// Timestamp attribute.
    #[must_use]
    pub fn time(key: impl Into<Cow<'static, str>>, value: OffsetDateTime) -> Self {
        Self::new(key, Value::Time(value))
    }

    /// Duration attribute.
    #[must_use]
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    /// Group attribute.
    #[must_use]
    pub fn group(key: impl Into<Cow<'static, str>>, attrs: impl IntoIterator<Item = Self>) -> Self {
        Self::new(key, Value::Group(attrs.into_iter().collect()))
    }

    /// Attribute rendered through `Display`.
    #[must_use]
    pub fn any(
        key: impl Into<Cow<'static, str>>,
        value: impl fmt::Display + Send + Sync + 'static,
    ) -> Self {
        Self::new(key, Value::Any(Arc::new(value)))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Self::Group(v) => f.debug_tuple("Group").field(v).finish(),
            Self::Any(v) => f.debug_tuple("Any").field(&format_args!("{v}")).finish(),
        }
    }
}

impl PartialEq for Value {
    /// `Any` values compare by their rendered text.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::Group(a), Self::Group(b)) => a == b,
            (Self::Any(a), Self::Any(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}
impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Self::String(v.into_owned())
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty: $($t:ty),+) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::$variant(<$target>::from(v))
            }
        })+
    };
}
value_from!(Int, i64: i8, i16, i32, i64);
value_from!(Uint, u64: u8, u16, u32, u64);
value_from!(Float, f64: f32, f64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        // isize is at most 64 bits on every supported target
        Self::Int(v as i64)
    }
}
impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}
impl From<OffsetDateTime> for Value {
    fn from(v: OffsetDateTime) -> Self {
        Self::Time(v)
    }
}
impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}
impl From<Vec<Attr>> for Value {
    fn from(v: Vec<Attr>) -> Self {
        Self::Group(v)
    }
}

/// Compact duration text: `0s`, `750ns`, `1.5µs`, `12.5ms`, `1s`, `1m30s`, `2h0m5.25s`.
pub struct HumanDuration(pub Duration);

/// Writes `whole[.frac]` with the fraction zero-padded to `digits` and its
/// trailing zeros dropped.
fn write_decimal(
    f: &mut fmt::Formatter<'_>,
    whole: u64,
    mut frac: u64,
    mut digits: usize,
) -> fmt::Result {
    write!(f, "{whole}")?;
    if frac == 0 {
        return Ok(());
    }
    while frac % 10 == 0 {
        frac /= 10;
        digits -= 1;
    }
    write!(f, ".{frac:0digits$}")
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        let secs = d.as_secs();
        let nanos = u64::from(d.subsec_nanos());
        if secs == 0 {
            if nanos == 0 {
                f.write_str("0s")
            } else if nanos < 1_000 {
                write!(f, "{nanos}ns")
            } else if nanos < 1_000_000 {
                write_decimal(f, nanos / 1_000, nanos % 1_000, 3)?;
                f.write_str("µs")
            } else {
                write_decimal(f, nanos / 1_000_000, nanos % 1_000_000, 6)?;
                f.write_str("ms")
            }
        } else {
            let h = secs / 3_600;
            let m = (secs % 3_600) / 60;
            let s = secs % 60;
            if h > 0 {
                write!(f, "{h}h")?;
            }
            if h > 0 || m > 0 {
                write!(f, "{m}m")?;
            }
            write_decimal(f, s, nanos, 9)?;
            f.write_str("s")
        }
    }
}
