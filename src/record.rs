use core::fmt::Arguments;

use time::OffsetDateTime;

use crate::{Attr, Level};

/// A source location, created once per call site as a `static` by the
/// logging macros.
///
/// Its address identifies the call site, so the handler can cache the
/// rendered location and never resolve the same site twice.
#[derive(Debug)]
pub struct CallSite {
    module_path: &'static str,
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Describes a call site. Use `module_path!()`, `file!()` and `line!()`.
    #[inline]
    #[must_use]
    pub const fn new(module_path: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            module_path,
            file,
            line,
        }
    }

    /// Module path of the call site.
    #[inline]
    #[must_use]
    pub const fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Source file of the call site.
    #[inline]
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Line of the call site.
    #[inline]
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Cache key: the site's address.
    #[inline]
    pub(crate) fn key(&'static self) -> usize {
        self as *const Self as usize
    }

    /// `location:line`, where location is the file when `full_path` is set
    /// and the module path otherwise. `None` when the site has no file.
    pub(crate) fn resolve(&self, full_path: bool) -> Option<Box<[u8]>> {
        if self.file.is_empty() {
            return None;
        }
        let name = if full_path || self.module_path.is_empty() {
            self.file
        } else {
            self.module_path
        };
        Some(format!("{name}:{}", self.line).into_bytes().into_boxed_slice())
    }
}

/// One log event as handed to a handler.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    /// When the event happened.
    pub time: OffsetDateTime,
    /// Severity.
    pub level: Level,
    /// The message, written verbatim.
    pub message: Arguments<'a>,
    /// Where the event was logged, if known.
    pub caller: Option<&'static CallSite>,
    /// Attributes carried by this event only.
    pub attrs: Vec<Attr>,
}

#[cfg(not(feature = "localtime"))]
#[inline]
fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[cfg(feature = "localtime")]
#[inline]
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

impl<'a> Record<'a> {
    /// A record stamped with the current time, without caller or attributes.
    #[must_use]
    pub fn new(level: Level, message: Arguments<'a>) -> Self {
        Self {
            time: now(),
            level,
            message,
            caller: None,
            attrs: Vec::new(),
        }
    }

    /// Overrides the timestamp.
    #[inline]
    #[must_use]
    pub fn with_time(mut self, time: OffsetDateTime) -> Self {
        self.time = time;
        self
    }

    /// Sets the call site.
    #[inline]
    #[must_use]
    pub fn with_caller(mut self, site: &'static CallSite) -> Self {
        self.caller = Some(site);
        self
    }

    /// Appends one attribute.
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Appends attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }
}
