use core::fmt::Arguments;

use crate::handler::{CliHandler, Handler};
use crate::record::{CallSite, Record};
use crate::{Attr, Level, Result};

/// A thin front end over a [`Handler`].
///
/// Use the crate's macros to log with a call site attached:
///
/// ```
/// use clilog::{info, Attr, CliHandler, Logger};
///
/// let lg = Logger::new(CliHandler::builder().stdout().build()?);
/// info!(lg, "listening on {}", 8080);
/// info!(lg, [Attr::int("port", 8080)], "listening");
/// # Ok::<(), clilog::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Logger<H = CliHandler> {
    handler: H,
}

impl Default for Logger<CliHandler> {
    /// A logger that writes nowhere.
    fn default() -> Self {
        Self::new(CliHandler::discard())
    }
}

impl<H: Handler> Logger<H> {
    /// Wraps `handler`.
    #[inline]
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// The wrapped handler.
    #[inline]
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Whether `level` would be rendered.
    #[inline]
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// A logger that renders `attrs` on every record.
    #[must_use]
    pub fn with(&self, attrs: Vec<Attr>) -> Self {
        Self::new(self.handler.with_attrs(attrs))
    }

    /// A logger that nests later attributes under `name`.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        Self::new(self.handler.with_group(name))
    }

    /// Hands a prepared record to the handler if its level is enabled.
    /// # Errors
    /// See [`Handler::handle`].
    pub fn log_record(&self, record: &Record<'_>) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        self.handler.handle(record)
    }

    /// Logs a message without a call site.
    /// # Errors
    /// See [`Handler::handle`].
    pub fn log(&self, level: Level, message: Arguments<'_>, attrs: Vec<Attr>) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.handler
            .handle(&Record::new(level, message).with_attrs(attrs))
    }

    #[doc(hidden)]
    pub fn log_at(
        &self,
        level: Level,
        site: &'static CallSite,
        message: Arguments<'_>,
        attrs: Vec<Attr>,
    ) -> Result<()> {
        let mut record = Record::new(level, message).with_caller(site);
        record.attrs = attrs;
        self.handler.handle(&record)
    }

    /// Logs at debug.
    /// # Errors
    /// See [`Handler::handle`].
    pub fn debug(&self, msg: &str, attrs: Vec<Attr>) -> Result<()> {
        self.log(Level::DEBUG, format_args!("{msg}"), attrs)
    }

    /// Logs at info.
    /// # Errors
    /// See [`Handler::handle`].
    pub fn info(&self, msg: &str, attrs: Vec<Attr>) -> Result<()> {
        self.log(Level::INFO, format_args!("{msg}"), attrs)
    }

    /// Logs at warn.
    /// # Errors
    /// See [`Handler::handle`].
    pub fn warn(&self, msg: &str, attrs: Vec<Attr>) -> Result<()> {
        self.log(Level::WARN, format_args!("{msg}"), attrs)
    }

    /// Logs at error.
    /// # Errors
    /// See [`Handler::handle`].
    pub fn error(&self, msg: &str, attrs: Vec<Attr>) -> Result<()> {
        self.log(Level::ERROR, format_args!("{msg}"), attrs)
    }
}

// ===== Macros (require a logger argument) ====================================
// `info!(lg, "fmt", args..)` or `info!(lg, [attr, ..], "fmt", args..)`.
// The level check runs before the attribute list is built, and each call site
// gets its own `CallSite` static. Render errors are dropped, like `log`'s.

#[macro_export]
#[doc(hidden)]
macro_rules! __clilog_log {
    ($lg:expr, $lvl:expr, [$($attr:expr),* $(,)?], $($t:tt)+) => {{
        let __lg = &$lg; // evaluate once
        let __lvl: $crate::Level = $lvl;
        if __lg.enabled(__lvl) {
            static __CALLSITE: $crate::CallSite =
                $crate::CallSite::new(module_path!(), file!(), line!());
            let _ = __lg.log_at(__lvl, &__CALLSITE, format_args!($($t)+), vec![$($attr),*]);
        }
    }};
    ($lg:expr, $lvl:expr, $($t:tt)+) => {
        $crate::__clilog_log!($lg, $lvl, [], $($t)+)
    };
}

/// Log at an explicit level
#[macro_export]
macro_rules! log { ($lg:expr, $lvl:expr, $($t:tt)+) => { $crate::__clilog_log!($lg, $lvl, $($t)+) } }
/// debug
#[macro_export]
macro_rules! debug { ($lg:expr, $($t:tt)+) => { $crate::__clilog_log!($lg, $crate::Level::DEBUG, $($t)+) } }
/// info
#[macro_export]
macro_rules! info  { ($lg:expr, $($t:tt)+) => { $crate::__clilog_log!($lg, $crate::Level::INFO,  $($t)+) } }
/// warning
#[macro_export]
macro_rules! warn  { ($lg:expr, $($t:tt)+) => { $crate::__clilog_log!($lg, $crate::Level::WARN,  $($t)+) } }
/// error
#[macro_export]
macro_rules! error { ($lg:expr, $($t:tt)+) => { $crate::__clilog_log!($lg, $crate::Level::ERROR, $($t)+) } }
