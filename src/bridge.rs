//! Front end for the `log` crate: a [`Logger`] can be installed as the
//! global `log` logger, so records from dependencies render through the
//! same handler.
//!
//! `log` key-values become attributes. Records from `log` carry no
//! [`crate::CallSite`], so no caller is shown for them.

use log::kv::{self, Key, VisitSource};
use log::{LevelFilter, Log, Metadata};

use crate::handler::Handler;
use crate::record::Record;
use crate::{Attr, Level, Logger};

/// Collects `log` key-values as attributes.
struct Collect(Vec<Attr>);

impl<'kvs> VisitSource<'kvs> for Collect {
    fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.0.push(to_attr(key.as_str(), &value));
        Ok(())
    }
}

fn to_attr(key: &str, v: &kv::Value<'_>) -> Attr {
    let key = key.to_owned();
    if let Some(b) = v.to_bool() {
        Attr::bool(key, b)
    } else if let Some(i) = v.to_i64() {
        Attr::int(key, i)
    } else if let Some(u) = v.to_u64() {
        Attr::uint(key, u)
    } else if let Some(f) = v.to_f64() {
        Attr::float(key, f)
    } else if let Some(s) = v.to_borrowed_str() {
        Attr::string(key, s)
    } else {
        Attr::string(key, v.to_string())
    }
}

impl<H: Handler + 'static> Log for Logger<H> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        Self::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        let level: Level = record.level().into();
        if !Self::enabled(self, level) {
            return;
        }
        let mut attrs = Collect(Vec::new());
        let _ = record.key_values().visit(&mut attrs);
        let _ = self.log_record(&Record::new(level, *record.args()).with_attrs(attrs.0));
    }

    fn flush(&self) {}
}

/// The most verbose `log` filter the handler would still render.
fn max_level<H: Handler>(h: &H) -> LevelFilter {
    if h.enabled(Level::DEBUG) {
        LevelFilter::Trace
    } else if h.enabled(Level::INFO) {
        LevelFilter::Info
    } else if h.enabled(Level::WARN) {
        LevelFilter::Warn
    } else if h.enabled(Level::ERROR) {
        LevelFilter::Error
    } else {
        LevelFilter::Off
    }
}

impl<H: Handler + 'static> Logger<H> {
    /// Installs this logger as the global `log` logger and raises `log`'s
    /// max level to what the handler renders.
    ///
    /// # Errors
    /// Fails if a global logger is already set.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let max = max_level(self.handler());
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max);
        Ok(())
    }
}
