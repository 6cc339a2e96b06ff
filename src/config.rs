use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::handler::{CliHandler, Options, Redactor};
use crate::sink::{use_color, ColorMode, Sink, Target};
use crate::timefmt::TimeFormat;
use crate::{Attr, Level, Result, Style};

/// Builder for [`CliHandler`]
///
/// Defaults: level info, no label, no time, RFC 3339 time format, no caller,
/// no redaction, [`Style::basic_foreground`], stderr, [`ColorMode::Auto`].
pub struct HandlerBuilder {
    level: Option<Level>,
    label: String,
    show_time: bool,
    time_format: Option<String>,
    show_caller: bool,
    redact: Option<Redactor>,
    style: Option<Style>,
    color_mode: ColorMode,
    target: Target,
    writer: Option<Box<dyn Write + Send>>,
    file_path: Option<PathBuf>,
}

impl Default for HandlerBuilder {
    fn default() -> Self {
        Self {
            level: None,
            label: String::new(),
            show_time: false,
            time_format: None,
            show_caller: false,
            redact: None,
            style: None,
            color_mode: ColorMode::Auto,
            target: Target::Stderr,
            writer: None,
            file_path: None,
        }
    }
}

#[inline]
fn env_bool(s: &str) -> bool {
    s == "1" || s.eq_ignore_ascii_case("true")
}

impl HandlerBuilder {
    #[inline]
    #[must_use]
    /// Set the minimum level
    pub const fn level(mut self, l: Level) -> Self {
        self.level = Some(l);
        self
    }
    #[inline]
    #[must_use]
    /// Set the static label written before every message
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
    #[inline]
    #[must_use]
    /// Show the timestamp
    pub const fn show_time(mut self, on: bool) -> Self {
        self.show_time = on;
        self
    }
    #[inline]
    #[must_use]
    /// Set the time format: `rfc3339`, `rfc2822` or a `time` format
    /// description. An empty string keeps the current format.
    pub fn time_format(mut self, layout: impl Into<String>) -> Self {
        let layout = layout.into();
        if !layout.is_empty() {
            self.time_format = Some(layout);
        }
        self
    }
    #[inline]
    #[must_use]
    /// Show the call site
    pub const fn show_caller(mut self, on: bool) -> Self {
        self.show_caller = on;
        self
    }
    #[inline]
    #[must_use]
    /// Rewrite attributes before rendering
    pub fn redact(mut self, f: impl Fn(Attr) -> Attr + Send + Sync + 'static) -> Self {
        self.redact = Some(Arc::new(f));
        self
    }
    #[inline]
    #[must_use]
    /// Set the style
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
    #[inline]
    #[must_use]
    /// Set the color mode
    pub const fn color_mode(mut self, m: ColorMode) -> Self {
        self.color_mode = m;
        self
    }
    #[inline]
    #[must_use]
    /// Set the output target to stdout
    pub const fn stdout(mut self) -> Self {
        self.target = Target::Stdout;
        self
    }
    #[inline]
    #[must_use]
    /// Set the output target to stderr
    pub const fn stderr(mut self) -> Self {
        self.target = Target::Stderr;
        self
    }
    #[inline]
    #[must_use]
    /// Set the output target to a custom writer
    pub fn writer(mut self, w: impl Write + Send + 'static) -> Self {
        self.target = Target::Writer;
        self.writer = Some(Box::new(w));
        self.file_path = None;
        self
    }
    #[inline]
    #[must_use]
    /// Set the output target to a file, opened for appending on build
    pub fn file(mut self, p: impl Into<PathBuf>) -> Self {
        self.target = Target::Writer;
        self.file_path = Some(p.into());
        self.writer = None;
        self
    }

    /// Apply overrides from the environment:
    ///
    /// - `CLILOG_LEVEL`: debug, info, warn or error (anything else is ignored)
    /// - `CLILOG_COLOR`: auto, always or never (anything else means auto)
    /// - `CLILOG_SHOW_TIME`, `CLILOG_SHOW_CALLER`: `1` or `true` to enable
    /// - `CLILOG_TIME_FORMAT`: as for [`HandlerBuilder::time_format`]
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if let Ok(s) = std::env::var("CLILOG_LEVEL") {
            if let Ok(l) = s.parse() {
                self.level = Some(l);
            }
        }
        if let Ok(s) = std::env::var("CLILOG_COLOR") {
            self.color_mode = s.parse().unwrap_or(ColorMode::Auto);
        }
        if let Ok(s) = std::env::var("CLILOG_SHOW_TIME") {
            self.show_time = env_bool(&s);
        }
        if let Ok(s) = std::env::var("CLILOG_SHOW_CALLER") {
            self.show_caller = env_bool(&s);
        }
        if let Ok(s) = std::env::var("CLILOG_TIME_FORMAT") {
            self = self.time_format(s);
        }
        self
    }

    /// Build the handler. Terminal color support is decided here, once.
    /// # Errors
    /// This function will return an error if the file cannot be opened for
    /// writing or the time format does not parse
    pub fn build(self) -> Result<CliHandler> {
        let time_format = match self.time_format.as_deref() {
            Some(layout) => TimeFormat::parse(layout)?,
            None => TimeFormat::default(),
        };
        let writer = match (self.target, self.file_path) {
            (Target::Writer, Some(p)) => {
                let f = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(p)?;
                Some(Box::new(f) as Box<dyn Write + Send>)
            }
            _ => self.writer,
        };
        let style = self.style.unwrap_or_else(Style::basic_foreground);
        let style = if use_color(self.color_mode, self.target) {
            style
        } else {
            style.without_colors()
        };
        Ok(CliHandler::new(
            Sink::new(self.target, writer),
            Options {
                level: self.level,
                label: self.label,
                show_time: self.show_time,
                time_format,
                show_caller: self.show_caller,
                redact: self.redact,
                style,
            },
        ))
    }
}
