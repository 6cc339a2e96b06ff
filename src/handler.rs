//! The record-rendering handler.
//!
//! A [`CliHandler`] turns one [`Record`] into one line:
//!
//! ```text
//! LEVEL <caller> LABEL message time=... attached=attrs record=attrs
//! ```
//!
//! Handlers derived with [`CliHandler::with_attrs`] and
//! [`CliHandler::with_group`] form a family with their ancestor. The family
//! shares one lock, the output sink and the caller cache. Each member owns
//! its attributes, groups and pre-rendered attribute bytes.

use core::fmt;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use unicode_width::UnicodeWidthStr;

use crate::color::Paint;
use crate::pool;
use crate::record::Record;
use crate::sink::{Sink, Target};
use crate::style::{AffixStyle, CallerStyle, Style};
use crate::timefmt::TimeFormat;
use crate::value::HumanDuration;
use crate::{Attr, Error, Level, Result, Value};

/// The contract between a logging front end and a handler.
///
/// A front end asks [`Handler::enabled`] before building a record and calls
/// [`Handler::handle`] exactly once per record.
pub trait Handler: Send + Sync {
    /// Whether records at `level` would be rendered.
    fn enabled(&self, level: Level) -> bool;

    /// Renders and writes one record.
    ///
    /// # Errors
    /// Fails on a level the handler cannot render, or when the sink fails.
    fn handle(&self, record: &Record<'_>) -> Result<()>;

    /// A handler that also renders `attrs` on every record.
    #[must_use]
    fn with_attrs(&self, attrs: Vec<Attr>) -> Self
    where
        Self: Sized;

    /// A handler that qualifies subsequently attached and record attributes
    /// with `name`.
    #[must_use]
    fn with_group(&self, name: &str) -> Self
    where
        Self: Sized;
}

/// Rewrites an attribute before it is rendered, e.g. to mask secrets.
pub type Redactor = Arc<dyn Fn(Attr) -> Attr + Send + Sync>;

/// State shared by a handler family, guarded by one lock.
struct Shared {
    sink: Sink,
    callers: HashMap<usize, Box<[u8]>>,
}

/// An attribute attached to a handler, with the number of handler groups
/// that were open when it was attached.
#[derive(Clone, Debug)]
struct Attached {
    depth: usize,
    attr: Attr,
}

/// Handler settings, filled in by [`crate::HandlerBuilder`].
pub(crate) struct Options {
    pub(crate) level: Option<Level>,
    pub(crate) label: String,
    pub(crate) show_time: bool,
    pub(crate) time_format: TimeFormat,
    pub(crate) show_caller: bool,
    pub(crate) redact: Option<Redactor>,
    pub(crate) style: Style,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level: None,
            label: String::new(),
            show_time: false,
            time_format: TimeFormat::default(),
            show_caller: false,
            redact: None,
            style: Style::basic_foreground(),
        }
    }
}

/// Renders records as colored terminal lines.
///
/// Cloning is cheap and yields another member of the same family.
#[derive(Clone)]
pub struct CliHandler {
    shared: Arc<Mutex<Shared>>,
    level: Option<Level>,
    label: Arc<str>,
    attrs: Arc<[Attached]>,
    attrs_cache: Option<Arc<[u8]>>,
    redact: Option<Redactor>,
    groups: Arc<[String]>,
    show_caller: bool,
    show_time: bool,
    time_format: Arc<TimeFormat>,
    style: Arc<Style>,
}

/// The group path an attribute is nested under: the handler's groups, then
/// the keys of enclosing group attributes.
#[derive(Clone, Copy)]
enum Path<'a> {
    Root(&'a [String]),
    Child(&'a Path<'a>, &'a str),
}

/// Four rendering buckets: debug, info, warn, error and above.
fn classify(level: Level) -> Result<Level> {
    match level {
        Level::DEBUG | Level::INFO | Level::WARN => Ok(level),
        l if l >= Level::ERROR => Ok(Level::ERROR),
        l => Err(Error::UnknownLevel(l)),
    }
}

/// Centers `s` in `width` display columns; the odd column goes right.
/// Text at least `width` columns wide is written unchanged.
pub(crate) fn align(buf: &mut Vec<u8>, s: &str, width: usize) {
    let pad = width.saturating_sub(s.width());
    let left = pad / 2;
    buf.resize(buf.len() + left, b' ');
    buf.extend_from_slice(s.as_bytes());
    buf.resize(buf.len() + (pad - left), b' ');
}

fn write_affix(buf: &mut Vec<u8>, affix: &AffixStyle) {
    if !affix.text.is_empty() {
        affix.color.write_str(buf, &affix.text);
    }
}

/// `prefix text suffix ` for the level and label segments.
fn write_segment(
    buf: &mut Vec<u8>,
    prefix: &AffixStyle,
    text: &str,
    width: usize,
    color: &impl Paint,
    suffix: &AffixStyle,
) {
    write_affix(buf, prefix);
    if width > 0 {
        color.paint_with(buf, |b| align(b, text, width));
    } else {
        color.write_str(buf, text);
    }
    write_affix(buf, suffix);
    buf.push(b' ');
}

fn write_caller(buf: &mut Vec<u8>, style: &CallerStyle, location: &[u8]) {
    write_affix(buf, &style.prefix);
    style.color.write_bytes(buf, location);
    write_affix(buf, &style.suffix);
    buf.push(b' ');
}

fn write_path(buf: &mut Vec<u8>, path: &Path<'_>, key_color: &impl Paint) {
    match path {
        Path::Root(groups) => {
            for g in groups.iter() {
                key_color.write_str(buf, g);
                key_color.write_str(buf, ".");
            }
        }
        Path::Child(parent, name) => {
            write_path(buf, parent, key_color);
            key_color.write_str(buf, name);
            key_color.write_str(buf, ".");
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\\')
}

/// Double-quoted with C-style escapes: `\n`, `\"`, `\x1b`, `\u0085`.
fn write_quoted(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        let esc: &[u8] = match c {
            '"' => b"\\\"",
            '\\' => b"\\\\",
            '\n' => b"\\n",
            '\r' => b"\\r",
            '\t' => b"\\t",
            '\u{07}' => b"\\a",
            '\u{08}' => b"\\b",
            '\u{0b}' => b"\\v",
            '\u{0c}' => b"\\f",
            c if c.is_ascii_control() => {
                let _ = write!(buf, "\\x{:02x}", c as u32);
                continue;
            }
            c if c.is_control() => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
                continue;
            }
            c => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
                continue;
            }
        };
        buf.extend_from_slice(esc);
    }
    buf.push(b'"');
}

/// Shortest round-trip digits, like `%g`: decimal exponents below -4 or
/// from 6 up switch to `d.ddde±XX` with at least two exponent digits.
fn write_float(buf: &mut Vec<u8>, v: f64) {
    if v.is_nan() {
        buf.extend_from_slice(b"NaN");
        return;
    }
    if v.is_infinite() {
        buf.extend_from_slice(if v > 0.0 { b"+Inf" } else { b"-Inf" });
        return;
    }
    let mark = buf.len();
    let _ = write!(buf, "{v:e}");
    let Some(e) = buf[mark..].iter().position(|&b| b == b'e').map(|i| mark + i) else {
        return;
    };
    let exp = std::str::from_utf8(&buf[e + 1..])
        .ok()
        .and_then(|t| t.parse::<i32>().ok())
        .unwrap_or(0);
    if v == 0.0 || (-4..6).contains(&exp) {
        buf.truncate(mark);
        let _ = write!(buf, "{v}");
    } else {
        buf.truncate(e);
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(buf, "e{sign}{:02}", exp.unsigned_abs());
    }
}

impl CliHandler {
    /// Starts configuring a handler.
    #[inline]
    #[must_use]
    pub fn builder() -> crate::HandlerBuilder {
        crate::HandlerBuilder::default()
    }

    pub(crate) fn new(sink: Sink, options: Options) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                sink,
                callers: HashMap::new(),
            })),
            level: options.level,
            label: options.label.into(),
            attrs: Arc::new([]),
            attrs_cache: None,
            redact: options.redact,
            groups: Arc::new([]),
            show_caller: options.show_caller,
            show_time: options.show_time,
            time_format: Arc::new(options.time_format),
            style: Arc::new(options.style),
        }
    }

    /// A handler that writes nothing.
    pub(crate) fn discard() -> Self {
        Self::new(Sink::new(Target::Writer, None), Options::default())
    }

    /// The minimum level rendered; info when none was configured.
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> Level {
        self.level.unwrap_or(Level::INFO)
    }

    /// Whether records at `level` would be rendered.
    #[inline]
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// The active style, after color negotiation.
    #[inline]
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The static label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Attached group names, outermost first.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Attached attributes, already redacted.
    pub fn attrs(&self) -> impl Iterator<Item = &Attr> + '_ {
        self.attrs.iter().map(|a| &a.attr)
    }

    /// Pre-rendered attached attributes, if the cache is current.
    #[inline]
    #[must_use]
    pub fn cached_attrs(&self) -> Option<&[u8]> {
        self.attrs_cache.as_deref()
    }

    /// Whether both handlers derive from the same root and so share a lock,
    /// a sink and a caller cache.
    #[inline]
    #[must_use]
    pub fn same_family(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Renders `record` and writes it as one line.
    ///
    /// The whole render runs under the family lock.
    ///
    /// # Errors
    /// [`Error::UnknownLevel`] for a level between the named ones (nothing is
    /// written), [`Error::Io`] when the sink fails.
    pub fn handle(&self, record: &Record<'_>) -> Result<()> {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        let bucket = classify(record.level)?;
        let style = &*self.style;
        let mut buf = pool::acquire();

        if let Some(ls) = style.level.get(&bucket) {
            if !ls.text.is_empty() {
                write_segment(&mut buf, &ls.prefix, &ls.text, ls.width, &ls.color, &ls.suffix);
            }
        }

        if self.show_caller {
            if let Some(site) = record.caller {
                let key = site.key();
                if let Some(location) = shared.callers.get(&key) {
                    write_caller(&mut buf, &style.caller, location);
                } else if let Some(location) = site.resolve(style.caller.full_path) {
                    write_caller(&mut buf, &style.caller, &location);
                    shared.callers.insert(key, location);
                }
            }
        }

        if !self.label.is_empty() {
            let ls = &style.label;
            write_segment(&mut buf, &ls.prefix, &self.label, ls.width, &ls.color, &ls.suffix);
        }

        let _ = buf.write_fmt(record.message);

        if self.show_time {
            let a = &style.attr;
            buf.push(b' ');
            a.key_color.write_str(&mut buf, "time");
            a.key_color.write_str(&mut buf, &a.separator);
            a.value_color
                .paint_with(&mut buf, |b| self.time_format.write(b, record.time));
        }

        match &self.attrs_cache {
            Some(cache) => buf.extend_from_slice(cache),
            None => self.write_attached(&mut buf),
        }

        let root = Path::Root(&self.groups);
        for attr in &record.attrs {
            if attr.key.is_empty() {
                continue;
            }
            match &self.redact {
                Some(redact) => self.write_spaced(&mut buf, &redact(attr.clone()), &root),
                None => self.write_spaced(&mut buf, attr, &root),
            }
        }

        buf.push(b'\n');
        shared.sink.write_line(&buf)?;
        Ok(())
    }

    /// A new family member that also renders `attrs`. The ancestor is left
    /// untouched; an empty list returns a clone of `self`.
    ///
    /// With a redactor configured, both the inherited and the new attributes
    /// pass through it. The new attributes are qualified by the groups open
    /// now; inherited ones keep the qualification they were attached with.
    #[must_use]
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        let redact = |attr: Attr| match &self.redact {
            Some(f) => f(attr),
            None => attr,
        };
        let depth = self.groups.len();
        let attached: Vec<Attached> = self
            .attrs
            .iter()
            .map(|a| Attached {
                depth: a.depth,
                attr: redact(a.attr.clone()),
            })
            .chain(attrs.into_iter().map(|attr| Attached {
                depth,
                attr: redact(attr),
            }))
            .collect();

        let mut h = self.clone();
        h.attrs = attached.into();
        h.attrs_cache = h.render_attached();
        h
    }

    /// A new family member whose later attributes are nested under `name`.
    /// An empty name returns a clone of `self`.
    ///
    /// The attribute cache is dropped; attached attributes render live until
    /// the next [`CliHandler::with_attrs`] rebuilds it.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let mut groups = Vec::with_capacity(self.groups.len() + 1);
        groups.extend(self.groups.iter().cloned());
        groups.push(name.to_owned());

        let mut h = self.clone();
        h.groups = groups.into();
        h.attrs_cache = None;
        h
    }

    fn render_attached(&self) -> Option<Arc<[u8]>> {
        let mut buf = pool::acquire();
        self.write_attached(&mut buf);
        (!buf.is_empty()).then(|| Arc::from(&buf[..]))
    }

    fn write_attached(&self, buf: &mut Vec<u8>) {
        for a in self.attrs.iter() {
            let depth = a.depth.min(self.groups.len());
            self.write_spaced(buf, &a.attr, &Path::Root(&self.groups[..depth]));
        }
    }

    /// ` key=value`, or nothing if the attribute renders empty.
    fn write_spaced(&self, buf: &mut Vec<u8>, attr: &Attr, path: &Path<'_>) {
        let mark = buf.len();
        buf.push(b' ');
        if !self.write_attr(buf, attr, path) {
            buf.truncate(mark);
        }
    }

    /// Returns whether anything was written. Empty keys and groups without
    /// renderable children write nothing.
    fn write_attr(&self, buf: &mut Vec<u8>, attr: &Attr, path: &Path<'_>) -> bool {
        if attr.key.is_empty() {
            return false;
        }
        let a = &self.style.attr;

        if let Value::Group(children) = &attr.value {
            let path = Path::Child(path, &attr.key);
            let mut wrote = false;
            for child in children {
                let mark = buf.len();
                if wrote {
                    buf.push(b' ');
                }
                if self.write_attr(buf, child, &path) {
                    wrote = true;
                } else {
                    buf.truncate(mark);
                }
            }
            return wrote;
        }

        write_path(buf, path, &a.key_color);
        a.key_color.write_str(buf, &attr.key);
        a.key_color.write_str(buf, &a.separator);

        let vc = &a.value_color;
        match &attr.value {
            Value::String(s) if needs_quotes(s) => vc.paint_with(buf, |b| write_quoted(b, s)),
            Value::String(s) => vc.write_str(buf, s),
            Value::Int(v) => vc.paint_with(buf, |b| {
                let _ = write!(b, "{v}");
            }),
            Value::Uint(v) => vc.paint_with(buf, |b| {
                let _ = write!(b, "{v}");
            }),
            Value::Float(v) => vc.paint_with(buf, |b| write_float(b, *v)),
            Value::Bool(v) => vc.write_str(buf, if *v { "true" } else { "false" }),
            Value::Time(t) => vc.paint_with(buf, |b| self.time_format.write(b, *t)),
            Value::Duration(d) => vc.paint_with(buf, |b| {
                let _ = write!(b, "{}", HumanDuration(*d));
            }),
            Value::Any(v) => vc.paint_with(buf, |b| {
                let _ = write!(b, "{v}");
            }),
            Value::Group(_) => {}
        }
        true
    }
}

impl Handler for CliHandler {
    #[inline]
    fn enabled(&self, level: Level) -> bool {
        Self::enabled(self, level)
    }

    #[inline]
    fn handle(&self, record: &Record<'_>) -> Result<()> {
        Self::handle(self, record)
    }

    #[inline]
    fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        Self::with_attrs(self, attrs)
    }

    #[inline]
    fn with_group(&self, name: &str) -> Self {
        Self::with_group(self, name)
    }
}

impl fmt::Debug for CliHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliHandler")
            .field("level", &self.threshold())
            .field("label", &self.label)
            .field("groups", &self.groups)
            .field("attrs", &self.attrs.len())
            .field("show_caller", &self.show_caller)
            .field("show_time", &self.show_time)
            .field("redact", &self.redact.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, FG_RED};
    use crate::style::AttrStyle;
    use std::time::Duration;
    use time::macros::datetime;

    fn plain() -> CliHandler {
        CliHandler::new(
            Sink::new(Target::Writer, None),
            Options {
                style: Style::no_color(),
                ..Options::default()
            },
        )
    }

    static SITE: crate::CallSite = crate::CallSite::new("app::net", "src/net.rs", 42);

    #[test]
    fn caller_cache_resolves_each_site_once() {
        let h = CliHandler::new(
            Sink::new(Target::Writer, None),
            Options {
                show_caller: true,
                ..Options::default()
            },
        );
        let child = h.with_group("g");
        for handler in [&h, &child, &h] {
            let r = Record::new(Level::INFO, format_args!("m")).with_caller(&SITE);
            handler.handle(&r).unwrap();
        }
        let shared = h.shared.lock().unwrap();
        assert_eq!(shared.callers.len(), 1);
        assert_eq!(shared.callers.get(&SITE.key()).map(|b| &b[..]), Some(&b"app::net:42"[..]));
    }

    fn attr_text(h: &CliHandler, attr: &Attr, groups: &[String]) -> String {
        let mut buf = Vec::new();
        h.write_attr(&mut buf, attr, &Path::Root(groups));
        String::from_utf8(buf).unwrap()
    }

    fn aligned(s: &str, w: usize) -> String {
        let mut buf = Vec::new();
        align(&mut buf, s, w);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn align_centers_by_display_width() {
        assert_eq!(aligned("foo", 0), "foo");
        assert_eq!(aligned("foo", 3), "foo");
        assert_eq!(aligned("foo", 2), "foo");
        assert_eq!(aligned("foo", 5), " foo ");
        assert_eq!(aligned("foo", 6), " foo  ");
        assert_eq!(aligned("あいう", 6), "あいう");
        assert_eq!(aligned("あ", 4), " あ ");
    }

    #[test]
    fn classify_buckets_levels() {
        assert_eq!(classify(Level::DEBUG).unwrap(), Level::DEBUG);
        assert_eq!(classify(Level::WARN).unwrap(), Level::WARN);
        assert_eq!(classify(Level::from_i32(12)).unwrap(), Level::ERROR);
        assert!(matches!(
            classify(Level::from_i32(1)),
            Err(Error::UnknownLevel(l)) if l == Level::from_i32(1)
        ));
        assert!(classify(Level::from_i32(-8)).is_err());
    }

    #[test]
    fn scalar_kinds() {
        let h = plain();
        let cases = [
            (Attr::string("key", "val"), "key=val"),
            (Attr::string("key", "val 1"), "key=\"val 1\""),
            (Attr::string("path", r"C:\tmp"), r#"path="C:\\tmp""#),
            (Attr::string("q", "say \"hi\""), r#"q="say \"hi\"""#),
            (Attr::int("count", 123), "count=123"),
            (Attr::int("neg", -7), "neg=-7"),
            (Attr::uint("id", 99), "id=99"),
            (Attr::float("ratio", 1.25), "ratio=1.25"),
            (Attr::float("one", 1.0), "one=1"),
            (Attr::float("small", 0.0001), "small=0.0001"),
            (Attr::float("tiny", 1e-7), "tiny=1e-07"),
            (Attr::float("big", 1e21), "big=1e+21"),
            (Attr::float("huge", -1.5e300), "huge=-1.5e+300"),
            (Attr::float("mega", 1_234_567.0), "mega=1.234567e+06"),
            (Attr::float("kilo", 123_456.0), "kilo=123456"),
            (Attr::float("inf", f64::INFINITY), "inf=+Inf"),
            (Attr::float("ninf", f64::NEG_INFINITY), "ninf=-Inf"),
            (Attr::float("nan", f64::NAN), "nan=NaN"),
            (Attr::string("esc", "a\u{1b}b c"), r#"esc="a\x1bb c""#),
            (Attr::string("nl", "x\ny"), r#"nl="x\ny""#),
            (Attr::bool("active", true), "active=true"),
            (Attr::bool("active", false), "active=false"),
            (Attr::duration("dur", Duration::from_secs(1)), "dur=1s"),
            (
                Attr::time("t", datetime!(2023-01-01 00:00:00 UTC)),
                "t=2023-01-01T00:00:00Z",
            ),
            (Attr::any("user", "{Alice}"), "user={Alice}"),
        ];
        for (attr, want) in cases {
            assert_eq!(attr_text(&h, &attr, &[]), want);
        }
    }

    #[test]
    fn groups_build_dotted_paths() {
        let h = plain();
        let base = ["g1".to_owned(), "g2".to_owned()];
        assert_eq!(
            attr_text(&h, &Attr::string("key", "val"), &base),
            "g1.g2.key=val"
        );
        assert_eq!(
            attr_text(
                &h,
                &Attr::group("g1", [Attr::string("k1", "v1"), Attr::int("k2", 2)]),
                &[]
            ),
            "g1.k1=v1 g1.k2=2"
        );
        assert_eq!(
            attr_text(
                &h,
                &Attr::group("outer", [Attr::group("inner", [Attr::string("key", "value")])]),
                &[]
            ),
            "outer.inner.key=value"
        );
        assert_eq!(
            attr_text(
                &h,
                &Attr::group("sub", [Attr::string("k", "v")]),
                &["base".to_owned()]
            ),
            "base.sub.k=v"
        );
    }

    #[test]
    fn empty_keys_and_empty_groups_write_nothing() {
        let h = plain();
        assert_eq!(attr_text(&h, &Attr::string("", "v"), &[]), "");
        assert_eq!(attr_text(&h, &Attr::group("g", []), &[]), "");
        assert_eq!(
            attr_text(
                &h,
                &Attr::group("g", [Attr::string("", "x"), Attr::int("n", 1)]),
                &[]
            ),
            "g.n=1"
        );
    }

    #[test]
    fn key_and_value_colors_apply_separately() {
        let style = Style::builder()
            .attr(AttrStyle {
                key_color: Some(Color::new([FG_RED])),
                value_color: None,
                separator: "=".into(),
            })
            .build();
        let h = CliHandler::new(
            Sink::new(Target::Writer, None),
            Options {
                style,
                ..Options::default()
            },
        );
        assert_eq!(
            attr_text(&h, &Attr::int("n", 1), &["g".to_owned()]),
            "\x1b[31mg\x1b[0m\x1b[31m.\x1b[0m\x1b[31mn\x1b[0m\x1b[31m=\x1b[0m1"
        );
    }
}
