use core::fmt;

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::format_description::OwnedFormatItem;
use time::OffsetDateTime;

use crate::{Error, Result};

/// How timestamps are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// `2023-01-01T00:00:00Z`
    #[default]
    Rfc3339,
    /// `Sun, 01 Jan 2023 00:00:00 +0000`
    Rfc2822,
    /// A `time` format description such as `[hour]:[minute]:[second]`.
    Custom(OwnedFormatItem),
}

impl TimeFormat {
    /// Parses a layout: `rfc3339`, `rfc2822` (any case), or a `time` format
    /// description.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimeFormat`] when the description does not parse.
    pub fn parse(layout: &str) -> Result<Self> {
        if layout.eq_ignore_ascii_case("rfc3339") {
            return Ok(Self::Rfc3339);
        }
        if layout.eq_ignore_ascii_case("rfc2822") {
            return Ok(Self::Rfc2822);
        }
        time::format_description::parse_owned::<2>(layout)
            .map(Self::Custom)
            .map_err(|source| Error::InvalidTimeFormat {
                layout: layout.to_owned(),
                source,
            })
    }

    /// Appends `t` to `buf`. Timestamps the layout cannot express (e.g. a
    /// year outside RFC 3339's range) fall back to `time`'s `Display`.
    pub(crate) fn write(&self, buf: &mut Vec<u8>, t: OffsetDateTime) {
        let mark = buf.len();
        let res = match self {
            Self::Rfc3339 => t.format_into(buf, &Rfc3339),
            Self::Rfc2822 => t.format_into(buf, &Rfc2822),
            Self::Custom(items) => t.format_into(buf, items),
        };
        if res.is_err() {
            buf.truncate(mark);
            let _ = fmt::Write::write_fmt(&mut ByteWriter(buf), format_args!("{t}"));
        }
    }
}

/// `fmt::Write` over a byte buffer.
struct ByteWriter<'a>(&'a mut Vec<u8>);

impl fmt::Write for ByteWriter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn render(f: &TimeFormat, t: OffsetDateTime) -> String {
        let mut buf = Vec::new();
        f.write(&mut buf, t);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn default_is_rfc3339() {
        let t = datetime!(2023-01-01 00:00:00 UTC);
        assert_eq!(render(&TimeFormat::default(), t), "2023-01-01T00:00:00Z");
    }

    #[test]
    fn parses_well_known_and_custom() {
        let t = datetime!(2024-05-06 07:08:09 UTC);
        assert_eq!(TimeFormat::parse("RFC3339").unwrap(), TimeFormat::Rfc3339);
        assert_eq!(
            render(&TimeFormat::parse("rfc2822").unwrap(), t),
            "Mon, 06 May 2024 07:08:09 +0000"
        );
        let custom = TimeFormat::parse("[hour]:[minute]:[second]").unwrap();
        assert_eq!(render(&custom, t), "07:08:09");
    }

    #[test]
    fn rejects_bad_descriptions() {
        let err = TimeFormat::parse("[bogus]").unwrap_err();
        assert!(matches!(err, Error::InvalidTimeFormat { ref layout, .. } if layout == "[bogus]"));
    }
}
