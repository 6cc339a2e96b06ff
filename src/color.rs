//! SGR escape sequences.
//!
//! A [`Color`] wraps a list of SGR codes and writes them around a piece of
//! text. A color with no codes, or no color at all (`None`), passes the text
//! through untouched.

use std::io::Write;

/// Reset all attributes.
pub const RESET: u8 = 0;
/// Bold
pub const BOLD: u8 = 1;
/// Faint
pub const FAINT: u8 = 2;
/// Italic
pub const ITALIC: u8 = 3;
/// Underline
pub const UNDERLINE: u8 = 4;
/// Slow blink
pub const BLINK_SLOW: u8 = 5;
/// Rapid blink
pub const BLINK_RAPID: u8 = 6;
/// Reverse video
pub const REVERSE_VIDEO: u8 = 7;
/// Concealed
pub const CONCEALED: u8 = 8;
/// Crossed out
pub const CROSSED_OUT: u8 = 9;

/// Black foreground
pub const FG_BLACK: u8 = 30;
/// Red foreground
pub const FG_RED: u8 = 31;
/// Green foreground
pub const FG_GREEN: u8 = 32;
/// Yellow foreground
pub const FG_YELLOW: u8 = 33;
/// Blue foreground
pub const FG_BLUE: u8 = 34;
/// Magenta foreground
pub const FG_MAGENTA: u8 = 35;
/// Cyan foreground
pub const FG_CYAN: u8 = 36;
/// White foreground
pub const FG_WHITE: u8 = 37;

/// Bright black foreground
pub const FG_HI_BLACK: u8 = 90;
/// Bright red foreground
pub const FG_HI_RED: u8 = 91;
/// Bright green foreground
pub const FG_HI_GREEN: u8 = 92;
/// Bright yellow foreground
pub const FG_HI_YELLOW: u8 = 93;
/// Bright blue foreground
pub const FG_HI_BLUE: u8 = 94;
/// Bright magenta foreground
pub const FG_HI_MAGENTA: u8 = 95;
/// Bright cyan foreground
pub const FG_HI_CYAN: u8 = 96;
/// Bright white foreground
pub const FG_HI_WHITE: u8 = 97;

/// Black background
pub const BG_BLACK: u8 = 40;
/// Red background
pub const BG_RED: u8 = 41;
/// Green background
pub const BG_GREEN: u8 = 42;
/// Yellow background
pub const BG_YELLOW: u8 = 43;
/// Blue background
pub const BG_BLUE: u8 = 44;
/// Magenta background
pub const BG_MAGENTA: u8 = 45;
/// Cyan background
pub const BG_CYAN: u8 = 46;
/// White background
pub const BG_WHITE: u8 = 47;

/// Bright black background
pub const BG_HI_BLACK: u8 = 100;
/// Bright red background
pub const BG_HI_RED: u8 = 101;
/// Bright green background
pub const BG_HI_GREEN: u8 = 102;
/// Bright yellow background
pub const BG_HI_YELLOW: u8 = 103;
/// Bright blue background
pub const BG_HI_BLUE: u8 = 104;
/// Bright magenta background
pub const BG_HI_MAGENTA: u8 = 105;
/// Bright cyan background
pub const BG_HI_CYAN: u8 = 106;
/// Bright white background
pub const BG_HI_WHITE: u8 = 107;

const RST: &[u8] = b"\x1b[0m";

/// An immutable set of SGR codes with its escape sequences precomputed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Color {
    codes: Vec<u8>,
    activate: Vec<u8>,
    reset: &'static [u8],
}

impl Color {
    /// Builds a color from SGR codes, e.g. `Color::new([BOLD, FG_HI_RED])`.
    ///
    /// No codes yields a pass-through color with no escape sequences at all.
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = u8>) -> Self {
        let codes: Vec<u8> = codes.into_iter().collect();
        if codes.is_empty() {
            return Self::default();
        }
        let mut activate = Vec::with_capacity(2 + codes.len() * 4);
        activate.extend_from_slice(b"\x1b[");
        for (i, code) in codes.iter().enumerate() {
            if i > 0 {
                activate.push(b';');
            }
            let _ = write!(activate, "{code}");
        }
        activate.push(b'm');
        Self {
            codes,
            activate,
            reset: RST,
        }
    }

    /// The SGR codes.
    #[inline]
    #[must_use]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// The "turn on" sequence, empty for a pass-through color.
    #[inline]
    #[must_use]
    pub fn activate(&self) -> &[u8] {
        &self.activate
    }

    /// The reset sequence, empty for a pass-through color.
    #[inline]
    #[must_use]
    pub const fn reset(&self) -> &[u8] {
        self.reset
    }
}

/// Writes text wrapped in a color's escape sequences.
///
/// Implemented for [`Color`] and for `Option<Color>`, where `None` writes the
/// content unchanged.
pub trait Paint {
    /// Writes `f`'s output between the activate and reset sequences.
    fn paint_with(&self, buf: &mut Vec<u8>, f: impl FnOnce(&mut Vec<u8>));

    /// Writes `s`, colored.
    #[inline]
    fn write_str(&self, buf: &mut Vec<u8>, s: &str) {
        self.write_bytes(buf, s.as_bytes());
    }

    /// Writes `b`, colored.
    #[inline]
    fn write_bytes(&self, buf: &mut Vec<u8>, b: &[u8]) {
        self.paint_with(buf, |buf| buf.extend_from_slice(b));
    }
}

impl Paint for Color {
    #[inline]
    fn paint_with(&self, buf: &mut Vec<u8>, f: impl FnOnce(&mut Vec<u8>)) {
        buf.extend_from_slice(&self.activate);
        f(buf);
        buf.extend_from_slice(self.reset);
    }
}

impl Paint for Option<Color> {
    #[inline]
    fn paint_with(&self, buf: &mut Vec<u8>, f: impl FnOnce(&mut Vec<u8>)) {
        match self {
            Some(c) => c.paint_with(buf, f),
            None => f(buf),
        }
    }
}
