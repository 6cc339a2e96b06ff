//! Visual styles: level labels, the static label, attributes and caller.
//!
//! A [`Style`] is a plain value. Presets return a fresh value on every call,
//! and `clone()` copies the level map, so customizing a derived style never
//! touches the one it came from.

use std::collections::HashMap;

use crate::color::{
    Color, BG_GREEN, BG_MAGENTA, BG_RED, BG_YELLOW, BOLD, FG_HI_BLACK, FG_HI_GREEN, FG_HI_MAGENTA,
    FG_HI_RED, FG_HI_YELLOW, UNDERLINE,
};
use crate::Level;

/// Text written before or after a segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AffixStyle {
    /// Literal text; nothing is written when empty.
    pub text: String,
    /// Color of the text.
    pub color: Option<Color>,
}

impl AffixStyle {
    /// Uncolored affix.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    /// Colored affix.
    #[must_use]
    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// How one severity is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStyle {
    /// Written before the level text.
    pub prefix: AffixStyle,
    /// Written after the level text.
    pub suffix: AffixStyle,
    /// The level text; the whole segment is skipped when empty.
    pub text: String,
    /// Color of the level text.
    pub color: Option<Color>,
    /// Display columns to center the text in; `0` writes it as is.
    pub width: usize,
}

/// How the handler's static label is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelStyle {
    /// Written before the label.
    pub prefix: AffixStyle,
    /// Written after the label.
    pub suffix: AffixStyle,
    /// Color of the label.
    pub color: Option<Color>,
    /// Display columns to center the label in; `0` writes it as is.
    pub width: usize,
}

/// How `key=value` pairs are rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttrStyle {
    /// Color of keys, group paths and the separator.
    pub key_color: Option<Color>,
    /// Color of values.
    pub value_color: Option<Color>,
    /// Written between key and value.
    pub separator: String,
}

/// How the call site is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerStyle {
    /// Written before the call site.
    pub prefix: AffixStyle,
    /// Written after the call site.
    pub suffix: AffixStyle,
    /// Color of `location:line`.
    pub color: Option<Color>,
    /// Show the source file path instead of the module path.
    pub full_path: bool,
}

/// Complete rendering style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// One entry per renderable severity: debug, info, warn and error.
    pub level: HashMap<Level, LevelStyle>,
    /// Static label.
    pub label: LabelStyle,
    /// Attributes.
    pub attr: AttrStyle,
    /// Call site.
    pub caller: CallerStyle,
}

fn level_styles(entries: [(&str, Color); 4], width: usize) -> HashMap<Level, LevelStyle> {
    let levels = [Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR];
    levels
        .into_iter()
        .zip(entries)
        .map(|(l, (text, color))| {
            (
                l,
                LevelStyle {
                    text: text.to_owned(),
                    color: Some(color),
                    width,
                    ..LevelStyle::default()
                },
            )
        })
        .collect()
}

/// Label, attribute and caller styling shared by the colored presets.
fn colored(level: HashMap<Level, LevelStyle>) -> Style {
    Style {
        level,
        label: LabelStyle {
            color: Some(Color::new([FG_HI_BLACK, BOLD])),
            ..LabelStyle::default()
        },
        attr: AttrStyle {
            key_color: Some(Color::new([FG_HI_BLACK])),
            value_color: None,
            separator: "=".to_owned(),
        },
        caller: CallerStyle {
            prefix: AffixStyle::colored("<", Color::new([FG_HI_BLACK])),
            suffix: AffixStyle::colored(">", Color::new([FG_HI_BLACK])),
            color: Some(Color::new([FG_HI_BLACK, UNDERLINE])),
            full_path: false,
        },
    }
}

/// 24-bit color: `base;2;r;g;b` followed by bold.
fn rgb(base: u8, r: u8, g: u8, b: u8) -> Color {
    Color::new([base, 2, r, g, b, BOLD])
}

impl Style {
    /// Starts a custom style from [`Style::no_color`].
    #[inline]
    #[must_use]
    pub fn builder() -> StyleBuilder {
        StyleBuilder::default()
    }

    /// Bracketed level names and no colors.
    #[must_use]
    pub fn no_color() -> Self {
        let level = [
            (Level::DEBUG, "[DBG]"),
            (Level::INFO, "[INF]"),
            (Level::WARN, "[WRN]"),
            (Level::ERROR, "[ERR]"),
        ]
        .into_iter()
        .map(|(l, text)| {
            (
                l,
                LevelStyle {
                    text: text.to_owned(),
                    ..LevelStyle::default()
                },
            )
        })
        .collect();
        Self {
            level,
            label: LabelStyle::default(),
            attr: AttrStyle {
                separator: "=".to_owned(),
                ..AttrStyle::default()
            },
            caller: CallerStyle {
                prefix: AffixStyle::plain("<"),
                suffix: AffixStyle::plain(">"),
                ..CallerStyle::default()
            },
        }
    }

    /// Bold bright foreground colors. The handler default.
    #[must_use]
    pub fn basic_foreground() -> Self {
        colored(level_styles(
            [
                ("DBG", Color::new([BOLD, FG_HI_MAGENTA])),
                ("INF", Color::new([BOLD, FG_HI_GREEN])),
                ("WRN", Color::new([BOLD, FG_HI_YELLOW])),
                ("ERR", Color::new([BOLD, FG_HI_RED])),
            ],
            0,
        ))
    }

    /// 24-bit foreground colors.
    #[must_use]
    pub fn vivid_foreground() -> Self {
        colored(level_styles(
            [
                ("DBG", rgb(38, 95, 95, 255)),
                ("INF", rgb(38, 95, 255, 215)),
                ("WRN", rgb(38, 215, 255, 135)),
                ("ERR", rgb(38, 255, 95, 135)),
            ],
            0,
        ))
    }

    /// Background-colored level badges, five columns wide.
    #[must_use]
    pub fn basic_background() -> Self {
        colored(level_styles(
            [
                ("DBG", Color::new([BOLD, BG_MAGENTA])),
                ("INF", Color::new([BOLD, BG_GREEN])),
                ("WRN", Color::new([BOLD, BG_YELLOW])),
                ("ERR", Color::new([BOLD, BG_RED])),
            ],
            5,
        ))
    }

    /// 24-bit background level badges, five columns wide.
    #[must_use]
    pub fn vivid_background() -> Self {
        colored(level_styles(
            [
                ("DBG", rgb(48, 95, 95, 255)),
                ("INF", rgb(48, 95, 255, 215)),
                ("WRN", rgb(48, 215, 255, 135)),
                ("ERR", rgb(48, 255, 95, 135)),
            ],
            5,
        ))
    }

    /// The same style with every color removed. Texts, widths, affixes and
    /// the separator are kept.
    #[must_use]
    pub fn without_colors(mut self) -> Self {
        for ls in self.level.values_mut() {
            ls.color = None;
            ls.prefix.color = None;
            ls.suffix.color = None;
        }
        self.label.color = None;
        self.label.prefix.color = None;
        self.label.suffix.color = None;
        self.attr.key_color = None;
        self.attr.value_color = None;
        self.caller.color = None;
        self.caller.prefix.color = None;
        self.caller.suffix.color = None;
        self
    }
}

/// Builds a custom [`Style`] by overriding pieces of a base style.
///
/// Options apply in call order. [`StyleBuilder::levels`] merges into the
/// level map, so several calls can each customize a different severity.
#[derive(Clone, Debug)]
pub struct StyleBuilder {
    style: Style,
}

impl Default for StyleBuilder {
    fn default() -> Self {
        Self {
            style: Style::no_color(),
        }
    }
}

impl StyleBuilder {
    /// Starts from `base` instead of the no-color preset.
    #[inline]
    #[must_use]
    pub const fn from_base(base: Style) -> Self {
        Self { style: base }
    }

    /// Merges level styles into the level map.
    #[must_use]
    pub fn levels(mut self, levels: impl IntoIterator<Item = (Level, LevelStyle)>) -> Self {
        self.style.level.extend(levels);
        self
    }

    /// Sets the style of one level.
    #[must_use]
    pub fn level(self, level: Level, style: LevelStyle) -> Self {
        self.levels([(level, style)])
    }

    /// Replaces the label style.
    #[must_use]
    pub fn label(mut self, label: LabelStyle) -> Self {
        self.style.label = label;
        self
    }

    /// Replaces the attribute style.
    #[must_use]
    pub fn attr(mut self, attr: AttrStyle) -> Self {
        self.style.attr = attr;
        self
    }

    /// Replaces the caller style.
    #[must_use]
    pub fn caller(mut self, caller: CallerStyle) -> Self {
        self.style.caller = caller;
        self
    }

    /// Finishes the style.
    #[must_use]
    pub fn build(self) -> Style {
        self.style
    }
}
