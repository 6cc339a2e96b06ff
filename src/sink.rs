use std::io::{self, IsTerminal, Write};

/// When a handler keeps its style's escape sequences.
///
/// Negotiated once, when the handler is built; a handler built without
/// colors renders every style as if it had none.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum ColorMode {
    /// Keep colors if the target is stdout or stderr attached to a terminal.
    #[default]
    Auto,
    /// Keep colors whatever the target is.
    Always,
    /// Strip colors.
    Never,
}

/// `CLILOG_COLOR` or a config value named no color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseColorModeError;

impl core::fmt::Display for ParseColorModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("color mode must be auto, always or never")
    }
}

impl std::error::Error for ParseColorModeError {}

impl core::str::FromStr for ColorMode {
    type Err = ParseColorModeError;
    /// Case-insensitive; an empty string is `Auto`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [("", Self::Auto), ("auto", Self::Auto), ("always", Self::Always), ("never", Self::Never)]
            .into_iter()
            .find_map(|(name, mode)| s.eq_ignore_ascii_case(name).then_some(mode))
            .ok_or(ParseColorModeError)
    }
}

impl core::convert::TryFrom<&str> for ColorMode {
    type Error = ParseColorModeError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Where a handler family writes its lines.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Target {
    /// Standard output, locked per line.
    Stdout,
    /// Standard error, locked per line.
    #[default]
    Stderr,
    /// The writer or file given to the builder. Without one, lines are dropped.
    Writer,
}

/// Resolves `mode` against `target`. Writers and files are never terminals.
pub(crate) fn use_color(mode: ColorMode, target: Target) -> bool {
    match (mode, target) {
        (ColorMode::Always, _) => true,
        (ColorMode::Never, _) | (ColorMode::Auto, Target::Writer) => false,
        (ColorMode::Auto, Target::Stdout) => io::stdout().is_terminal(),
        (ColorMode::Auto, Target::Stderr) => io::stderr().is_terminal(),
    }
}

/// Where finished lines go.
pub(crate) struct Sink {
    target: Target,
    writer: Option<Box<dyn Write + Send>>,
}

impl Sink {
    pub(crate) fn new(target: Target, writer: Option<Box<dyn Write + Send>>) -> Self {
        Self { target, writer }
    }

    /// Writes one complete line. A `Writer` target without a writer discards.
    pub(crate) fn write_line(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.target {
            Target::Stdout => io::stdout().lock().write_all(bytes),
            Target::Stderr => io::stderr().lock().write_all(bytes),
            Target::Writer => match self.writer.as_mut() {
                Some(w) => w.write_all(bytes),
                None => Ok(()),
            },
        }
    }
}
