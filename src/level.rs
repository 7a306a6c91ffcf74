use nu_ansi_term::{Color, Style};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered log severity.
///
/// Values follow the spacing of the common four-level scheme
/// (`DEBUG=-4`, `INFO=0`, `WARN=4`, `ERROR=8`) and extend it on both
/// ends with [`Severity::TRACE`] and [`Severity::FATAL`]. Any value in
/// between is a valid severity as well; configured levels such as
/// `"debug-2"` produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(i8);

impl Severity {
    /// Finer than DEBUG, for step-by-step diagnostics.
    pub const TRACE: Severity = Severity(-8);
    pub const DEBUG: Severity = Severity(-4);
    pub const INFO: Severity = Severity(0);
    pub const WARN: Severity = Severity(4);
    pub const ERROR: Severity = Severity(8);
    /// Above ERROR; logging at this level panics after the record is written.
    pub const FATAL: Severity = Severity(12);

    pub const fn from_i8(value: i8) -> Self {
        Severity(value)
    }

    pub const fn as_i8(self) -> i8 {
        self.0
    }

    /// Shift the severity by `delta` steps, saturating at the `i8` bounds.
    pub fn offset(self, delta: i8) -> Self {
        Severity(self.0.saturating_add(delta))
    }

    /// Parse a configured level.
    ///
    /// Only the first character is inspected, case-insensitively:
    /// `t`, `d`, `i`, `w`, `e` and `f` select TRACE through FATAL, anything
    /// else (including an empty string) selects INFO. This means
    /// `"whatever"` parses as WARN.
    ///
    /// A `-N` suffix lowers the result by `N` steps, so `"debug-2"` admits
    /// two extra levels of verbosity below DEBUG. An offset that is not a
    /// number is ignored.
    pub fn parse(text: &str) -> Severity {
        let mut steps: i8 = 0;
        if let Some((_, extra)) = text.split_once('-') {
            match extra.trim().parse::<i8>() {
                Ok(n) => steps = n,
                Err(err) => {
                    tracing::warn!(level = text, error = %err, "ignoring invalid level offset");
                }
            }
        }

        let base = match text.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('t') => Severity::TRACE,
            Some('d') => Severity::DEBUG,
            Some('i') => Severity::INFO,
            Some('w') => Severity::WARN,
            Some('e') => Severity::ERROR,
            Some('f') => Severity::FATAL,
            _ => Severity::INFO,
        };
        base.offset(steps.saturating_neg())
    }

    /// Name as the plain four-level encoder renders it: the nearest
    /// standard level at or below this one, plus a signed offset.
    ///
    /// TRACE comes out as `DEBUG-4` and FATAL as `ERROR+4`; see
    /// [`Severity::name`] for the substituted form.
    pub fn encoder_name(self) -> String {
        let (base, delta) = if self < Severity::INFO {
            ("DEBUG", self.0 as i16 - Severity::DEBUG.0 as i16)
        } else if self < Severity::WARN {
            ("INFO", self.0 as i16 - Severity::INFO.0 as i16)
        } else if self < Severity::ERROR {
            ("WARN", self.0 as i16 - Severity::WARN.0 as i16)
        } else {
            ("ERROR", self.0 as i16 - Severity::ERROR.0 as i16)
        };

        if delta == 0 {
            base.to_string()
        } else {
            format!("{base}{delta:+}")
        }
    }

    /// Textual name with TRACE and FATAL spelled out.
    pub fn name(self) -> String {
        crate::json::level_name(self)
    }

    /// Colorized, five-character label used by the text renderer.
    pub fn label(self) -> String {
        let (style, text) = match self {
            Severity::TRACE => (Style::new().bold().fg(Color::White), "TRACE"),
            Severity::DEBUG => (Style::new().bold().fg(Color::Purple), "DEBUG"),
            Severity::INFO => (Style::new().bold().fg(Color::Blue), "INFO "),
            Severity::WARN => (Style::new().bold().fg(Color::Yellow), "WARN "),
            Severity::ERROR => (Style::new().bold().fg(Color::Red), "ERROR"),
            Severity::FATAL => (Style::new().bold().on(Color::LightRed), "FATAL"),
            other => return format!("{:<5}", other.encoder_name()),
        };
        style.paint(text).to_string()
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::INFO
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Severity::TRACE,
            tracing::Level::DEBUG => Severity::DEBUG,
            tracing::Level::INFO => Severity::INFO,
            tracing::Level::WARN => Severity::WARN,
            tracing::Level::ERROR => Severity::ERROR,
        }
    }
}
