use crate::attr::Attr;
use crate::context::LogContext;
use crate::error::LogError;
use crate::flatten::flatten_compact;
use crate::handler::Handler;
use crate::level::Severity;
use crate::record::Record;
use crate::sink::LogSink;
use chrono::Local;
use nu_ansi_term::Color;
use std::sync::Arc;

/// Clock format of the leading timestamp.
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Renders records as one colorized line:
///
/// ```text
/// <HH:MM:SS.mmm> <LEVEL> <caller> <message> <attrs>
/// ```
///
/// The caller is read from the context written by the metadata stage and
/// is never resolved here. Attributes are flattened and encoded as JSON,
/// compact or indented depending on `multiline`. Empty groups are dropped
/// and an empty object is left out of the line altogether.
#[derive(Clone)]
pub struct TextRenderer {
    sink: Arc<dyn LogSink>,
    multiline: bool,
}

impl TextRenderer {
    pub fn new(sink: Arc<dyn LogSink>, multiline: bool) -> Self {
        TextRenderer { sink, multiline }
    }

    /// Build the full line for `record`, newline included.
    pub fn render(&self, ctx: &LogContext, record: &Record) -> Result<String, LogError> {
        let fields = flatten_compact(record.attrs())?;
        let encoded = if self.multiline {
            serde_json::to_vec_pretty(&fields)?
        } else {
            serde_json::to_vec(&fields)?
        };

        let mut body = record.message.clone();
        if encoded.len() > 2 {
            body.push(' ');
            body.push_str(&String::from_utf8_lossy(&encoded));
        }

        let caller = ctx.caller().map(short_caller).unwrap_or("");
        Ok(format!(
            "{} {} {} {}\n",
            record.timestamp.with_timezone(&Local).format(TIME_FORMAT),
            record.severity.label(),
            Color::DarkGray.paint(caller),
            Color::LightGray.paint(body),
        ))
    }

    /// Pre-bound attributes are not supported; the renderer is returned
    /// unchanged.
    pub fn with_attrs(&self, _attrs: &[Attr]) -> Self {
        self.clone()
    }

    /// Group prefixes are not supported; the renderer is returned
    /// unchanged.
    pub fn with_group(&self, _name: &str) -> Self {
        self.clone()
    }
}

impl Handler for TextRenderer {
    fn enabled(&self, _severity: Severity) -> bool {
        true
    }

    fn handle(&self, ctx: &LogContext, record: Record) -> Result<(), LogError> {
        let line = self.render(ctx, &record)?;
        self.sink.write_record(line.as_bytes())
    }
}

/// Keep only the last directory and the file name of a `path:line` caller.
fn short_caller(caller: &str) -> &str {
    match caller.rmatch_indices('/').nth(1) {
        Some((idx, _)) => &caller[idx + 1..],
        None => caller,
    }
}
