//! Structured (JSON) render stage.
//!
//! Emits one self-contained JSON object per record:
//!
//! ```text
//! {"time":"2024-05-01T12:30:00.000Z","level":"WARN","msg":"disk low","percent":92,"correlation_id":"unknown","caller":"src/main.rs:12"}
//! ```
//!
//! Attributes follow the three built-in keys at the top level, with groups
//! rendered as nested objects.

use crate::context::LogContext;
use crate::error::LogError;
use crate::flatten::{flatten, Fields};
use crate::handler::Handler;
use crate::level::Severity;
use crate::record::Record;
use crate::sink::LogSink;
use chrono::SecondsFormat;
use serde::Serialize;
use std::sync::Arc;

/// Level-name substitution applied before encoding.
///
/// The encoder only knows the four standard levels by name; TRACE and
/// FATAL are mapped to their own names here, every other severity keeps
/// the encoder's rendering (`INFO+2` and so on).
pub fn level_name(severity: Severity) -> String {
    match severity {
        Severity::TRACE => "TRACE".to_string(),
        Severity::FATAL => "FATAL".to_string(),
        other => other.encoder_name(),
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    time: String,
    level: String,
    msg: &'a str,
    #[serde(flatten)]
    fields: Fields,
}

/// Terminal stage writing one JSON document per record to its sink.
#[derive(Clone)]
pub struct JsonRenderer {
    sink: Arc<dyn LogSink>,
    replace_level: fn(Severity) -> String,
}

impl JsonRenderer {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        JsonRenderer {
            sink,
            replace_level: level_name,
        }
    }

    /// Encode `record` as a newline-terminated JSON document.
    pub fn render(&self, record: &Record) -> Result<Vec<u8>, LogError> {
        let document = JsonDocument {
            time: record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level: (self.replace_level)(record.severity),
            msg: &record.message,
            fields: flatten(record.attrs())?,
        };

        let mut buf = serde_json::to_vec(&document)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Handler for JsonRenderer {
    fn enabled(&self, _severity: Severity) -> bool {
        true
    }

    fn handle(&self, _ctx: &LogContext, record: Record) -> Result<(), LogError> {
        let buf = self.render(&record)?;
        self.sink.write_record(&buf)
    }
}
