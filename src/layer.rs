use crate::attr::Attr;
use crate::context::{LogContext, CORRELATION_ID_KEY};
use crate::level::Severity;
use crate::logger::Logger;
use crate::record::{CallSite, Record};
use tracing::field::{Field, Visit};
use tracing::span::{self, Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that routes `tracing` events through a
/// [`Logger`] pipeline.
///
/// Each event becomes a [`Record`] whose call site is the event's
/// `file:line` and whose attributes are the event fields. A
/// `correlation_id` field on the event, or on the nearest enclosing span
/// that has one, becomes the record's correlation id:
///
/// ```rust,ignore
/// let span = tracing::info_span!("request", correlation_id = %id);
/// let _guard = span.enter();
/// tracing::warn!(percent = 92, "disk low");
/// ```
pub struct PipelineLayer {
    logger: Logger,
}

impl PipelineLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Correlation id recorded on a span, kept in the span's extensions.
struct SpanCorrelationId(String);

impl<S> Layer<S> for PipelineLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = CorrelationIdVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(correlation_id), Some(span)) = (visitor.0, ctx.span(id)) {
            span.extensions_mut().insert(SpanCorrelationId(correlation_id));
        }
    }

    fn on_record(&self, id: &Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let mut visitor = CorrelationIdVisitor::default();
        values.record(&mut visitor);
        if let (Some(correlation_id), Some(span)) = (visitor.0, ctx.span(id)) {
            let mut extensions = span.extensions_mut();
            extensions.remove::<SpanCorrelationId>();
            extensions.insert(SpanCorrelationId(correlation_id));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        let severity = Severity::from(*meta.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut attrs = Vec::new();
        let mut message: Option<String> = None;
        let mut correlation_id: Option<String> = None;

        let mut visitor = FieldVisitor {
            attrs: &mut attrs,
            message: &mut message,
            correlation_id: &mut correlation_id,
        };
        event.record(&mut visitor);

        if correlation_id.is_none() {
            if let Some(scope) = ctx.event_scope(event) {
                for span in scope {
                    if let Some(found) = span.extensions().get::<SpanCorrelationId>() {
                        correlation_id = Some(found.0.clone());
                        break;
                    }
                }
            }
        }

        let mut log_ctx = LogContext::new();
        if let Some(id) = correlation_id {
            log_ctx = log_ctx.with_correlation_id(id);
        }

        let call_site = meta.file().zip(meta.line()).map(|(file, line)| CallSite::new(file, line));
        let mut record = Record::new(severity, message.unwrap_or_default(), call_site);
        record.add_attrs(attrs);

        if let Err(e) = self.logger.handle(&log_ctx, record) {
            eprintln!("failed to write log record: {}", e);
        }
    }
}

struct FieldVisitor<'a> {
    attrs: &'a mut Vec<Attr>,
    message: &'a mut Option<String>,
    correlation_id: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => *self.message = Some(value.to_string()),
            CORRELATION_ID_KEY => *self.correlation_id = Some(value.to_string()),
            name => self.attrs.push(Attr::string(name, value)),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attr::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attr::uint(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attr::float(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attr::bool(field.name(), value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}

#[derive(Default)]
struct CorrelationIdVisitor(Option<String>);

impl Visit for CorrelationIdVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == CORRELATION_ID_KEY {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == CORRELATION_ID_KEY {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Format};
    use crate::sink::MemorySink;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn capture(level: Severity, f: impl FnOnce()) -> Vec<serde_json::Value> {
        let sink = MemorySink::new();
        let logger = Logger::with_config(
            Config::default()
                .with_level(level)
                .with_format(Format::Json)
                .with_output(Arc::new(sink.clone())),
        );
        let subscriber = Registry::default().with(PipelineLayer::new(logger));
        tracing::subscriber::with_default(subscriber, f);

        sink.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_becomes_record() {
        let mut line = 0;
        let docs = capture(Severity::INFO, || {
            line = line!() + 1;
            tracing::warn!(percent = 92, mount = "/var", "disk low");
        });

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc["level"], "WARN");
        assert_eq!(doc["msg"], "disk low");
        assert_eq!(doc["percent"], 92);
        assert_eq!(doc["mount"], "/var");
        assert_eq!(doc["correlation_id"], "unknown");
        assert!(doc["caller"].as_str().unwrap().ends_with(&format!("layer.rs:{line}")));
    }

    #[test]
    fn test_events_below_level_are_dropped() {
        let docs = capture(Severity::INFO, || {
            tracing::debug!("hidden");
            tracing::trace!("hidden too");
        });
        assert!(docs.is_empty());
    }

    #[test]
    fn test_trace_events_keep_their_name() {
        let docs = capture(Severity::TRACE, || tracing::trace!("probe"));
        assert_eq!(docs[0]["level"], "TRACE");
    }

    #[test]
    fn test_correlation_id_from_enclosing_span() {
        let docs = capture(Severity::TRACE, || {
            let outer = tracing::info_span!("request", correlation_id = "req-42");
            let _outer = outer.enter();
            let inner = tracing::info_span!("db");
            let _inner = inner.enter();
            tracing::info!("query");
        });
        assert_eq!(docs[0]["correlation_id"], "req-42");
    }

    #[test]
    fn test_correlation_id_recorded_later() {
        let docs = capture(Severity::TRACE, || {
            let span = tracing::info_span!("request", correlation_id = tracing::field::Empty);
            span.record("correlation_id", "late-1");
            let _guard = span.enter();
            tracing::info!("handled");
        });
        assert_eq!(docs[0]["correlation_id"], "late-1");
    }

    #[test]
    fn test_event_correlation_id_field_wins() {
        let docs = capture(Severity::TRACE, || {
            let span = tracing::info_span!("request", correlation_id = "from-span");
            let _guard = span.enter();
            tracing::info!(correlation_id = "from-event", "handled");
        });
        let doc = &docs[0];
        assert_eq!(doc["correlation_id"], "from-event");
        let keys = doc.as_object().unwrap().keys().filter(|k| *k == "correlation_id").count();
        assert_eq!(keys, 1);
    }
}
