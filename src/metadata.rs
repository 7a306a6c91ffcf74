use crate::attr::Attr;
use crate::context::{LogContext, CALLER_KEY, CORRELATION_ID_KEY, UNKNOWN_CORRELATION_ID};
use crate::error::LogError;
use crate::handler::Handler;
use crate::level::Severity;
use crate::pipeline::Renderer;
use crate::record::Record;

/// Gate-and-enrich stage placed in front of the renderer.
///
/// Admits records at or above the configured level, then appends the
/// correlation id (and, for JSON output, the caller) before forwarding.
/// The resolved caller is also written into a derived [`LogContext`] so
/// the text renderer can print it without resolving it again.
#[derive(Clone)]
pub struct MetadataHandler {
    next: Renderer,
    level: Severity,
    environment: Option<String>,
}

impl MetadataHandler {
    pub fn new(next: impl Into<Renderer>, level: Severity) -> Self {
        MetadataHandler {
            next: next.into(),
            level,
            environment: None,
        }
    }

    /// Tag every record with an `environment` attribute.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn renderer(&self) -> &Renderer {
        &self.next
    }

    fn correlation_id(ctx: &LogContext) -> &str {
        ctx.correlation_id().unwrap_or(UNKNOWN_CORRELATION_ID)
    }

    // A call site already resolved by an outer layer wins over the
    // record's own.
    fn caller(ctx: &LogContext, record: &Record) -> String {
        ctx.call_site()
            .or(record.call_site)
            .map(|site| site.to_string())
            .unwrap_or_default()
    }
}

impl Handler for MetadataHandler {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    fn handle(&self, ctx: &LogContext, mut record: Record) -> Result<(), LogError> {
        let caller = Self::caller(ctx, &record);

        let mut attrs = Vec::with_capacity(3);
        if let Some(environment) = &self.environment {
            attrs.push(Attr::string("environment", environment.as_str()));
        }
        attrs.push(Attr::string(CORRELATION_ID_KEY, Self::correlation_id(ctx)));
        if self.next.is_json() {
            attrs.push(Attr::string(CALLER_KEY, caller.as_str()));
        }
        record.add_attrs(attrs);

        let ctx = ctx.with_caller(caller);
        self.next.handle(&ctx, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonRenderer;
    use crate::record::CallSite;
    use crate::sink::MemorySink;
    use crate::text::TextRenderer;
    use std::sync::Arc;

    fn json_stage(level: Severity) -> (MetadataHandler, MemorySink) {
        let sink = MemorySink::new();
        let stage = MetadataHandler::new(JsonRenderer::new(Arc::new(sink.clone())), level);
        (stage, sink)
    }

    fn last_doc(sink: &MemorySink) -> serde_json::Value {
        let lines = sink.lines();
        serde_json::from_str(lines.last().expect("no output")).unwrap()
    }

    #[test]
    fn test_enabled_matches_ordering() {
        let all = [
            Severity::TRACE,
            Severity::DEBUG,
            Severity::INFO,
            Severity::WARN,
            Severity::ERROR,
            Severity::FATAL,
        ];
        for min in all {
            let (stage, _) = json_stage(min);
            for s in all {
                assert_eq!(stage.enabled(s), s >= min, "min={min:?} s={s:?}");
            }
        }
    }

    #[test]
    fn test_missing_correlation_id_is_unknown() {
        let (stage, sink) = json_stage(Severity::TRACE);
        stage
            .handle(&LogContext::new(), Record::new(Severity::INFO, "m", None))
            .unwrap();
        assert_eq!(last_doc(&sink)["correlation_id"], "unknown");
    }

    #[test]
    fn test_correlation_id_passes_through() {
        let (stage, sink) = json_stage(Severity::TRACE);
        let ctx = LogContext::new().with_correlation_id("abc-123");
        stage.handle(&ctx, Record::new(Severity::INFO, "m", None)).unwrap();
        assert_eq!(last_doc(&sink)["correlation_id"], "abc-123");
    }

    #[test]
    fn test_caller_from_record_call_site() {
        let (stage, sink) = json_stage(Severity::TRACE);
        let record = Record::new(Severity::INFO, "m", Some(CallSite::new("src/app.rs", 7)));
        stage.handle(&LogContext::new(), record).unwrap();
        assert_eq!(last_doc(&sink)["caller"], "src/app.rs:7");
    }

    #[test]
    fn test_context_call_site_wins() {
        let (stage, sink) = json_stage(Severity::TRACE);
        let ctx = LogContext::new().with_call_site(CallSite::new("src/outer.rs", 99));
        let record = Record::new(Severity::INFO, "m", Some(CallSite::new("src/app.rs", 7)));
        stage.handle(&ctx, record).unwrap();
        assert_eq!(last_doc(&sink)["caller"], "src/outer.rs:99");
    }

    #[test]
    fn test_missing_call_site_degrades_to_empty() {
        let (stage, sink) = json_stage(Severity::TRACE);
        stage
            .handle(&LogContext::new(), Record::new(Severity::INFO, "m", None))
            .unwrap();
        assert_eq!(last_doc(&sink)["caller"], "");
    }

    #[test]
    fn test_injected_attrs_are_appended() {
        let (stage, sink) = json_stage(Severity::TRACE);
        let mut record = Record::new(Severity::INFO, "m", None);
        record.add_attrs(vec![Attr::int("first", 1)]);
        stage
            .with_environment("staging")
            .handle(&LogContext::new(), record)
            .unwrap();

        let doc = last_doc(&sink);
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            ["time", "level", "msg", "first", "environment", "correlation_id", "caller"]
        );
    }

    #[test]
    fn test_text_output_carries_caller_only_in_prefix() {
        let sink = MemorySink::new();
        let stage = MetadataHandler::new(
            TextRenderer::new(Arc::new(sink.clone()), false),
            Severity::TRACE,
        );
        let record = Record::new(Severity::INFO, "m", Some(CallSite::new("src/app.rs", 7)));
        stage.handle(&LogContext::new(), record).unwrap();

        let out = sink.contents();
        assert_eq!(out.matches("src/app.rs:7").count(), 1);
        assert!(!out.contains("\"caller\""));
        assert!(out.contains(r#""correlation_id":"unknown""#));
    }

    #[test]
    fn test_original_context_is_not_modified() {
        let (stage, _) = json_stage(Severity::TRACE);
        let ctx = LogContext::new();
        stage.handle(&ctx, Record::new(Severity::INFO, "m", None)).unwrap();
        assert_eq!(ctx.caller(), None);
    }
}
