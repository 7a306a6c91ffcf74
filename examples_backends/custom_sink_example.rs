use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ctxlog::attr::Attr;
use ctxlog::config::{Config, Format};
use ctxlog::context::LogContext;
use ctxlog::error::LogError;
use ctxlog::level::Severity;
use ctxlog::logger::Logger;
use ctxlog::sink::LogSink;

/// Example of sending rendered records to a destination this crate
/// does not ship a sink for. Each record arrives fully formatted, so the
/// sink only has to move bytes.
#[derive(Default)]
struct PrefixedStdoutSink {
    written: AtomicUsize,
}

impl LogSink for PrefixedStdoutSink {
    fn write_record(&self, record: &[u8]) -> Result<(), LogError> {
        let n = self.written.fetch_add(1, Ordering::Relaxed);
        print!("[record {n}] {}", String::from_utf8_lossy(record));
        Ok(())
    }
}

fn main() {
    let sink = Arc::new(PrefixedStdoutSink::default());

    let json = Logger::with_config(
        Config::default()
            .with_level(Severity::TRACE)
            .with_format(Format::Json)
            .with_environment("staging")
            .with_output(sink.clone()),
    );
    let text = Logger::with_config(
        Config::default()
            .with_level(Severity::TRACE)
            .with_format(Format::Text)
            .with_output(sink.clone()),
    );

    let ctx = LogContext::new().with_correlation_id("req-7f3a");
    json.info_ctx(&ctx, "custom sink example started", vec![]);
    json.warn_ctx(
        &ctx,
        "disk low",
        vec![
            Attr::int("percent", 92),
            Attr::group("mount", [Attr::string("path", "/var"), Attr::bool("readonly", false)]),
        ],
    );
    text.trace("probe", vec![Attr::int("n", 1)]);
    text.error_ctx(&ctx, "upstream failed", vec![Attr::string("service", "billing")]);

    println!("{} records written", sink.written.load(Ordering::Relaxed));
}
