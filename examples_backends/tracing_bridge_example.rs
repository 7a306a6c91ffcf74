use tracing::{debug, error, info, info_span, trace, warn};

use ctxlog::config::{Config, Format};
use ctxlog::init::init_tracing_with_config;
use ctxlog::level::Severity;

/// Routes ordinary `tracing` macros through the pipeline. The
/// `correlation_id` recorded on the request span is attached to every
/// event emitted inside it.
fn main() {
    init_tracing_with_config(
        Config::default()
            .with_level(Severity::TRACE)
            .with_format(Format::Text)
            .with_multiline(false),
    );

    info!("tracing bridge example started");

    let span = info_span!("request", correlation_id = "req-19c2");
    let _guard = span.enter();

    trace!(step = 1, "parsing request");
    debug!(bytes = 512, "body read");
    warn!(percent = 92, "disk low");
    error!(db = "orders", "simulated error inside the request span");
}
