use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use ctxlog::config::{Config, Format};
use ctxlog::init::init_tracing_with_config;
use ctxlog::noop_sink::NoopSink;

fn main() {
    init_tracing_with_config(
        Config::default()
            .with_format(Format::Json)
            .with_output(Arc::new(NoopSink)),
    );

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    println!("default config: rendered {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
