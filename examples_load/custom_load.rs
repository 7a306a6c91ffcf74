use std::sync::Arc;
use std::thread;
use std::time::Instant;

use ctxlog::attr::Attr;
use ctxlog::config::{Config, Format};
use ctxlog::context::LogContext;
use ctxlog::level::Severity;
use ctxlog::logger::Logger;
use ctxlog::noop_sink::NoopSink;

const THREADS: u64 = 8;
const PER_THREAD: u64 = 50_000;

fn run(format: Format) {
    let logger = Logger::with_config(
        Config::default()
            .with_level(Severity::TRACE)
            .with_format(format)
            .with_output(Arc::new(NoopSink)),
    );

    let start = Instant::now();
    let workers: Vec<_> = (0..THREADS)
        .map(|worker| {
            let logger = logger.clone();
            thread::spawn(move || {
                let ctx = LogContext::new().with_correlation_id(format!("worker-{worker}"));
                for i in 0..PER_THREAD {
                    logger.error_ctx(
                        &ctx,
                        "custom load test error",
                        vec![
                            Attr::uint("iteration", i),
                            Attr::group("job", [Attr::uint("worker", worker), Attr::bool("retry", false)]),
                        ],
                    );
                }
            })
        })
        .collect();

    for worker in workers {
        let _ = worker.join();
    }

    let n = THREADS * PER_THREAD;
    let elapsed = start.elapsed();
    println!("{:?} over {} threads: rendered {} records in {:?} (~{:.0} rec/s)",
        format,
        THREADS,
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}

fn main() {
    run(Format::Json);
    run(Format::Text);
}
