use crate::config::Config;
use crate::layer::PipelineLayer;
use crate::logger::Logger;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Install `logger` behind the global `tracing` subscriber.
///
/// **Parameters**
/// - `logger`: composed pipeline that every `tracing` event in the
///   process will be routed through.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
pub fn try_init_tracing(logger: Logger) -> Result<(), SetGlobalDefaultError> {
    let subscriber = Registry::default().with(PipelineLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)
}

/// Initialize global `tracing` subscriber using a logger built from
/// `config`.
///
/// **Effects**
///
/// This installs a [`Registry`] combined with [`PipelineLayer`] as the
/// global default subscriber, so all `tracing` events in the process are
/// rendered by the pipeline.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
pub fn init_tracing_with_config(config: Config) {
    try_init_tracing(Logger::with_config(config)).expect("set global subscriber");
}

/// Initialize tracing with defaults taken from the environment.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`Config::default`]. This is the recommended entrypoint for typical
/// services.
pub fn init_tracing() {
    init_tracing_with_config(Config::default());
}
