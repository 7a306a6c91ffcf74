use crate::context::LogContext;
use crate::error::LogError;
use crate::level::Severity;
use crate::record::Record;

/// A stage of the logging pipeline.
///
/// The logger asks [`Handler::enabled`] before it builds a record and only
/// calls [`Handler::handle`] for severities that were admitted.
pub trait Handler: Send + Sync {
    fn enabled(&self, severity: Severity) -> bool;

    fn handle(&self, ctx: &LogContext, record: Record) -> Result<(), LogError>;
}
