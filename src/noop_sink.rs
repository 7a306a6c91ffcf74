use crate::error::LogError;
use crate::sink::LogSink;

/// A sink that simply drops all records.
///
/// Useful for measuring the overhead of the pipeline itself (call-site
/// resolution, flattening and rendering) without any output I/O.
#[derive(Clone, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_record(&self, _record: &[u8]) -> Result<(), LogError> {
        Ok(())
    }
}
