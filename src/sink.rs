use crate::error::LogError;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for rendered log records.
///
/// Implementations are responsible for transporting one fully formatted
/// record (a text line or a JSON document, newline included) to a concrete
/// output. The pipeline calls `write_record` synchronously on the thread
/// that issued the logging call.
pub trait LogSink: Send + Sync {
    /// Write a single rendered record.
    ///
    /// **Parameters**
    /// - `record`: the complete bytes of one record.
    ///
    /// **Returns**
    /// - `Ok(())` if the whole record was written.
    /// - `Err(..)` if the underlying writer failed.
    ///
    /// Concurrent calls must not interleave their bytes: either the whole
    /// record lands contiguously or the call fails.
    fn write_record(&self, record: &[u8]) -> Result<(), LogError>;

    /// Flush any buffered records, if the sink buffers.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), LogError> {
        Ok(())
    }
}

/// Sink around any [`io::Write`], serialized by a mutex so each record is
/// written with a single `write_all` while the lock is held.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, LogError> {
        self.writer.into_inner().map_err(|_| LogError::SinkPoisoned)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_record(&self, record: &[u8]) -> Result<(), LogError> {
        let mut writer = self.writer.lock().map_err(|_| LogError::SinkPoisoned)?;
        writer.write_all(record)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), LogError> {
        let mut writer = self.writer.lock().map_err(|_| LogError::SinkPoisoned)?;
        writer.flush()?;
        Ok(())
    }
}

/// Shared sink writing to the process's standard output.
pub fn stdout() -> Arc<dyn LogSink> {
    Arc::new(WriterSink::new(io::stdout()))
}

/// Shared sink writing to the process's standard error.
pub fn stderr() -> Arc<dyn LogSink> {
    Arc::new(WriterSink::new(io::stderr()))
}

/// In-memory sink that keeps every record.
///
/// Clones share the same buffer, so a clone can be handed to a logger
/// while the original is used to inspect output.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn write_record(&self, record: &[u8]) -> Result<(), LogError> {
        let mut buf = self.buffer.lock().map_err(|_| LogError::SinkPoisoned)?;
        buf.extend_from_slice(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_writes_whole_record() {
        let sink = WriterSink::new(Vec::new());
        sink.write_record(b"first\n").unwrap();
        sink.write_record(b"second\n").unwrap();
        assert_eq!(sink.into_inner().unwrap(), b"first\nsecond\n");
    }

    #[test]
    fn test_writer_sink_surfaces_io_errors() {
        let sink = WriterSink::new(FailingWriter);
        assert!(matches!(sink.write_record(b"x\n"), Err(LogError::Io(_))));
    }

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write_record(b"a\nb\n").unwrap();

        assert_eq!(handle.lines(), ["a", "b"]);
        handle.clear();
        assert!(sink.contents().is_empty());
    }
}
