/// Error type returned by pipeline stages and sinks.
///
/// Rendering and writing are the only fallible steps of a logging call.
/// Missing context values never produce an error, they degrade to fixed
/// sentinel values instead.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("attribute {key:?} holds a value that cannot be encoded")]
    Unrepresentable { key: String },

    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),

    #[error("log sink lock poisoned")]
    SinkPoisoned,
}
