pub mod attr;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod flatten;
pub mod global;
pub mod handler;
pub mod json;
pub mod layer;
pub mod level;
pub mod logger;
pub mod metadata;
pub mod noop_sink;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod text;

#[cfg(feature = "middleware")]
pub mod http;

pub mod init;

pub use attr::{Attr, Value};
pub use config::{Config, Format};
pub use context::LogContext;
pub use error::LogError;
pub use level::Severity;
pub use logger::Logger;
