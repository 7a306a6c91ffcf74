//! Process-wide convenience logger.
//!
//! Small programs can call the free functions here instead of passing a
//! [`Logger`] around. The default logger is built from environment
//! defaults on first use unless [`set_default_logger`] installed one
//! before that.

use crate::attr::Attr;
use crate::context::LogContext;
use crate::logger::Logger;
use serde::Serialize;
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(Logger::new)
}

/// Install `logger` as the process default.
///
/// Fails, handing the logger back, once a default exists (either set
/// earlier or created lazily by a logging call).
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// Logs with default logger at level TRACE
#[track_caller]
pub fn trace(msg: &str, attrs: Vec<Attr>) {
    default_logger().trace(msg, attrs);
}

/// Logs with default logger at level DEBUG
#[track_caller]
pub fn debug(msg: &str, attrs: Vec<Attr>) {
    default_logger().debug(msg, attrs);
}

/// Logs with default logger at level INFO
#[track_caller]
pub fn info(msg: &str, attrs: Vec<Attr>) {
    default_logger().info(msg, attrs);
}

/// Logs with default logger at level WARN
#[track_caller]
pub fn warn(msg: &str, attrs: Vec<Attr>) {
    default_logger().warn(msg, attrs);
}

/// Logs with default logger at level ERROR
#[track_caller]
pub fn error(msg: &str, attrs: Vec<Attr>) {
    default_logger().error(msg, attrs);
}

/// Logs with default logger at level FATAL, then panics
#[track_caller]
pub fn fatal(msg: &str, attrs: Vec<Attr>) -> ! {
    default_logger().fatal(msg, attrs)
}

/// Logs with default logger at level TRACE with given context
#[track_caller]
pub fn trace_ctx(ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
    default_logger().trace_ctx(ctx, msg, attrs);
}

/// Logs with default logger at level DEBUG with given context
#[track_caller]
pub fn debug_ctx(ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
    default_logger().debug_ctx(ctx, msg, attrs);
}

/// Logs with default logger at level INFO with given context
#[track_caller]
pub fn info_ctx(ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
    default_logger().info_ctx(ctx, msg, attrs);
}

/// Logs with default logger at level WARN with given context
#[track_caller]
pub fn warn_ctx(ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
    default_logger().warn_ctx(ctx, msg, attrs);
}

/// Logs with default logger at level ERROR with given context
#[track_caller]
pub fn error_ctx(ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
    default_logger().error_ctx(ctx, msg, attrs);
}

/// Logs with default logger at level FATAL with given context, then panics
#[track_caller]
pub fn fatal_ctx(ctx: &LogContext, msg: &str, attrs: Vec<Attr>) -> ! {
    default_logger().fatal_ctx(ctx, msg, attrs)
}

/// Pretty-print `value` as indented JSON on stdout.
///
/// A value that cannot be serialized is reported through the default
/// logger at level ERROR instead.
#[track_caller]
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => error("------ print_json -----", vec![Attr::err(&e)]),
    }
}
