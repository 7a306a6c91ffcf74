use crate::attr::Attr;
use crate::config::{Config, Defaults, Format, ResolvedConfig};
use crate::context::LogContext;
use crate::error::LogError;
use crate::handler::Handler;
use crate::json::JsonRenderer;
use crate::level::Severity;
use crate::metadata::MetadataHandler;
use crate::pipeline::Renderer;
use crate::record::{CallSite, Record};
use crate::text::TextRenderer;
use std::sync::Arc;

/// Entry point applications log through.
///
/// A `Logger` is the composed pipeline: a [`MetadataHandler`] in front of
/// the renderer selected by configuration. It is immutable after
/// construction and cheap to clone, so one instance can be shared by any
/// number of threads.
///
/// Every logging method is `#[track_caller]`; the reported caller is the
/// line that invoked it. Code that wraps these methods should be
/// `#[track_caller]` as well so records keep pointing at the application
/// call rather than at the wrapper.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<MetadataHandler>,
}

impl Logger {
    /// Logger using process defaults for every setting.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Logger for `config`, unset fields taken from [`Defaults::global`].
    pub fn with_config(config: Config) -> Self {
        Self::from_resolved(config.resolve(Defaults::global()))
    }

    pub fn from_resolved(config: ResolvedConfig) -> Self {
        let renderer: Renderer = match config.format {
            Format::Json => JsonRenderer::new(config.output).into(),
            Format::Text => TextRenderer::new(config.output, config.multiline).into(),
        };

        let mut handler = MetadataHandler::new(renderer, config.level);
        if let Some(environment) = config.environment {
            handler = handler.with_environment(environment);
        }
        Self::from_handler(handler)
    }

    pub fn from_handler(handler: MetadataHandler) -> Self {
        Logger {
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &MetadataHandler {
        &self.handler
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        self.handler.enabled(severity)
    }

    /// Route an already built record through the pipeline.
    ///
    /// Records below the configured level are dropped without touching
    /// the context or the sink.
    pub fn handle(&self, ctx: &LogContext, record: Record) -> Result<(), LogError> {
        if !self.enabled(record.severity) {
            return Ok(());
        }
        self.handler.handle(ctx, record)
    }

    /// Log at `severity` and report whether the record was written.
    #[track_caller]
    pub fn log(
        &self,
        ctx: &LogContext,
        severity: Severity,
        msg: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), LogError> {
        if !self.enabled(severity) {
            return Ok(());
        }

        let mut record = Record::new(severity, msg, Some(CallSite::caller()));
        record.add_attrs(attrs);
        self.handler.handle(ctx, record)
    }

    #[track_caller]
    fn emit(&self, ctx: &LogContext, severity: Severity, msg: &str, attrs: Vec<Attr>) {
        if let Err(e) = self.log(ctx, severity, msg, attrs) {
            eprintln!("failed to write log record: {}", e);
        }
    }

    /// Logs at level TRACE
    #[track_caller]
    pub fn trace(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(&LogContext::new(), Severity::TRACE, msg, attrs);
    }

    /// Logs at level DEBUG
    #[track_caller]
    pub fn debug(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(&LogContext::new(), Severity::DEBUG, msg, attrs);
    }

    /// Logs at level INFO
    #[track_caller]
    pub fn info(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(&LogContext::new(), Severity::INFO, msg, attrs);
    }

    /// Logs at level WARN
    #[track_caller]
    pub fn warn(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(&LogContext::new(), Severity::WARN, msg, attrs);
    }

    /// Logs at level ERROR
    #[track_caller]
    pub fn error(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(&LogContext::new(), Severity::ERROR, msg, attrs);
    }

    /// Logs at level FATAL, then panics with `msg`.
    #[track_caller]
    pub fn fatal(&self, msg: &str, attrs: Vec<Attr>) -> ! {
        self.fatal_ctx(&LogContext::new(), msg, attrs)
    }

    /// Logs at level TRACE with given context
    #[track_caller]
    pub fn trace_ctx(&self, ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
        self.emit(ctx, Severity::TRACE, msg, attrs);
    }

    /// Logs at level DEBUG with given context
    #[track_caller]
    pub fn debug_ctx(&self, ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
        self.emit(ctx, Severity::DEBUG, msg, attrs);
    }

    /// Logs at level INFO with given context
    #[track_caller]
    pub fn info_ctx(&self, ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
        self.emit(ctx, Severity::INFO, msg, attrs);
    }

    /// Logs at level WARN with given context
    #[track_caller]
    pub fn warn_ctx(&self, ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
        self.emit(ctx, Severity::WARN, msg, attrs);
    }

    /// Logs at level ERROR with given context
    #[track_caller]
    pub fn error_ctx(&self, ctx: &LogContext, msg: &str, attrs: Vec<Attr>) {
        self.emit(ctx, Severity::ERROR, msg, attrs);
    }

    /// Logs at level FATAL with given context, then panics with `msg`.
    #[track_caller]
    pub fn fatal_ctx(&self, ctx: &LogContext, msg: &str, attrs: Vec<Attr>) -> ! {
        self.emit(ctx, Severity::FATAL, msg, attrs);
        panic!("{}", msg)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
