use crate::context::LogContext;
use crate::error::LogError;
use crate::handler::Handler;
use crate::json::JsonRenderer;
use crate::level::Severity;
use crate::record::Record;
use crate::text::TextRenderer;

/// Terminal stage of the pipeline, chosen once from configuration.
#[derive(Clone)]
pub enum Renderer {
    Json(JsonRenderer),
    Text(TextRenderer),
}

impl Renderer {
    pub fn is_json(&self) -> bool {
        matches!(self, Renderer::Json(_))
    }
}

impl Handler for Renderer {
    fn enabled(&self, severity: Severity) -> bool {
        match self {
            Renderer::Json(r) => r.enabled(severity),
            Renderer::Text(r) => r.enabled(severity),
        }
    }

    fn handle(&self, ctx: &LogContext, record: Record) -> Result<(), LogError> {
        match self {
            Renderer::Json(r) => r.handle(ctx, record),
            Renderer::Text(r) => r.handle(ctx, record),
        }
    }
}

impl From<JsonRenderer> for Renderer {
    fn from(r: JsonRenderer) -> Self {
        Renderer::Json(r)
    }
}

impl From<TextRenderer> for Renderer {
    fn from(r: TextRenderer) -> Self {
        Renderer::Text(r)
    }
}
