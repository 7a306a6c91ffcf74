//! Request-scoped logging context.
//!
//! A [`LogContext`] is created once per request or call chain (the HTTP
//! middleware does this for inbound requests) and handed by reference to
//! every logging call made on behalf of that request. Deriving a modified
//! context always produces a new value; the original is never mutated.

use crate::record::CallSite;
use std::sync::Arc;

/// Attribute key of the injected correlation id.
pub const CORRELATION_ID_KEY: &str = "correlation_id";

/// Attribute key of the injected call site (structured output only).
pub const CALLER_KEY: &str = "caller";

/// Correlation id used when the context does not carry one.
pub const UNKNOWN_CORRELATION_ID: &str = "unknown";

/// Typed request scope handed by reference to every logging call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    correlation_id: Option<Arc<str>>,
    call_site: Option<CallSite>,
    caller: Option<Arc<str>>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context carrying `id` as its correlation id.
    pub fn with_correlation_id(&self, id: impl Into<Arc<str>>) -> Self {
        LogContext {
            correlation_id: Some(id.into()),
            ..self.clone()
        }
    }

    /// Derive a context with a pre-resolved call site.
    ///
    /// The metadata stage uses it instead of the record's own call site,
    /// which lets an outer layer attribute records to its caller.
    pub fn with_call_site(&self, call_site: CallSite) -> Self {
        LogContext {
            call_site: Some(call_site),
            ..self.clone()
        }
    }

    pub(crate) fn with_caller(&self, caller: impl Into<Arc<str>>) -> Self {
        LogContext {
            caller: Some(caller.into()),
            ..self.clone()
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn call_site(&self) -> Option<CallSite> {
        self.call_site
    }

    /// Caller resolved by the metadata stage, if this context was derived
    /// by it.
    pub fn caller(&self) -> Option<&str> {
        self.caller.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_leaves_original_untouched() {
        let base = LogContext::new();
        let derived = base.with_correlation_id("req-1");

        assert_eq!(base.correlation_id(), None);
        assert_eq!(derived.correlation_id(), Some("req-1"));
    }

    #[test]
    fn test_derive_keeps_other_fields() {
        let site = CallSite::new("src/main.rs", 10);
        let ctx = LogContext::new()
            .with_correlation_id("req-2")
            .with_call_site(site)
            .with_caller("src/main.rs:10");

        assert_eq!(ctx.correlation_id(), Some("req-2"));
        assert_eq!(ctx.call_site(), Some(site));
        assert_eq!(ctx.caller(), Some("src/main.rs:10"));
    }
}
