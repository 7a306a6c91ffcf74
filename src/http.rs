//! Request logging middleware for `tower` services.
//!
//! [`RequestLogLayer`] derives a correlation id for every inbound request,
//! makes it available to downstream handlers as a [`LogContext`] request
//! extension and, once the inner service has answered, logs one INFO record
//! describing the request:
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/hello", get(hello))
//!     .layer(RequestLogLayer::new(logger.clone()));
//!
//! async fn hello(Extension(ctx): Extension<LogContext>) -> &'static str {
//!     logger.info_ctx(&ctx, "saying hello", vec![]);
//!     "hello"
//! }
//! ```
//!
//! Add it as the outermost layer so the logged duration covers every
//! other middleware.

use crate::attr::Attr;
use crate::context::LogContext;
use crate::logger::Logger;
use http::{Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use uuid::Uuid;

/// Inbound header carrying the caller's correlation id.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

#[derive(Clone)]
pub struct RequestLogLayer {
    logger: Logger,
}

impl RequestLogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog {
            inner,
            logger: self.logger.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RequestLog<S> {
    inner: S,
    logger: Logger,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = RequestLogFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let ctx = LogContext::new().with_correlation_id(correlation_id(&req));
        req.extensions_mut().insert(ctx.clone());

        let summary = RequestSummary {
            logger: self.logger.clone(),
            ctx,
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            remote: remote_addr(&req),
            agent: header_str(&req, http::header::USER_AGENT.as_str())
                .unwrap_or_default()
                .to_string(),
            started: Instant::now(),
        };

        RequestLogFuture {
            inner: Box::pin(self.inner.call(req)),
            summary: Some(summary),
        }
    }
}

/// Response future of [`RequestLog`]; logs the request once the inner
/// service completes.
pub struct RequestLogFuture<F> {
    inner: Pin<Box<F>>,
    summary: Option<RequestSummary>,
}

impl<F, ResBody, E> Future for RequestLogFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let output = ready!(this.inner.as_mut().poll(cx));
        if let Some(summary) = this.summary.take() {
            summary.log();
        }
        Poll::Ready(output)
    }
}

struct RequestSummary {
    logger: Logger,
    ctx: LogContext,
    method: String,
    path: String,
    remote: String,
    agent: String,
    started: Instant,
}

impl RequestSummary {
    fn log(self) {
        self.logger.info_ctx(
            &self.ctx,
            &self.method,
            vec![
                Attr::string("path", self.path),
                Attr::duration("duration", self.started.elapsed()),
                Attr::string("remote", self.remote),
                Attr::string("agent", self.agent),
            ],
        );
    }
}

fn header_str<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Inbound correlation id, or `unknown-<uuid>` when the header is absent.
fn correlation_id<B>(req: &Request<B>) -> String {
    match header_str(req, CORRELATION_ID_HEADER) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("unknown-{}", Uuid::new_v4()),
    }
}

/// First `X-Forwarded-For` entry, else the peer address stored in the
/// request extensions, else empty.
fn remote_addr<B>(req: &Request<B>) -> String {
    let forwarded = header_str(req, FORWARDED_FOR_HEADER)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match forwarded {
        Some(addr) => addr.to_string(),
        None => req
            .extensions()
            .get::<SocketAddr>()
            .map(|addr| addr.to_string())
            .unwrap_or_default(),
    }
}
