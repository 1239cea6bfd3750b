//! Request correlation for the HTTP surface.
//!
//! [`Trace`] gives every request a fresh [`TraceId`], serves it inside a
//! `request` span, echoes the id in the `trace-id` response header and logs
//! one completion line with the status and latency. The id lives in a tokio
//! task-local, so it is visible to handlers and to the error renderer but not
//! to spawned tasks unless they re-enter [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue, InvalidHeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Identifier correlating the log lines and response of one request.
///
/// # Examples
/// ```
/// use uuid::Uuid;
/// use workforce::middleware::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id = TraceId::from(Uuid::nil());
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request being served, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` as the current identifier.
    pub async fn scope<Fut: Future>(id: TraceId, fut: Fut) -> Fut::Output {
        CURRENT.scope(id, fut).await
    }

    /// Header form of the identifier.
    pub fn header_value(self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut buf = Uuid::encode_buffer();
        HeaderValue::from_str(self.0.hyphenated().encode_lower(&mut buf))
    }
}

impl From<Uuid> for TraceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Middleware assigning a [`TraceId`] to each request.
///
/// ```
/// use actix_web::App;
/// use workforce::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = TraceId::fresh();
        let span = info_span!("request", trace_id = %id, method = %req.method(), path = %req.path());
        let started = Instant::now();
        let inner = TraceId::scope(id, self.service.call(req));
        Box::pin(
            async move {
                let mut res = inner.await?;
                match id.header_value() {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => warn!(%error, "trace id not encodable as a header"),
                }
                info!(
                    status = res.status().as_u16(),
                    duration_ms = started.elapsed().as_millis(),
                    "request completed"
                );
                Ok(res)
            }
            .instrument(span),
        )
    }
}
