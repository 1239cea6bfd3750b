//! Health endpoints: a status report under the API prefix plus liveness and
//! readiness probes for orchestration and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Version reported by the status endpoint.
pub const SERVICE_VERSION: &str = "1.0.0";

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    started: Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            started: Instant::now(),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Body of the status endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    #[schema(example = "OK")]
    pub status: &'static str,
    /// Process uptime in seconds.
    #[schema(example = 12.5)]
    pub uptime: f64,
    /// RFC 3339 timestamp of the report.
    #[schema(example = "2026-01-05T10:00:00.000Z")]
    pub timestamp: String,
    #[schema(example = "1.0.0")]
    pub version: &'static str,
}

/// Service status, uptime and version.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tags = ["health"],
    responses((status = 200, description = "Service is up", body = HealthReport))
)]
#[get("/health")]
pub async fn status(state: web::Data<HealthState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthReport {
        status: "OK",
        uptime: state.uptime_secs(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: SERVICE_VERSION,
    })
}

/// Readiness probe. Return 200 once the store is wired and the server can
/// handle traffic; return 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}
