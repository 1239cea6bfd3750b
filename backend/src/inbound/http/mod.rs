//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod branches;
pub mod employees;
pub mod envelope;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register the resource routes served under `/api/v1`.
///
/// The status endpoint is registered by the server because it needs the
/// process-wide [`health::HealthState`].
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    branches::configure(cfg);
    employees::configure(cfg);
}
