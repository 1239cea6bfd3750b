//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn every failure into the same `{message, code}` JSON body.
//! This is the single place where errors reaching the client are logged.

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderValue;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

pub use crate::domain::ApiResult;
use crate::domain::Error;
use crate::middleware::{TRACE_ID_HEADER, TraceId};

/// Message returned for failures outside the error taxonomy.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";
/// Logged in place of a message when a failure carried none.
pub const MISSING_ERROR_SENTINEL: &str = "null or undefined error received";

/// JSON body returned for every handled error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message.
    #[schema(example = "Document not found in branches with id b1")]
    pub message: String,
    /// Machine-readable code.
    #[schema(example = "DOC_NOT_FOUND")]
    pub code: String,
}

impl ErrorBody {
    fn from_error(error: &Error) -> Self {
        match error {
            Error::Unexpected(_) => Self {
                message: UNEXPECTED_MESSAGE.to_owned(),
                code: error.code().to_owned(),
            },
            other => Self {
                message: other.to_string(),
                code: other.code().to_owned(),
            },
        }
    }
}

fn status_for(error: &Error) -> StatusCode {
    StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_failure(error: &Error, status: StatusCode) {
    let detail = match error {
        Error::Unexpected(None) => MISSING_ERROR_SENTINEL.to_owned(),
        other => other.to_string(),
    };
    error!(
        code = error.code(),
        status = status.as_u16(),
        "Error: {detail}"
    );
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        log_failure(self, status);

        let mut builder = HttpResponse::build(status);
        if let Some(id) = TraceId::current() {
            if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
                builder.insert_header((TRACE_ID_HEADER, value));
            }
        }
        builder.json(ErrorBody::from_error(self))
    }
}
