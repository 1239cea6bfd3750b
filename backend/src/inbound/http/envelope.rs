//! Success envelope shared by every resource handler.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// `{message, data}` body returned on success; `data` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Self {
            message,
            data: Some(data),
        }
    }

    /// Render with the given status.
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl Envelope<()> {
    pub fn message_only(message: &'static str) -> Self {
        Self {
            message,
            data: None,
        }
    }
}

/// 200 with message and data.
pub fn ok<T: Serialize>(message: &'static str, data: T) -> HttpResponse {
    Envelope::with_data(message, data).respond(StatusCode::OK)
}

/// 201 with message and data.
pub fn created<T: Serialize>(message: &'static str, data: T) -> HttpResponse {
    Envelope::with_data(message, data).respond(StatusCode::CREATED)
}
