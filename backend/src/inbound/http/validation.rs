//! Request validation stage for inbound HTTP adapters.
//!
//! [`Validated`] is an extractor that evaluates a payload type's rule set
//! before the handler runs. The rules see the JSON body merged with the path
//! parameters and then the query parameters (later sources win). The value
//! handed to the handler is decoded from the body alone, so the body must
//! also satisfy the rules on its own.
//!
//! A rejected request is answered directly with status 400 and
//! `{"error": "<message>"}`; it never reaches the service layer.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::Document;
use crate::domain::ValidationError;
use crate::domain::validation::{Validate, validate};

/// Body returned when a request fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationRejectionBody {
    #[schema(example = "Validation error: Branch name is required")]
    pub error: String,
}

/// Validation failure answered before the handler runs.
#[derive(Debug)]
pub struct ValidationRejection(ValidationError);

impl fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ValidationRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ValidationRejectionBody {
            error: self.0.to_string(),
        })
    }
}

/// Payload that passed its rule set.
///
/// # Examples
/// ```no_run
/// use actix_web::{HttpResponse, post};
/// use workforce::domain::NewBranch;
/// use workforce::inbound::http::validation::Validated;
///
/// #[post("/branches")]
/// async fn create(payload: Validated<NewBranch>) -> HttpResponse {
///     let draft = payload.into_inner();
///     HttpResponse::Created().body(draft.name)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Unwrap the validated payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Validated<T>
where
    T: Validate + DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let body = web::Bytes::from_request(&req, payload);
        Box::pin(async move {
            let bytes = body.await?;
            match extract::<T>(&req, &bytes) {
                Ok(value) => Ok(Validated(value)),
                Err(err) => {
                    debug!(path = req.path(), error = %err, "request rejected by validation");
                    Err(ValidationRejection(err).into())
                }
            }
        })
    }
}

fn extract<T>(req: &HttpRequest, bytes: &[u8]) -> Result<T, ValidationError>
where
    T: Validate + DeserializeOwned,
{
    let body = parse_body(bytes)?;
    let merged = merge_request_fields(req, body.clone())?;
    validate(T::rules(), &merged)?;
    validate(T::rules(), &body)?;
    serde_json::from_value(Value::Object(body))
        .map_err(|err| ValidationError::single(format!("invalid request body: {err}")))
}

fn parse_body(bytes: &[u8]) -> Result<Document, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) | Err(_) => Err(ValidationError::single(
            "request body must be a JSON object",
        )),
    }
}

fn merge_request_fields(req: &HttpRequest, mut fields: Document) -> Result<Document, ValidationError> {
    for (name, value) in req.match_info().iter() {
        fields.insert(name.to_owned(), Value::String(value.to_owned()));
    }
    let query = web::Query::<BTreeMap<String, String>>::from_query(req.query_string())
        .map_err(|err| ValidationError::single(format!("invalid query string: {err}")))?;
    for (name, value) in query.into_inner() {
        fields.insert(name, Value::String(value));
    }
    Ok(fields)
}
