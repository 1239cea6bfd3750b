//! Translation of pool and Diesel failures into [`StoreError`] codes.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map a pool failure: timeouts exceed the deadline, anything else means
/// the database is unreachable.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Timeout => StoreError::deadline_exceeded(error.to_string()),
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::unavailable(message)
        }
    }
}

/// Map a Diesel failure onto the closest canonical store code.
pub(crate) fn map_diesel_error(error: DieselError) -> StoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::not_found("record not found"),
        DieselError::QueryBuilderError(err) => {
            StoreError::invalid_argument(format!("database query error: {err}"))
        }
        DieselError::DatabaseError(kind, info) => {
            let message = info.message().to_owned();
            match kind {
                DatabaseErrorKind::UniqueViolation => StoreError::already_exists(message),
                DatabaseErrorKind::SerializationFailure => StoreError::aborted(message),
                DatabaseErrorKind::ClosedConnection => StoreError::unavailable(message),
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                    StoreError::failed_precondition(message)
                }
                DatabaseErrorKind::ReadOnlyTransaction => StoreError::permission_denied(message),
                _ => StoreError::internal(message),
            }
        }
        DieselError::SerializationError(err) | DieselError::DeserializationError(err) => {
            StoreError::internal(format!("document encoding failed: {err}"))
        }
        other => StoreError::unknown(other.to_string()),
    }
}
