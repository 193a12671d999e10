//! The shared handler error type.
//!
//! Every failure leaves the server as `{"success": false, "message": ...}`.
//! Database errors are logged and answered with a generic message; the
//! underlying error text never reaches the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use olad_core::query::FilterError;
use olad_sdk::objects::Envelope;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request input. 400.
    Validation(String),
    /// The addressed row does not exist. 404.
    NotFound(&'static str),
    /// A uniqueness rule would be broken. 400, matching the upstream
    /// dashboard contract rather than 409.
    Conflict(String),
    /// A delete guard fired: dependent rows exist. 400.
    Dependency(String),
    /// Anything that went wrong below the SQL line. 500.
    Database(sqlx::Error),
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return ApiError::Conflict("a row with that value already exists".to_string());
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Conflict(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Dependency(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Admin API database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(Envelope::fail(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_contract() {
        assert_eq!(
            ApiError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("User").into_response().status(),
            StatusCode::NOT_FOUND
        );
        // Uniqueness conflicts answer 400, not 409.
        assert_eq!(
            ApiError::Conflict("dup".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolClosed)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
