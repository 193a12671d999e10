//! Custom Axum extractors for request authentication.
//!
//! The Admin API authenticates with the `Olad-Admin-Authorization` header
//! carrying the plaintext admin secret, verified against the argon2 hash
//! held in the runtime config.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use olad_sdk::objects::Envelope;

use crate::state::AppState;

/// Header carrying the plaintext admin secret.
pub const ADMIN_AUTH_HEADER: &str = "Olad-Admin-Authorization";

/// An Axum extractor that verifies the admin secret header.
pub struct AdminAuth;

/// Errors returned by the [`AdminAuth`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("missing Olad-Admin-Authorization header")]
    MissingHeader,
    #[error("invalid Olad-Admin-Authorization header")]
    InvalidHeader,
    #[error("admin secret verification failed")]
    VerificationFailed,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AdminAuthError::MissingHeader => "missing Olad-Admin-Authorization header",
            AdminAuthError::InvalidHeader => "invalid Olad-Admin-Authorization header",
            AdminAuthError::VerificationFailed => "admin secret verification failed",
        };
        (StatusCode::UNAUTHORIZED, Json(Envelope::fail(message))).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        use argon2::{Argon2, PasswordHash, PasswordVerifier};

        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidHeader)?
            .to_owned();

        let admin = state.config.admin.read().await;
        let parsed = PasswordHash::new(admin.secret_hash())
            .map_err(|_| AdminAuthError::VerificationFailed)?;
        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .map_err(|_| AdminAuthError::VerificationFailed)?;
        drop(admin);

        Ok(AdminAuth)
    }
}
