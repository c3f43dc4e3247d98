//! Error taxonomy for auth handlers and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::credentials::CredentialError;
use crate::api::handlers::error_response;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::DuplicateAccount => Self::Conflict("Email already registered".into()),
            CredentialError::UnknownAccount => Self::validation("Invalid or expired token"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(err) => {
                error!("Internal error: {err:#}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        error_response(status, &message)
    }
}
