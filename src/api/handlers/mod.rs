//! API handlers for the course feedback service.
//!
//! Routes are grouped by concern: `auth` (accounts, sessions, admin login and
//! the request gateway), `me`, `courses`, `feedback`, and `health`.

pub mod auth;
pub mod courses;
pub mod feedback;
pub mod health;
pub mod me;

use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

pub(crate) const INVALID_JSON_BODY: &str = "Invalid JSON body";

/// JSON error body shared by every handler: `{"error": "<message>"}`.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// JSON request body that falls back to `T::default()` when no content type
/// is sent. Any body that fails to parse is a 400 with a JSON error.
#[derive(Debug)]
pub struct JsonPayload<T>(pub T);

impl<S, T> FromRequest<S> for JsonPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !request.headers().contains_key(CONTENT_TYPE) {
            return Ok(Self(T::default()));
        }
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected request body: {rejection}");
                Err(error_response(StatusCode::BAD_REQUEST, INVALID_JSON_BODY))
            }
        }
    }
}
