//! Password login.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::error::AuthError;
use crate::api::handlers::JsonPayload;
use super::state::AuthState;
use super::types::{AuthResponse, CredentialsRequest, UserView};
use super::utils::{non_empty, normalize_email};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session started", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, request))]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    JsonPayload(request): JsonPayload<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let (Some(email), Some(password)) = (
        non_empty(request.email.as_deref()),
        non_empty(request.password.as_deref()),
    ) else {
        return Err(AuthError::validation("Email and password are required"));
    };

    let email = normalize_email(email);
    // Unknown account and wrong password are indistinguishable to the caller.
    let Some(account) = auth_state.accounts().find(&email) else {
        debug!("Login for unknown account");
        return Err(AuthError::Unauthorized);
    };
    if !auth_state.hasher().verify(password, &account.password_hash) {
        warn!("Login rejected: password mismatch");
        return Err(AuthError::Unauthorized);
    }

    let token = auth_state.start_session(&account.email)?;
    Ok(Json(AuthResponse {
        token,
        user: UserView {
            email: account.email,
        },
    }))
}
