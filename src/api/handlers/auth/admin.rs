//! Admin login.
//!
//! Admin tokens are opaque and live in their own registry; they never carry a
//! user identity and user session tokens never grant admin access.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::error::AuthError;
use crate::api::handlers::JsonPayload;
use super::state::AuthState;
use super::types::{AdminLoginRequest, AdminLoginResponse};
use super::utils::constant_time_str_eq;

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Admin token issued", body = AdminLoginResponse),
        (status = 401, description = "Credentials mismatch or admin login disabled")
    ),
    tag = "admin"
)]
#[instrument(skip(auth_state, request))]
pub async fn admin_login(
    auth_state: Extension<Arc<AuthState>>,
    JsonPayload(request): JsonPayload<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AuthError> {
    let config = auth_state.config();

    let Some(expected_password) = config.admin_password() else {
        warn!("Admin login attempted but no admin password is configured");
        return Err(AuthError::Unauthorized);
    };

    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    // Both comparisons always run.
    let username_ok = constant_time_str_eq(&username, config.admin_username());
    let password_ok = constant_time_str_eq(&password, expected_password);
    if !(username_ok & password_ok) {
        warn!("Admin login rejected");
        return Err(AuthError::Unauthorized);
    }

    let token = auth_state.admin_tokens().issue()?;
    info!("Admin token issued");
    Ok(Json(AdminLoginResponse { token }))
}
