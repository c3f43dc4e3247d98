//! Forgot/reset password endpoints.
//!
//! Flow Overview:
//! 1) `forgot-password` mints a single-use reset token when the account exists
//!    and always answers with the same message.
//! 2) `reset-password` consumes the token and stores the new digest.
//!
//! Reset tokens are echoed in the forgot-password response unless
//! `expose_reset_token` is off; there is no mail delivery.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::error::AuthError;
use crate::api::handlers::JsonPayload;
use super::state::AuthState;
use super::types::{
    ForgotPasswordRequest, ForgotPasswordResponse, MessageResponse, ResetPasswordRequest,
};
use super::utils::{non_empty, normalize_email};

pub(crate) const FORGOT_PASSWORD_MESSAGE: &str = "If the email exists, a reset token was generated";
pub(crate) const RESET_PASSWORD_MESSAGE: &str = "Password updated";
const INVALID_RESET_TOKEN: &str = "Invalid or expired token";

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = ForgotPasswordResponse),
        (status = 400, description = "Missing email")
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, request))]
pub async fn forgot_password(
    auth_state: Extension<Arc<AuthState>>,
    JsonPayload(request): JsonPayload<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AuthError> {
    let Some(email) = non_empty(request.email.as_deref()) else {
        return Err(AuthError::validation("Email is required"));
    };
    let email = normalize_email(email);

    let token = if auth_state.accounts().find(&email).is_some() {
        let token = auth_state.reset_tokens().create(&email)?;
        debug!("Reset token issued");
        auth_state.config().expose_reset_token().then_some(token)
    } else {
        debug!("Reset requested for unknown account");
        None
    };

    Ok(Json(ForgotPasswordResponse {
        message: FORGOT_PASSWORD_MESSAGE.to_string(),
        token,
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid token")
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, request))]
pub async fn reset_password(
    auth_state: Extension<Arc<AuthState>>,
    JsonPayload(request): JsonPayload<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let (Some(token), Some(new_password)) = (
        non_empty(request.token.as_deref()),
        non_empty(request.new_password.as_deref()),
    ) else {
        return Err(AuthError::validation("Token and new password are required"));
    };

    let Some(email) = auth_state
        .reset_tokens()
        .consume(token.trim(), auth_state.accounts())
    else {
        return Err(AuthError::validation(INVALID_RESET_TOKEN));
    };

    let password_hash = auth_state.hasher().hash(new_password);
    auth_state
        .accounts()
        .update_password_hash(&email, password_hash)?;

    info!("Password reset completed");
    Ok(Json(MessageResponse {
        message: RESET_PASSWORD_MESSAGE.to_string(),
    }))
}
