//! Account registration.
//!
//! Flow Overview:
//! 1) Require email and password, normalize the email.
//! 2) Check the format and the domain allow-list.
//! 3) Store the password digest; duplicates are a conflict.
//! 4) Start a session so the client is signed in right away.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::error::AuthError;
use crate::api::handlers::JsonPayload;
use super::state::AuthState;
use super::types::{AuthResponse, CredentialsRequest, UserView};
use super::utils::{email_domain_allowed, non_empty, normalize_email, valid_email};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created and session started", body = AuthResponse),
        (status = 400, description = "Missing fields, malformed email or domain not allowed"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
#[instrument(skip(auth_state, request))]
pub async fn register(
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
    if !valid_email(&email) {
        return Err(AuthError::validation("Invalid email"));
    }
    if !email_domain_allowed(&email, auth_state.config().allowed_email_domains()) {
        warn!("Registration rejected for disallowed domain");
        return Err(AuthError::validation("Email domain is not allowed"));
    }

    let password_hash = auth_state.hasher().hash(password);
    let account = auth_state.accounts().register(&email, password_hash)?;
    let token = auth_state.start_session(&account.email)?;

    info!("Registered new account");

    Ok(Json(AuthResponse {
        token,
        user: UserView {
            email: account.email,
        },
    }))
}
