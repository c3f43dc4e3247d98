//! Request-level auth gateway.
//!
//! Flow Overview: [`authenticate`] runs on every request, reads the bearer
//! token, and resolves it through the signed token codec, falling back to the
//! session registry. A resolved email is attached as an [`Identity`]; an
//! unresolved request simply carries none. Handlers decide what they need via
//! the [`Principal`] and [`AdminPrincipal`] extractors.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

use super::error::AuthError;
use super::state::AuthState;
use super::token::TokenError;
use super::utils::extract_bearer_token;

/// Identity attached by the gateway; `None` for unauthenticated requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity(pub Option<String>);

impl Identity {
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Authenticated user; rejects with 401 when the gateway attached no identity.
#[derive(Clone, Debug)]
pub struct Principal {
    pub email: String,
}

/// Holder of a valid admin token.
#[derive(Clone, Debug)]
pub struct AdminPrincipal;

/// Resolve a bearer token to an email: signature first, then the session registry.
///
/// Expired tokens do not fall back to the registry.
pub fn resolve_identity(state: &AuthState, headers: &HeaderMap) -> Option<String> {
    let token = extract_bearer_token(headers)?;
    match state.codec().decode(&token) {
        Ok(claims) => Some(claims.email),
        Err(TokenError::Expired) => {
            debug!("Session token expired");
            None
        }
        Err(err) => {
            debug!("Token not self-verifying ({err}), checking session registry");
            state.sessions().resolve(&token)
        }
    }
}

/// Gateway middleware; needs `Extension<Arc<AuthState>>` layered outside it.
pub async fn authenticate(mut request: Request, next: Next) -> Response {
    let identity = request
        .extensions()
        .get::<Arc<AuthState>>()
        .and_then(|state| resolve_identity(state, request.headers()));
    request.extensions_mut().insert(Identity(identity));
    next.run(request).await
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .and_then(|identity| identity.0.clone())
            .map(|email| Self { email })
            .ok_or(AuthError::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<Arc<AuthState>>()
            .ok_or_else(|| AuthError::Internal(anyhow!("auth state extension missing")))?;
        let token = extract_bearer_token(&parts.headers).ok_or(AuthError::Unauthorized)?;
        if state.admin_tokens().is_valid(&token) {
            Ok(Self)
        } else {
            debug!("Rejected non-admin token on admin route");
            Err(AuthError::Unauthorized)
        }
    }
}
