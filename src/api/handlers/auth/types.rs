//! Request/response types for auth endpoints.
//!
//! Request fields are optional so a missing field surfaces as a 400 from the
//! handler instead of a JSON rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub user: UserView,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Present only when reset tokens are echoed back (no mail delivery).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct AdminLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminLoginResponse {
    pub token: String,
}
