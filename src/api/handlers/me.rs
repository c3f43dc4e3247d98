//! Authenticated self-service endpoint.

use axum::Json;
use tracing::instrument;

use super::auth::types::{MeResponse, UserView};
use super::auth::Principal;

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Return the authenticated user.", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token."),
    ),
    security(("bearer" = [])),
    tag = "me"
)]
#[instrument(skip(principal))]
pub async fn get_me(principal: Principal) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserView {
            email: principal.email,
        },
    })
}
