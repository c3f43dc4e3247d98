//! Feedback endpoints.
//!
//! Flow Overview:
//! 1) Anyone can read feedback for a course and submit new feedback; the
//!    gateway identity (or `anonymous`) is recorded as the author.
//! 2) Admin token holders can list, edit and delete entries.

mod store;

pub use store::{
    FeedbackEntry, FeedbackPatch, FeedbackStore, MemoryFeedbackStore, NewFeedback, ANONYMOUS_USER,
};

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

use super::auth::{AdminPrincipal, Identity};
use super::courses::course_exists;
use super::{error_response, JsonPayload};

pub(crate) const FEEDBACK_RECEIVED: &str = "Feedback received";
const MIN_RATING: i64 = 1;
const MAX_RATING: i64 = 10;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub course_id: Option<u64>,
    pub comment: Option<String>,
    pub rating: Option<i64>,
    pub teacher: Option<String>,
    pub group: Option<String>,
    pub lang: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct FeedbackUpdateRequest {
    pub comment: Option<String>,
    pub rating: Option<i64>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct FeedbackAck {
    pub message: String,
}

#[derive(Deserialize, Debug, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminFeedbackQuery {
    /// Restrict the listing to one course.
    pub course_id: Option<u64>,
}

fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}

fn checked_rating(rating: i64) -> Option<u8> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        u8::try_from(rating).ok()
    } else {
        None
    }
}

/// Trim optional free-text fields, dropping empty ones.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/feedback",
    params(
        ("id" = u64, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Feedback for the course, empty when unknown", body = [FeedbackEntry])
    ),
    tag = "feedback"
)]
pub async fn list_course_feedback(
    Path(id): Path<u64>,
    store: Extension<Arc<dyn FeedbackStore>>,
) -> Json<Vec<FeedbackEntry>> {
    Json(store.list(id))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored", body = FeedbackAck),
        (status = 400, description = "Unknown course, blank comment or rating outside 1..=10")
    ),
    tag = "feedback"
)]
#[instrument(skip(identity, store, request))]
pub async fn submit_feedback(
    identity: Identity,
    store: Extension<Arc<dyn FeedbackStore>>,
    JsonPayload(request): JsonPayload<FeedbackRequest>,
) -> Response {
    let Some(course_id) = request.course_id.filter(|id| course_exists(*id)) else {
        return bad_request("Unknown course");
    };
    let Some(comment) = optional_text(request.comment) else {
        return bad_request("Comment is required");
    };
    let Some(rating) = request.rating.and_then(checked_rating) else {
        return bad_request("Rating must be between 1 and 10");
    };

    let user = identity.email().unwrap_or(ANONYMOUS_USER).to_string();
    let entry = store.add(
        course_id,
        NewFeedback {
            user,
            comment,
            rating,
            teacher: optional_text(request.teacher),
            group: optional_text(request.group),
            lang: optional_text(request.lang),
        },
    );
    info!(course_id, feedback_id = entry.id, "Feedback received");

    (
        StatusCode::OK,
        Json(FeedbackAck {
            message: FEEDBACK_RECEIVED.to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/admin/feedbacks",
    params(AdminFeedbackQuery),
    responses(
        (status = 200, description = "Feedback entries", body = [FeedbackEntry]),
        (status = 401, description = "Missing or invalid admin token")
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[instrument(skip(_admin, store))]
pub async fn admin_list_feedback(
    _admin: AdminPrincipal,
    Query(query): Query<AdminFeedbackQuery>,
    store: Extension<Arc<dyn FeedbackStore>>,
) -> Json<Vec<FeedbackEntry>> {
    let entries = match query.course_id {
        Some(course_id) => store.list(course_id),
        None => store.list_all(),
    };
    Json(entries)
}

#[utoipa::path(
    patch,
    path = "/api/admin/courses/{courseId}/feedback/{id}",
    params(
        ("courseId" = u64, Path, description = "Course id"),
        ("id" = u64, Path, description = "Feedback id")
    ),
    request_body = FeedbackUpdateRequest,
    responses(
        (status = 200, description = "Updated entry", body = FeedbackEntry),
        (status = 400, description = "Blank comment or rating outside 1..=10"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Unknown feedback entry")
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[instrument(skip(_admin, store, request))]
pub async fn admin_update_feedback(
    _admin: AdminPrincipal,
    Path((course_id, id)): Path<(u64, u64)>,
    store: Extension<Arc<dyn FeedbackStore>>,
    JsonPayload(request): JsonPayload<FeedbackUpdateRequest>,
) -> Response {
    let comment = match request.comment {
        Some(comment) => match optional_text(Some(comment)) {
            Some(comment) => Some(comment),
            None => return bad_request("Comment must not be blank"),
        },
        None => None,
    };
    let rating = match request.rating {
        Some(rating) => match checked_rating(rating) {
            Some(rating) => Some(rating),
            None => return bad_request("Rating must be between 1 and 10"),
        },
        None => None,
    };

    match store.update(course_id, id, FeedbackPatch { comment, rating }) {
        Some(entry) => {
            info!(course_id, feedback_id = id, "Feedback updated by admin");
            (StatusCode::OK, Json(entry)).into_response()
        }
        None => {
            debug!(course_id, feedback_id = id, "Feedback not found for update");
            error_response(StatusCode::NOT_FOUND, "Feedback not found")
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/courses/{courseId}/feedback/{id}",
    params(
        ("courseId" = u64, Path, description = "Course id"),
        ("id" = u64, Path, description = "Feedback id")
    ),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Unknown feedback entry")
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[instrument(skip(_admin, store))]
pub async fn admin_delete_feedback(
    _admin: AdminPrincipal,
    Path((course_id, id)): Path<(u64, u64)>,
    store: Extension<Arc<dyn FeedbackStore>>,
) -> Response {
    if store.remove(course_id, id) {
        info!(course_id, feedback_id = id, "Feedback deleted by admin");
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, "Feedback not found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert_eq!(checked_rating(0), None);
        assert_eq!(checked_rating(1), Some(1));
        assert_eq!(checked_rating(10), Some(10));
        assert_eq!(checked_rating(11), None);
        assert_eq!(checked_rating(-3), None);
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(optional_text(Some("  M-101 ".to_string())).as_deref(), Some("M-101"));
        assert_eq!(optional_text(Some("   ".to_string())), None);
        assert_eq!(optional_text(None), None);
    }
}
