/// Create task endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Content-Type: application/json
///
/// {
///   "title": "Buy milk",
///   "description": "2% if they have it",
///   "completed": false,
///   "inviteeEmail": "bob@example.com"
/// }
/// ```
///
/// Only `title` is required. An `inviteeEmail` that does not resolve to
/// another user is silently dropped: the task is still created, without
/// an invitee. No notification fires from this path; invitation events
/// come only from the explicit invite endpoint.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty title
/// - `401 Unauthorized`: Missing or invalid token

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use taskpair_shared::{
    auth::middleware::AuthContext,
    models::task::TaskWithInvitee,
    tasks::CreateTaskInput,
};

use crate::{app::AppState, error::ApiResult};

/// Create task request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub invitee_email: Option<String>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskWithInvitee>)> {
    let task = state
        .tasks()
        .create_task(
            auth.user_id,
            CreateTaskInput {
                title: req.title,
                description: req.description,
                completed: req.completed,
                invitee_email: req.invitee_email,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}
