/// Update task endpoint
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/tasks/:id
/// Content-Type: application/json
///
/// { "title": "Buy oat milk", "inviteeEmail": null }
/// ```
///
/// Partial update, owner-only. `description` and `inviteeEmail` are
/// tri-state: omitting the key leaves the field alone, an explicit
/// `null` (or empty string for the email) clears it.
///
/// Unlike create, an `inviteeEmail` value that matches no user fails
/// the whole update with 400; nothing is written.
///
/// # Errors
///
/// - `400 Bad Request`: Empty body, blank title, or unknown invitee email
/// - `404 Not Found`: Task missing or not owned by the caller

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskpair_shared::{
    auth::middleware::AuthContext,
    models::task::TaskWithInvitee,
    patch::Patch,
    tasks::UpdateTaskInput,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Update task request body
///
/// The container-level `default` lets every field be omitted; tri-state
/// fields then distinguish omitted from null on their own.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub completed: Option<bool>,
    pub invitee_email: Patch<String>,
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskWithInvitee>> {
    let task = state
        .tasks()
        .update_task(
            auth.user_id,
            id,
            UpdateTaskInput {
                title: req.title,
                description: req.description,
                completed: req.completed,
                invitee_email: req.invitee_email,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}
