/// Get task endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks/:id
/// ```
///
/// Owner-only: an invitee can see the task in their list but cannot
/// fetch it by id. A foreign or missing task is indistinguishable from
/// the outside, both respond 404.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use taskpair_shared::{auth::middleware::AuthContext, models::task::TaskWithInvitee};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskWithInvitee>> {
    let task = state
        .tasks()
        .get_task(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}
