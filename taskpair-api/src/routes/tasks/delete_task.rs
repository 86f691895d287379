/// Delete task endpoint
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/tasks/:id
/// ```
///
/// Owner-only. The response carries a snapshot of the deleted task so
/// clients can render an undo-style confirmation without a prior fetch.
///
/// # Response
///
/// ```json
/// { "message": "Task deleted successfully", "task": { ... } }
/// ```

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use taskpair_shared::{auth::middleware::AuthContext, models::task::Task};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Delete task response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
    pub task: Task,
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let task = state
        .tasks()
        .delete_task(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
        task,
    }))
}
