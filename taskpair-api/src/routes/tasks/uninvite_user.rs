/// Remove collaborator endpoint
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/tasks/:id/invite
/// ```
///
/// Owner-only, no body. The user who was just removed receives a
/// `TASK_UNINVITATION` frame on their open sessions.
///
/// # Errors
///
/// - `404 Not Found`: Task missing/not owned, or no one is invited

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use taskpair_shared::{
    auth::middleware::AuthContext,
    models::{task::TaskWithInvitee, user::UserSummary},
};
use uuid::Uuid;

use crate::{app::AppState, error::ApiResult};

pub async fn uninvite_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskWithInvitee>> {
    let uninviter = UserSummary {
        id: auth.user_id,
        email: auth.email,
    };

    let task = state.collab().uninvite(uninviter, id).await?;

    Ok(Json(task))
}
