/// Invite collaborator endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks/:id/invite
/// Content-Type: application/json
///
/// { "inviteeEmail": "bob@example.com" }
/// ```
///
/// Owner-only. Email resolution is case-insensitive. If the invitee has
/// open WebSocket sessions, each receives a `TASK_INVITATION` frame; the
/// HTTP response does not wait on or reflect delivery.
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email, or the email is the owner's own
/// - `404 Not Found`: Task missing/not owned, or no user with that email

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskpair_shared::{
    auth::middleware::AuthContext,
    models::{task::TaskWithInvitee, user::UserSummary},
};
use uuid::Uuid;
use validator::Validate;

use crate::{app::AppState, error::ApiResult};

/// Invite request body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[validate(email(message = "Invalid email format"))]
    pub invitee_email: String,
}

pub async fn invite_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> ApiResult<Json<TaskWithInvitee>> {
    req.validate()?;

    let inviter = UserSummary {
        id: auth.user_id,
        email: auth.email,
    };

    let task = state
        .collab()
        .invite(inviter, id, &req.invitee_email)
        .await?;

    Ok(Json(task))
}
