/// Toggle completion endpoint
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/tasks/:id/toggle
/// Content-Type: application/json
///
/// { "completed": true }
/// ```
///
/// Sets the completion flag explicitly rather than flipping it, so
/// retries are idempotent. The body is checked strictly: anything other
/// than a JSON boolean is a 400, including "true" as a string.
///
/// # Errors
///
/// - `400 Bad Request`: `completed` missing or not a boolean
/// - `404 Not Found`: Task missing or not owned by the caller

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskpair_shared::{auth::middleware::AuthContext, models::task::TaskWithInvitee};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Toggle request body
///
/// `completed` is captured as a raw JSON value so a string or number can
/// be rejected with a specific message instead of a generic parse error.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub completed: Option<serde_json::Value>,
}

pub async fn toggle_completion(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<Json<TaskWithInvitee>> {
    let completed = req
        .completed
        .as_ref()
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| ApiError::BadRequest("Completed must be a boolean".to_string()))?;

    let task = state
        .tasks()
        .toggle_completion(auth.user_id, id, completed)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_accepted() {
        let req: ToggleRequest = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(req.completed.as_ref().and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn test_non_boolean_values_rejected() {
        for body in [
            r#"{"completed": "true"}"#,
            r#"{"completed": 1}"#,
            r#"{"completed": null}"#,
            r#"{}"#,
        ] {
            let req: ToggleRequest = serde_json::from_str(body).unwrap();
            assert!(
                req.completed.as_ref().and_then(|v| v.as_bool()).is_none(),
                "{} should not yield a boolean",
                body
            );
        }
    }
}
