/// List tasks endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks?page=1&limit=10&sortBy=createdAt&sortOrder=desc&completed=all&search=milk
/// ```
///
/// Returns every task the caller can see: tasks they own plus tasks
/// where they are the invitee. All query parameters are optional.
///
/// - `page`: 1-based, clamped to >= 1
/// - `limit`: page size, clamped to 1..=100 (default 10)
/// - `sortBy`: any task field name (id, title, description, completed,
///   ownerId, inviteeId, createdAt, updatedAt); anything else falls back
///   to createdAt
/// - `sortOrder`: "asc" or "desc" (default desc)
/// - `completed`: "true", "false", or "all" (default all)
/// - `search`: case-insensitive substring match on title or description
///
/// # Response
///
/// ```json
/// {
///   "tasks": [ ... ],
///   "total": 42,
///   "page": 1,
///   "limit": 10,
///   "totalPages": 5
/// }
/// ```

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use taskpair_shared::{
    auth::middleware::AuthContext,
    models::task::SortOrder,
    tasks::{ListTasksParams, TaskPage},
};

use crate::{app::AppState, error::ApiResult};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// List tasks query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub completed: Option<String>,
    pub search: Option<String>,
}

impl ListTasksQuery {
    /// Normalizes raw query parameters into service parameters
    ///
    /// Out-of-range values are clamped rather than rejected; an
    /// unrecognized `completed` value behaves like "all".
    fn into_params(self) -> ListTasksParams {
        let defaults = ListTasksParams::default();

        let sort_order = match self.sort_order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        let completed = match self.completed.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        ListTasksParams {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            sort_order,
            completed,
            search: self.search.filter(|s| !s.trim().is_empty()),
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskPage>> {
    let page = state
        .tasks()
        .list_tasks(auth.user_id, query.into_params())
        .await?;

    Ok(Json(page))
}
