/// Task endpoints
///
/// All routes here sit behind the JWT middleware and read the caller's
/// identity from the [`AuthContext`] request extension.
///
/// # Endpoints
///
/// - `POST   /v1/tasks` - Create task
/// - `GET    /v1/tasks` - List tasks (paginated, filtered, sorted)
/// - `GET    /v1/tasks/:id` - Get one task (owner only)
/// - `PATCH  /v1/tasks/:id` - Partial update (owner only)
/// - `DELETE /v1/tasks/:id` - Delete (owner only)
/// - `PATCH  /v1/tasks/:id/toggle` - Set completion flag (owner only)
/// - `POST   /v1/tasks/:id/invite` - Invite a collaborator (owner only)
/// - `DELETE /v1/tasks/:id/invite` - Remove the collaborator (owner only)
///
/// [`AuthContext`]: taskpair_shared::auth::middleware::AuthContext

pub mod create_task;
pub mod delete_task;
pub mod get_task;
pub mod invite_user;
pub mod list_tasks;
pub mod toggle_completion;
pub mod update_task;
pub mod uninvite_user;
