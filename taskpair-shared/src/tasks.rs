/// Task service
///
/// Business logic for task CRUD on top of the [`crate::models::task`]
/// repository. Handlers call into this layer; it owns input validation,
/// invitee email resolution, and the pagination envelope.
///
/// # Authorization model
///
/// Listing covers everything the user can see (owned plus invited-to).
/// Every other operation is owner-only and reports a missing or
/// foreign task identically as `Ok(None)`.
///
/// # Invitee resolution
///
/// Emails are resolved case-insensitively. The two write paths treat an
/// unresolvable email differently:
///
/// - create: silently skipped, the task is created without an invitee
/// - update: rejected with [`TaskError::InviteeNotFound`]
///
/// An email matching the owner's own address never creates a
/// self-invitation; create skips it, update leaves the stored invitee
/// untouched.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::task::{
    NewTask, SortOrder, Task, TaskFilter, TaskUpdate, TaskWithInvitee,
};
use crate::models::user::User;
use crate::patch::Patch;

/// Error type for task and collaboration operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Task does not exist or is not visible to the caller
    #[error("Task not found")]
    NotFound,

    /// A user referenced by email does not exist (invite path)
    #[error("User not found")]
    UserNotFound,

    /// Uninvite attempted while no one is invited
    #[error("No user is currently invited to this task")]
    NoInvitee,

    /// An invitee email in an update did not match any user
    #[error("Invitee email not found")]
    InviteeNotFound,

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub invitee_email: Option<String>,
}

/// Input for partially updating a task
///
/// Tri-state fields distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub completed: Option<bool>,
    pub invitee_email: Patch<String>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && !self.description.is_set()
            && self.completed.is_none()
            && !self.invitee_email.is_set()
    }
}

/// Parameters for listing tasks
#[derive(Debug, Clone)]
pub struct ListTasksParams {
    /// 1-based page number
    pub page: i64,

    /// Page size
    pub limit: i64,

    /// Public sort field name (whitelisted downstream)
    pub sort_by: String,

    pub sort_order: SortOrder,

    /// Completion filter; None includes both states
    pub completed: Option<bool>,

    /// Substring search over title and description
    pub search: Option<String>,
}

impl Default for ListTasksParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort_by: "createdAt".to_string(),
            sort_order: SortOrder::Desc,
            completed: None,
            search: None,
        }
    }
}

/// One page of tasks plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub tasks: Vec<TaskWithInvitee>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Task business logic bound to a connection pool
#[derive(Clone)]
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a task owned by `owner_id`
    ///
    /// An invitee email that resolves to nobody, or to the owner
    /// themselves, is skipped without error.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Validation` for an empty title.
    pub async fn create_task(
        &self,
        owner_id: Uuid,
        input: CreateTaskInput,
    ) -> Result<TaskWithInvitee, TaskError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(TaskError::Validation("Title is required".to_string()));
        }

        let invitee_id = match input.invitee_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                match User::find_by_email(&self.pool, email).await? {
                    Some(user) if user.id != owner_id => Some(user.id),
                    Some(_) => {
                        debug!(%owner_id, "Skipping self-invitation on create");
                        None
                    }
                    None => {
                        debug!(email, "Invitee email did not resolve, creating without");
                        None
                    }
                }
            }
            _ => None,
        };

        let task = Task::insert(
            &self.pool,
            NewTask {
                owner_id,
                title: title.to_string(),
                description: input.description,
                completed: input.completed.unwrap_or(false),
                invitee_id,
            },
        )
        .await?;

        Ok(task.attach_invitee(&self.pool).await?)
    }

    /// Lists tasks visible to `user_id` with filtering, sorting, and
    /// pagination
    ///
    /// `total` counts all matching rows, so a page past the end returns
    /// an empty `tasks` array with accurate metadata.
    pub async fn list_tasks(
        &self,
        user_id: Uuid,
        params: ListTasksParams,
    ) -> Result<TaskPage, TaskError> {
        let filter = TaskFilter {
            completed: params.completed,
            search: params.search,
        };

        let offset = (params.page - 1) * params.limit;
        let tasks = Task::list_visible(
            &self.pool,
            user_id,
            &filter,
            &params.sort_by,
            params.sort_order,
            params.limit,
            offset,
        )
        .await?;
        let total = Task::count_visible(&self.pool, user_id, &filter).await?;

        Ok(TaskPage {
            tasks,
            total,
            page: params.page,
            limit: params.limit,
            total_pages: total_pages(total, params.limit),
        })
    }

    /// Fetches a single task with its invitee, owner-only
    pub async fn get_task(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<TaskWithInvitee>, TaskError> {
        Ok(Task::find_with_invitee(&self.pool, task_id, owner_id).await?)
    }

    /// Applies a partial update, owner-only
    ///
    /// # Errors
    ///
    /// - `TaskError::Validation` for an empty patch or blank title
    /// - `TaskError::InviteeNotFound` when the task exists but
    ///   `invitee_email` carries a value that matches no user
    pub async fn update_task(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        input: UpdateTaskInput,
    ) -> Result<Option<TaskWithInvitee>, TaskError> {
        if input.is_empty() {
            return Err(TaskError::Validation(
                "At least one field must be provided for update".to_string(),
            ));
        }

        if let Some(ref title) = input.title {
            if title.trim().is_empty() {
                return Err(TaskError::Validation("Title cannot be empty".to_string()));
            }
        }

        // Ownership must win over email resolution: a patch carrying an
        // unknown email against a missing or foreign task is not-found,
        // not a bad email
        if matches!(input.invitee_email, Patch::Value(_))
            && Task::find_by_id_and_owner(&self.pool, task_id, owner_id)
                .await?
                .is_none()
        {
            return Ok(None);
        }

        let invitee_id = match &input.invitee_email {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(email) if email.trim().is_empty() => Patch::Null,
            Patch::Value(email) => match User::find_by_email(&self.pool, email.trim()).await? {
                // The owner's own email leaves the invitee untouched
                Some(user) if user.id == owner_id => Patch::Unset,
                Some(user) => Patch::Value(user.id),
                None => return Err(TaskError::InviteeNotFound),
            },
        };

        let update = TaskUpdate {
            title: input.title.map(|t| t.trim().to_string()),
            description: input.description,
            completed: input.completed,
            invitee_id,
        };

        let Some(task) = Task::update(&self.pool, task_id, owner_id, update).await? else {
            return Ok(None);
        };

        Ok(Some(task.attach_invitee(&self.pool).await?))
    }

    /// Sets the completion flag, owner-only
    pub async fn toggle_completion(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<Option<TaskWithInvitee>, TaskError> {
        let Some(task) = Task::set_completed(&self.pool, task_id, owner_id, completed).await?
        else {
            return Ok(None);
        };

        Ok(Some(task.attach_invitee(&self.pool).await?))
    }

    /// Deletes a task, owner-only, returning the deleted snapshot
    pub async fn delete_task(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Task>, TaskError> {
        Ok(Task::delete(&self.pool, task_id, owner_id).await?)
    }
}

/// Ceiling division for the page count; zero rows means zero pages
fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
