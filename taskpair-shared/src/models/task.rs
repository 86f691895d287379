/// Task model and database operations
///
/// This module provides the Task model: a unit of work owned by exactly
/// one user and optionally shared with a single invitee.
///
/// # Ownership & visibility
///
/// - `owner_id` is set at creation and never changes.
/// - A task is *visible* to its owner and its invitee (list queries).
/// - Only the owner may read a single task by id or mutate it; all
///   owner-scoped operations return `Option` and yield `None` when the
///   row does not exist or belongs to someone else.
///
/// # Invitee slot
///
/// ```text
/// Empty → (set_invitee) → Invited → (clear_invitee | delete) → Empty
/// ```
///
/// The invitee is a weak reference: clearing it touches only the
/// `invitee_id` column.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     description TEXT,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     invitee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskpair_shared::models::task::{Task, NewTask};
/// use taskpair_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::insert(&pool, NewTask {
///     owner_id: Uuid::new_v4(),
///     title: "Buy milk".to_string(),
///     description: None,
///     completed: false,
///     invitee_id: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::user::{User, UserSummary};
use crate::patch::Patch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model representing a row in the `tasks` table
///
/// Serializes with camelCase keys to match the public API shape.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Non-empty title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag (defaults to false)
    pub completed: bool,

    /// Owning user; immutable after creation
    pub owner_id: Uuid,

    /// Invited collaborator, if any (at most one)
    pub invitee_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Task together with its resolved invitee, the shape returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithInvitee {
    #[serde(flatten)]
    pub task: Task,

    /// Resolved invitee details (None when no one is invited)
    pub invitee: Option<UserSummary>,
}

/// Input for inserting a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub invitee_id: Option<Uuid>,
}

/// Input for partially updating a task
///
/// `description` and `invitee_id` are tri-state: leaving them
/// [`Patch::Unset`] preserves the stored value, [`Patch::Null`] clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub completed: Option<bool>,
    pub invitee_id: Patch<Uuid>,
}

impl TaskUpdate {
    /// Returns true if the update would change any column besides `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && !self.description.is_set()
            && self.completed.is_none()
            && !self.invitee_id.is_set()
    }
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

/// Filter predicate for list queries (applied on top of visibility)
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Narrow by completion state; None applies no filter
    pub completed: Option<bool>,

    /// Case-insensitive substring match on title OR description
    pub search: Option<String>,
}

/// Maps a public sort field name to a column, falling back to `created_at`
/// for anything unrecognized. Only whitelisted names ever reach the query,
/// so the ORDER BY clause can be interpolated safely.
pub fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "id" => "id",
        "title" => "title",
        "description" => "description",
        "completed" => "completed",
        "ownerId" => "owner_id",
        "inviteeId" => "invitee_id",
        "updatedAt" => "updated_at",
        "createdAt" => "created_at",
        _ => "created_at",
    }
}

const TASK_COLUMNS: &str =
    "id, title, description, completed, owner_id, invitee_id, created_at, updated_at";

const JOINED_COLUMNS: &str = "t.id, t.title, t.description, t.completed, t.owner_id, \
     t.invitee_id, t.created_at, t.updated_at, u.email AS invitee_email";

/// Row shape for queries that join the invitee's email
#[derive(sqlx::FromRow)]
struct TaskInviteeRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    owner_id: Uuid,
    invitee_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    invitee_email: Option<String>,
}

impl From<TaskInviteeRow> for TaskWithInvitee {
    fn from(row: TaskInviteeRow) -> Self {
        let invitee = match (row.invitee_id, row.invitee_email) {
            (Some(id), Some(email)) => Some(UserSummary { id, email }),
            _ => None,
        };

        TaskWithInvitee {
            task: Task {
                id: row.id,
                title: row.title,
                description: row.description,
                completed: row.completed,
                owner_id: row.owner_id,
                invitee_id: row.invitee_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            invitee,
        }
    }
}

/// Builds the WHERE clause shared by list and count queries.
///
/// Bind order: $1 = user id, then completed (if set), then the search
/// pattern (if set). Returns the clause and the number of binds it uses.
fn build_filter_where(filter: &TaskFilter) -> (String, usize) {
    let mut clause = String::from("WHERE (t.owner_id = $1 OR t.invitee_id = $1)");
    let mut binds = 1;

    if filter.completed.is_some() {
        binds += 1;
        clause.push_str(&format!(" AND t.completed = ${}", binds));
    }
    if filter.search.is_some() {
        binds += 1;
        clause.push_str(&format!(
            " AND (t.title ILIKE ${0} OR t.description ILIKE ${0})",
            binds
        ));
    }

    (clause, binds)
}

/// Builds the dynamic SET clause for a partial update.
///
/// Bind order: $1 = task id, $2 = owner id, then title, description,
/// completed, invitee in that order for any field carrying a value.
/// Cleared tri-state fields compile to literal NULL assignments.
fn build_update_sql(update: &TaskUpdate) -> String {
    let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
    let mut bind = 2;

    if update.title.is_some() {
        bind += 1;
        query.push_str(&format!(", title = ${}", bind));
    }
    match update.description {
        Patch::Unset => {}
        Patch::Null => query.push_str(", description = NULL"),
        Patch::Value(_) => {
            bind += 1;
            query.push_str(&format!(", description = ${}", bind));
        }
    }
    if update.completed.is_some() {
        bind += 1;
        query.push_str(&format!(", completed = ${}", bind));
    }
    match update.invitee_id {
        Patch::Unset => {}
        Patch::Null => query.push_str(", invitee_id = NULL"),
        Patch::Value(_) => {
            bind += 1;
            query.push_str(&format!(", invitee_id = ${}", bind));
        }
    }

    query.push_str(" WHERE id = $1 AND owner_id = $2 RETURNING ");
    query.push_str(TASK_COLUMNS);
    query
}

impl Task {
    /// Inserts a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails (e.g. the owner
    /// does not exist).
    pub async fn insert(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description, completed, invitee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, completed, owner_id, invitee_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .bind(data.invitee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns `None` when the task does not exist *or* is owned by a
    /// different user; callers cannot distinguish the two.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, owner_id, invitee_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with the invitee's email joined in, owner-scoped
    pub async fn find_with_invitee(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<TaskWithInvitee>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskInviteeRow>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM tasks t
            LEFT JOIN users u ON u.id = t.invitee_id
            WHERE t.id = $1 AND t.owner_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(TaskWithInvitee::from))
    }

    /// Lists tasks visible to a user (owner or invitee), filtered, sorted,
    /// and paginated
    ///
    /// `sort_by` is matched against the whitelist in [`sort_column`];
    /// unknown names fall back to `created_at`.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
        sort_by: &str,
        sort_order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskWithInvitee>, sqlx::Error> {
        let (where_clause, binds) = build_filter_where(filter);
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM tasks t \
             LEFT JOIN users u ON u.id = t.invitee_id \
             {where_clause} ORDER BY t.{} {} LIMIT ${} OFFSET ${}",
            sort_column(sort_by),
            sort_order.as_sql(),
            binds + 1,
            binds + 2,
        );

        let mut q = sqlx::query_as::<_, TaskInviteeRow>(&query).bind(user_id);
        if let Some(completed) = filter.completed {
            q = q.bind(completed);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok(rows.into_iter().map(TaskWithInvitee::from).collect())
    }

    /// Counts tasks visible to a user under the same filter predicate as
    /// [`Task::list_visible`] (pagination excluded)
    pub async fn count_visible(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = build_filter_where(filter);
        let query = format!("SELECT COUNT(*) FROM tasks t {where_clause}");

        let mut q = sqlx::query_as::<_, (i64,)>(&query).bind(user_id);
        if let Some(completed) = filter.completed {
            q = q.bind(completed);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        let (count,) = q.fetch_one(pool).await?;

        Ok(count)
    }

    /// Applies a partial update, scoped to the owner
    ///
    /// `updated_at` advances even when the patch is otherwise empty.
    /// Returns `None` when the task is missing or not owned by `owner_id`
    /// (including the race where it was deleted concurrently).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        update: TaskUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = build_update_sql(&update);

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = update.title {
            q = q.bind(title);
        }
        if let Patch::Value(description) = update.description {
            q = q.bind(description);
        }
        if let Some(completed) = update.completed {
            q = q.bind(completed);
        }
        if let Patch::Value(invitee_id) = update.invitee_id {
            q = q.bind(invitee_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Connects a user as the task's invitee, writing the foreign key
    /// directly
    ///
    /// Re-inviting while an invitee is already set replaces the
    /// connection (last write wins). Ownership must be checked by the
    /// caller before this point.
    pub async fn set_invitee(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET invitee_id = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, completed, owner_id, invitee_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Disconnects the task's invitee
    pub async fn clear_invitee(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET invitee_id = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, completed, owner_id, invitee_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the completion flag, scoped to the owner
    ///
    /// Idempotent: setting the flag to its current value succeeds.
    pub async fn set_completed(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        completed: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed = $3,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, completed, owner_id, invitee_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, scoped to the owner, returning the deleted snapshot
    pub async fn delete(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, completed, owner_id, invitee_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Resolves the invitee's summary for a freshly written row
    ///
    /// Used after insert/update paths that return the bare row, to avoid
    /// a second joined fetch.
    pub async fn attach_invitee(
        self,
        pool: &PgPool,
    ) -> Result<TaskWithInvitee, sqlx::Error> {
        let invitee = match self.invitee_id {
            Some(invitee_id) => User::find_by_id(pool, invitee_id)
                .await?
                .map(|u| UserSummary::from(&u)),
            None => None,
        };

        Ok(TaskWithInvitee {
            task: self,
            invitee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column("createdAt"), "created_at");
        assert_eq!(sort_column("updatedAt"), "updated_at");
        assert_eq!(sort_column("title"), "title");
        assert_eq!(sort_column("completed"), "completed");
        assert_eq!(sort_column("ownerId"), "owner_id");
        assert_eq!(sort_column("inviteeId"), "invitee_id");

        // Unknown fields fall back to created_at
        assert_eq!(sort_column("invitee"), "created_at");
        assert_eq!(sort_column("'; DROP TABLE tasks;--"), "created_at");
        assert_eq!(sort_column(""), "created_at");
    }

    #[test]
    fn test_sort_order_sql() {
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_filter_where_visibility_only() {
        let (clause, binds) = build_filter_where(&TaskFilter::default());
        assert_eq!(clause, "WHERE (t.owner_id = $1 OR t.invitee_id = $1)");
        assert_eq!(binds, 1);
    }

    #[test]
    fn test_filter_where_completed_and_search() {
        let filter = TaskFilter {
            completed: Some(true),
            search: Some("milk".to_string()),
        };
        let (clause, binds) = build_filter_where(&filter);
        assert!(clause.contains("t.completed = $2"));
        assert!(clause.contains("t.title ILIKE $3 OR t.description ILIKE $3"));
        assert_eq!(binds, 3);
    }

    #[test]
    fn test_filter_where_search_only() {
        let filter = TaskFilter {
            completed: None,
            search: Some("milk".to_string()),
        };
        let (clause, binds) = build_filter_where(&filter);
        assert!(clause.contains("t.title ILIKE $2"));
        assert_eq!(binds, 2);
    }

    #[test]
    fn test_update_sql_empty_patch_touches_timestamp() {
        let sql = build_update_sql(&TaskUpdate::default());
        assert!(sql.starts_with("UPDATE tasks SET updated_at = NOW() WHERE"));
        assert!(sql.contains("id = $1 AND owner_id = $2"));
    }

    #[test]
    fn test_update_sql_binds_in_order() {
        let update = TaskUpdate {
            title: Some("New".to_string()),
            description: Patch::Value("desc".to_string()),
            completed: Some(true),
            invitee_id: Patch::Value(Uuid::new_v4()),
        };
        let sql = build_update_sql(&update);
        assert!(sql.contains("title = $3"));
        assert!(sql.contains("description = $4"));
        assert!(sql.contains("completed = $5"));
        assert!(sql.contains("invitee_id = $6"));
    }

    #[test]
    fn test_update_sql_null_clears_without_bind() {
        let update = TaskUpdate {
            title: None,
            description: Patch::Null,
            completed: Some(false),
            invitee_id: Patch::Null,
        };
        let sql = build_update_sql(&update);
        assert!(sql.contains("description = NULL"));
        assert!(sql.contains("invitee_id = NULL"));
        // completed is the only bound column after id/owner
        assert!(sql.contains("completed = $3"));
    }

    #[test]
    fn test_task_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        assert!(!TaskUpdate {
            completed: Some(true),
            ..Default::default()
        }
        .is_empty());
        assert!(!TaskUpdate {
            invitee_id: Patch::Null,
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: None,
            completed: false,
            owner_id: Uuid::new_v4(),
            invitee_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("ownerId").is_some());
        assert!(json.get("inviteeId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_task_with_invitee_flattens() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: None,
            completed: false,
            owner_id: Uuid::new_v4(),
            invitee_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let with_invitee = TaskWithInvitee {
            invitee: Some(UserSummary {
                id: task.invitee_id.unwrap(),
                email: "bob@example.com".to_string(),
            }),
            task,
        };

        let json = serde_json::to_value(&with_invitee).unwrap();
        assert_eq!(json["invitee"]["email"], "bob@example.com");
        assert!(json.get("title").is_some(), "task fields are flattened");
    }
}
