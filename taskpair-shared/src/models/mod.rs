/// Database models for TaskPair
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `task`: Tasks with one owner and at most one invitee
///
/// # Example
///
/// ```no_run
/// use taskpair_shared::models::user::{User, CreateUser};
/// use taskpair_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
