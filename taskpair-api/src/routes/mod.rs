/// API route handlers
///
/// # Modules
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: Task CRUD, completion toggle, and collaboration
/// - `ws`: WebSocket notification channel

pub mod auth;
pub mod health;
pub mod tasks;
pub mod ws;
