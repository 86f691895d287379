//! # TaskPair Shared Library
//!
//! This crate contains the models, data access, and business logic shared
//! between the TaskPair API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `tasks`: Task service (CRUD, pagination, filtering, sorting)
//! - `collab`: Collaboration service (invite/uninvite + notifications)
//! - `notify`: Real-time notification gateway and event types
//! - `auth`: Password hashing, JWT tokens, Axum middleware
//! - `patch`: Tri-state patch type for partial updates
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod collab;
pub mod db;
pub mod models;
pub mod notify;
pub mod patch;
pub mod tasks;

/// Current version of the TaskPair shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
