//! # TaskPair API Server Library
//!
//! Core functionality for the TaskPair API server: task management with
//! single-invitee collaboration and real-time notifications.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers (auth, tasks, WebSocket)

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
