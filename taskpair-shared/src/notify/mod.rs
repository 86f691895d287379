/// Real-time notification delivery
///
/// Collaboration events (invitations and removals) are pushed to affected
/// users over WebSocket. This module owns the event shapes and the
/// in-process gateway that routes them to connected sessions.
///
/// # Modules
///
/// - [`event`]: Notification payload types and message text
/// - [`gateway`]: Session registry with per-user fan-out
///
/// Delivery is best-effort: events for offline users are dropped, never
/// queued, and failures never surface to the HTTP request that caused
/// them.

pub mod event;
pub mod gateway;

pub use event::{Notification, NotificationData, NotificationKind};
pub use gateway::NotificationGateway;
