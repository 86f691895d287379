/// Session registry and per-user fan-out
///
/// The gateway tracks every open WebSocket session keyed by user ID. A
/// user may hold several sessions at once (multiple tabs or devices); a
/// notification addressed to a user is cloned into each of their session
/// channels.
///
/// # Delivery semantics
///
/// At-most-once, best-effort. [`NotificationGateway::notify`] returns the
/// number of sessions the event was queued for; zero means the user was
/// offline and the event is gone. Nothing is persisted or retried.
///
/// # Example
///
/// ```
/// use taskpair_shared::notify::NotificationGateway;
/// use uuid::Uuid;
///
/// let gateway = NotificationGateway::new();
/// let user_id = Uuid::new_v4();
///
/// let (session_id, _rx) = gateway.register(user_id);
/// assert!(gateway.is_online(user_id));
///
/// gateway.unregister(user_id, session_id);
/// assert!(!gateway.is_online(user_id));
/// ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::event::Notification;

/// Handle identifying one WebSocket session within the gateway
pub type SessionId = u64;

#[derive(Default)]
struct Registry {
    next_id: SessionId,
    sessions: HashMap<Uuid, HashMap<SessionId, mpsc::UnboundedSender<Notification>>>,
}

/// Shared registry of connected users, cheap to clone
///
/// One instance is created at startup and handed to both the WebSocket
/// route (which registers sessions) and the collaboration service (which
/// publishes events).
#[derive(Clone, Default)]
pub struct NotificationGateway {
    inner: Arc<Mutex<Registry>>,
}

impl NotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        // A panic while holding the lock leaves the registry consistent
        // enough to keep serving; recover instead of propagating.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new session for a user
    ///
    /// Returns the session handle and the receiving end of its channel.
    /// The caller pumps the receiver into the socket and must pass the
    /// handle back to [`NotificationGateway::unregister`] when the
    /// connection closes.
    pub fn register(&self, user_id: Uuid) -> (SessionId, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut registry = self.lock();
        registry.next_id += 1;
        let session_id = registry.next_id;
        registry
            .sessions
            .entry(user_id)
            .or_default()
            .insert(session_id, tx);

        debug!(%user_id, session_id, "WebSocket session registered");

        (session_id, rx)
    }

    /// Removes a session; the user's entry disappears with its last session
    pub fn unregister(&self, user_id: Uuid, session_id: SessionId) {
        let mut registry = self.lock();
        if let Some(user_sessions) = registry.sessions.get_mut(&user_id) {
            user_sessions.remove(&session_id);
            if user_sessions.is_empty() {
                registry.sessions.remove(&user_id);
            }
        }

        debug!(%user_id, session_id, "WebSocket session unregistered");
    }

    /// Sends a notification to every session of one user
    ///
    /// Returns how many sessions the event was queued for. Sessions whose
    /// receiver has already been dropped are skipped.
    pub fn notify(&self, user_id: Uuid, notification: Notification) -> usize {
        let registry = self.lock();
        let Some(user_sessions) = registry.sessions.get(&user_id) else {
            debug!(%user_id, "Notification dropped, user offline");
            return 0;
        };

        let mut delivered = 0;
        for tx in user_sessions.values() {
            if tx.send(notification.clone()).is_ok() {
                delivered += 1;
            }
        }

        debug!(%user_id, delivered, "Notification fanned out");
        delivered
    }

    /// Checks whether a user has at least one open session
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.lock().sessions.contains_key(&user_id)
    }

    /// Number of distinct users currently connected
    pub fn connected_user_count(&self) -> usize {
        self.lock().sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Task, TaskWithInvitee};
    use crate::models::user::UserSummary;
    use chrono::Utc;

    fn sample_notification() -> Notification {
        let task = TaskWithInvitee {
            task: Task {
                id: Uuid::new_v4(),
                title: "Buy milk".to_string(),
                description: None,
                completed: false,
                owner_id: Uuid::new_v4(),
                invitee_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            invitee: None,
        };
        let inviter = UserSummary {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
        };
        Notification::task_invitation(task, inviter)
    }

    #[tokio::test]
    async fn test_register_and_notify() {
        let gateway = NotificationGateway::new();
        let user_id = Uuid::new_v4();

        let (_session_id, mut rx) = gateway.register(user_id);
        assert!(gateway.is_online(user_id));

        let delivered = gateway.notify(user_id, sample_notification());
        assert_eq!(delivered, 1);

        let received = rx.recv().await.expect("Should receive notification");
        assert_eq!(
            received.kind,
            crate::notify::NotificationKind::TaskInvitation
        );
    }

    #[tokio::test]
    async fn test_fan_out_to_all_sessions() {
        let gateway = NotificationGateway::new();
        let user_id = Uuid::new_v4();

        let (_s1, mut rx1) = gateway.register(user_id);
        let (_s2, mut rx2) = gateway.register(user_id);

        let delivered = gateway.notify(user_id, sample_notification());
        assert_eq!(delivered, 2);

        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_notify_offline_user_drops_event() {
        let gateway = NotificationGateway::new();
        let delivered = gateway.notify(Uuid::new_v4(), sample_notification());
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_notify_targets_single_user() {
        let gateway = NotificationGateway::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (_sa, mut alice_rx) = gateway.register(alice);
        let (_sb, mut bob_rx) = gateway.register(bob);

        gateway.notify(alice, sample_notification());

        assert!(alice_rx.recv().await.is_some());
        assert!(bob_rx.try_recv().is_err(), "Bob should receive nothing");
    }

    #[tokio::test]
    async fn test_unregister_last_session_marks_offline() {
        let gateway = NotificationGateway::new();
        let user_id = Uuid::new_v4();

        let (s1, _rx1) = gateway.register(user_id);
        let (s2, _rx2) = gateway.register(user_id);
        assert_eq!(gateway.connected_user_count(), 1);

        gateway.unregister(user_id, s1);
        assert!(gateway.is_online(user_id), "One session still open");

        gateway.unregister(user_id, s2);
        assert!(!gateway.is_online(user_id));
        assert_eq!(gateway.connected_user_count(), 0);
    }

    #[tokio::test]
    async fn test_unregister_unknown_session_is_noop() {
        let gateway = NotificationGateway::new();
        gateway.unregister(Uuid::new_v4(), 42);
        assert_eq!(gateway.connected_user_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_receiver_not_counted() {
        let gateway = NotificationGateway::new();
        let user_id = Uuid::new_v4();

        let (_s1, rx1) = gateway.register(user_id);
        let (_s2, mut rx2) = gateway.register(user_id);
        drop(rx1);

        let delivered = gateway.notify(user_id, sample_notification());
        assert_eq!(delivered, 1);
        assert!(rx2.recv().await.is_some());
    }
}
