/// Collaboration service
///
/// Implements the invite/uninvite protocol on top of the task repository
/// and publishes the resulting events through the notification gateway.
///
/// Unlike plain CRUD, where a missing task is reported as a sentinel,
/// these operations signal violations as errors so callers can surface
/// the specific message (not-owner, unknown user, empty invitee slot).
///
/// # Invitee slot state machine
///
/// ```text
/// Empty → (invite) → Invited → (uninvite) → Empty
/// ```
///
/// Re-inviting while the slot is occupied replaces the invitee (last
/// write wins); uninviting an empty slot fails.
///
/// # Event delivery
///
/// Events are fire-and-forget. The database write commits first; a user
/// with no open sessions simply misses the event. Delivery failures are
/// logged and never fail the request.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::task::{Task, TaskWithInvitee};
use crate::models::user::{User, UserSummary};
use crate::notify::{Notification, NotificationGateway};
use crate::tasks::TaskError;

/// Invite/uninvite operations bound to a pool and gateway
#[derive(Clone)]
pub struct CollabService {
    pool: PgPool,
    gateway: NotificationGateway,
}

impl CollabService {
    pub fn new(pool: PgPool, gateway: NotificationGateway) -> Self {
        Self { pool, gateway }
    }

    /// Invites a user to collaborate on a task
    ///
    /// The inviter must own the task. On success the invitee is
    /// connected, and a `TASK_INVITATION` event is pushed to the
    /// invitee's open sessions.
    ///
    /// # Errors
    ///
    /// - `TaskError::NotFound` if the task does not exist or `inviter`
    ///   does not own it
    /// - `TaskError::Validation` if the email resolves to the owner
    /// - `TaskError::UserNotFound` if the email matches no user
    pub async fn invite(
        &self,
        inviter: UserSummary,
        task_id: Uuid,
        invitee_email: &str,
    ) -> Result<TaskWithInvitee, TaskError> {
        // Ownership check doubles as the existence check
        if Task::find_by_id_and_owner(&self.pool, task_id, inviter.id)
            .await?
            .is_none()
        {
            return Err(TaskError::NotFound);
        }

        let invitee = User::find_by_email(&self.pool, invitee_email.trim())
            .await?
            .ok_or(TaskError::UserNotFound)?;

        if invitee.id == inviter.id {
            return Err(TaskError::Validation(
                "Cannot invite the task owner to their own task".to_string(),
            ));
        }

        // The task can disappear between the check and the write
        let task = Task::set_invitee(&self.pool, task_id, invitee.id)
            .await?
            .ok_or(TaskError::NotFound)?;
        let task = task.attach_invitee(&self.pool).await?;

        info!(%task_id, invitee_id = %invitee.id, "User invited to task");

        let delivered = self.gateway.notify(
            invitee.id,
            Notification::task_invitation(task.clone(), inviter),
        );
        if delivered == 0 {
            debug!(invitee_id = %invitee.id, "Invitee offline, invitation event dropped");
        }

        Ok(task)
    }

    /// Removes the current invitee from a task
    ///
    /// On success a `TASK_UNINVITATION` event is pushed to the user who
    /// was just removed.
    ///
    /// # Errors
    ///
    /// - `TaskError::NotFound` if the task does not exist or `uninviter`
    ///   does not own it
    /// - `TaskError::NoInvitee` if no one is currently invited
    pub async fn uninvite(
        &self,
        uninviter: UserSummary,
        task_id: Uuid,
    ) -> Result<TaskWithInvitee, TaskError> {
        let task = Task::find_by_id_and_owner(&self.pool, task_id, uninviter.id)
            .await?
            .ok_or(TaskError::NotFound)?;

        let Some(removed_id) = task.invitee_id else {
            return Err(TaskError::NoInvitee);
        };

        let task = Task::clear_invitee(&self.pool, task_id)
            .await?
            .ok_or(TaskError::NotFound)?;
        let task = task.attach_invitee(&self.pool).await?;

        info!(%task_id, %removed_id, "Invitee removed from task");

        let delivered = self.gateway.notify(
            removed_id,
            Notification::task_uninvitation(task.clone(), uninviter),
        );
        if delivered == 0 {
            debug!(%removed_id, "Removed user offline, uninvitation event dropped");
        }

        Ok(task)
    }
}
