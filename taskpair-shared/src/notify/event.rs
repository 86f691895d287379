/// Notification payload types
///
/// These are the JSON frames pushed to WebSocket clients. The wire shape:
///
/// ```json
/// {
///   "type": "TASK_INVITATION",
///   "data": {
///     "task": { "...": "full task with invitee" },
///     "inviter": { "id": "...", "email": "owner@example.com" },
///     "message": "You have been invited to collaborate on task: \"Buy milk\"",
///     "timestamp": "2026-01-15T10:30:00Z"
///   }
/// }
/// ```
///
/// `TASK_UNINVITATION` frames carry `uninviter` instead of `inviter`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::task::TaskWithInvitee;
use crate::models::user::UserSummary;

/// Discriminator for notification frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// The recipient was invited to collaborate on a task
    TaskInvitation,

    /// The recipient was removed from a task
    TaskUninvitation,
}

/// Event payload carried inside a notification frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    /// Snapshot of the task after the change
    pub task: TaskWithInvitee,

    /// Who performed the invitation (invitation frames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter: Option<UserSummary>,

    /// Who performed the removal (removal frames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uninviter: Option<UserSummary>,

    /// Human-readable summary for display
    pub message: String,

    /// When the event happened
    pub timestamp: DateTime<Utc>,
}

/// A notification frame as sent over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub data: NotificationData,
}

impl Notification {
    /// Builds an invitation notification for the invited user
    pub fn task_invitation(task: TaskWithInvitee, inviter: UserSummary) -> Self {
        let message = format!(
            "You have been invited to collaborate on task: \"{}\"",
            task.task.title
        );

        Self {
            kind: NotificationKind::TaskInvitation,
            data: NotificationData {
                task,
                inviter: Some(inviter),
                uninviter: None,
                message,
                timestamp: Utc::now(),
            },
        }
    }

    /// Builds a removal notification for the uninvited user
    pub fn task_uninvitation(task: TaskWithInvitee, uninviter: UserSummary) -> Self {
        let message = format!("You have been removed from task: \"{}\"", task.task.title);

        Self {
            kind: NotificationKind::TaskUninvitation,
            data: NotificationData {
                task,
                inviter: None,
                uninviter: Some(uninviter),
                message,
                timestamp: Utc::now(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Task;
    use uuid::Uuid;

    fn sample_task(title: &str) -> TaskWithInvitee {
        TaskWithInvitee {
            task: Task {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: None,
                completed: false,
                owner_id: Uuid::new_v4(),
                invitee_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            invitee: None,
        }
    }

    #[test]
    fn test_invitation_wire_shape() {
        let inviter = UserSummary {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
        };
        let notification = Notification::task_invitation(sample_task("Buy milk"), inviter);

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "TASK_INVITATION");
        assert_eq!(json["data"]["inviter"]["email"], "owner@example.com");
        assert_eq!(
            json["data"]["message"],
            "You have been invited to collaborate on task: \"Buy milk\""
        );
        assert!(json["data"].get("uninviter").is_none());
        assert!(json["data"]["timestamp"].is_string());
    }

    #[test]
    fn test_uninvitation_wire_shape() {
        let uninviter = UserSummary {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
        };
        let notification = Notification::task_uninvitation(sample_task("Buy milk"), uninviter);

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "TASK_UNINVITATION");
        assert_eq!(
            json["data"]["message"],
            "You have been removed from task: \"Buy milk\""
        );
        assert!(json["data"].get("inviter").is_none());
        assert!(json["data"]["uninviter"].is_object());
    }
}
