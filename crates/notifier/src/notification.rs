use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mentor_common::types::EntityType;

use crate::diff::RequestEvent;

pub const USER_INBOX_PATH: &str = "/app/user/inbox";
pub const MENTOR_INBOX_PATH: &str = "/app/mentor/inbox";
pub const USER_OUTGOING_PATH: &str = "/app/user/outgoing";
pub const MENTOR_OUTGOING_PATH: &str = "/app/mentor/outgoing";

const VIEW_LABEL: &str = "View";

/// Inbox page of an account of the given type.
pub fn inbox_path(account: EntityType) -> &'static str {
    match account {
        EntityType::User => USER_INBOX_PATH,
        EntityType::Mentor => MENTOR_INBOX_PATH,
    }
}

/// Sent-requests page of an account of the given type.
pub fn outgoing_path(account: EntityType) -> &'static str {
    match account {
        EntityType::User => USER_OUTGOING_PATH,
        EntityType::Mentor => MENTOR_OUTGOING_PATH,
    }
}

/// Toast flavour, maps onto the presenter's info/success/error styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// Button attached to a toast; activating it navigates to `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub path: String,
}

/// Presenter-ready notification for one request transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub request_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// Translate a detected transition into what the user sees.
    pub fn for_event(event: &RequestEvent) -> Self {
        let request = event.request();
        let (kind, title, description, path) = match event {
            RequestEvent::NewIncoming(_) => (
                NotificationKind::Info,
                format!("New request from {}", request.sender_display_name()),
                "You have a new incoming request".to_string(),
                inbox_path(request.receiver_type),
            ),
            RequestEvent::Accepted(_) => (
                NotificationKind::Success,
                "Request accepted".to_string(),
                format!("{} accepted your request", request.receiver_display_name()),
                outgoing_path(request.sender_type),
            ),
            RequestEvent::Rejected(_) => (
                NotificationKind::Error,
                "Request rejected".to_string(),
                format!("{} rejected your request", request.receiver_display_name()),
                outgoing_path(request.sender_type),
            ),
        };

        Self {
            id: Uuid::new_v4(),
            request_id: request.id,
            kind,
            title,
            description,
            action: Some(NotificationAction {
                label: VIEW_LABEL.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

/// Everything the notifier tells its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifierEvent {
    /// Show a toast.
    Notify(Notification),
    /// Current number of unanswered incoming requests. Never zero.
    UnreadCount(usize),
    /// Clear the unread badge.
    UnreadReset,
}
