//! Notification DTOs.

use serde::{Deserialize, Serialize};

use super::article::null_as_empty;

/// Category of a notification.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Review,
    Comment,
    Article,
    #[default]
    System,
    PeerReview,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Comment => "comment",
            Self::Article => "article",
            Self::System => "system",
            Self::PeerReview => "peer_review",
        }
    }
}

/// A single inbox entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub timestamp: String,
    pub is_read: bool,
    pub sender: String,
}

/// One raw entry in the peer-review notification feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewNotice {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

/// Response of `GET /peer-review/notifications`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationFeed {
    #[serde(default)]
    pub pending_assignments: u32,
    #[serde(default)]
    pub overdue_reviews: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notifications: Vec<ReviewNotice>,
}

fn default_priority() -> String {
    "normal".into()
}
