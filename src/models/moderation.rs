//! Moderation DTOs: flags, decisions and revision details.

use serde::{Deserialize, Serialize};

use super::{PeerReview, Revision, UserRef, article::null_as_empty};

/// Body for `POST /moderation/flag`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlagRequest {
    pub content_type: String,
    pub content_id: i64,
    pub flag_type: String,
    pub reason: String,
}

/// A moderator's decision on a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    /// Last path segment of the moderation endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Reason sent when the moderator leaves none.
    pub fn default_reason(self) -> &'static str {
        match self {
            Self::Approve => "Approved by moderator",
            Self::Reject => "Rejected by moderator",
        }
    }
}

/// Body for `POST /moderation/approve` and `POST /moderation/reject`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModerationDecision {
    pub content_type: String,
    pub content_id: i64,
    pub reason: String,
}

/// A recorded moderator action on a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerationAction {
    pub id: i64,
    #[serde(default)]
    pub moderator: Option<UserRef>,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Article header embedded in revision details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRef {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response of `GET /articles/revisions/{id}/details`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevisionDetails {
    pub revision: Revision,
    pub article: ArticleRef,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reviews: Vec<PeerReview>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub moderation_actions: Vec<ModerationAction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewStatus;

    fn details(review: &str) -> String {
        format!(
            r#"{{"revision": {{"id": 12, "content": "Text"}},
                "article": {{"id": 4, "title": "Mali_Empire"}},
                "reviews": [{review}]}}"#
        )
    }

    #[test]
    fn test_details_with_fractional_score() {
        let json = details(r#"{"id": 1, "status": "approved", "overall_score": 3.67}"#);
        let details: RevisionDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(details.reviews[0].score, Some(3.67));
    }

    #[test]
    fn test_details_with_review_in_progress() {
        let json = details(r#"{"id": 1, "status": "in_progress", "overall_score": null}"#);
        let details: RevisionDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(details.reviews[0].status, ReviewStatus::InProgress);
        assert_eq!(details.reviews[0].score, None);
        assert!(details.moderation_actions.is_empty());
    }
}
