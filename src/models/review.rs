//! Peer review DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserRef;
use crate::error::AppError;

/// Outcome of a peer review.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    NeedsChanges,
    InProgress,
    /// Any status this client does not know, e.g. `conflict` or `escalated`
    #[serde(other)]
    Unknown,
}

impl ReviewStatus {
    /// Statuses a reviewer can submit.
    pub const ALL: [ReviewStatus; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::NeedsChanges,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsChanges => "needs_changes",
            Self::InProgress => "in_progress",
            Self::Unknown => "unknown",
        }
    }

    /// Badge colour.
    pub fn color(self) -> &'static str {
        match self {
            Self::Pending => "yellow",
            Self::Approved => "green",
            Self::Rejected => "red",
            Self::NeedsChanges => "orange",
            Self::InProgress => "blue",
            Self::Unknown => "gray",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Unknown review status: {s}")))
    }
}

/// A reviewer's assessment of a revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerReview {
    pub id: i64,
    #[serde(default)]
    pub revision_id: Option<i64>,
    #[serde(default)]
    pub reviewer_id: Option<i64>,
    #[serde(default)]
    pub reviewer: Option<UserRef>,
    #[serde(default)]
    pub status: ReviewStatus,
    /// Averaged over the review criteria, so not always whole
    #[serde(default, alias = "overall_score")]
    pub score: Option<f64>,
    #[serde(default, alias = "summary")]
    pub feedback: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for `POST /moderation/reviews`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub revision_id: i64,
    pub reviewer_id: i64,
    pub status: ReviewStatus,
    pub score: u8,
    pub feedback: String,
}

/// Query parameters for `POST /moderation/complete-review/{id}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewCompletion {
    pub status: ReviewStatus,
    pub score: u8,
    pub feedback: String,
}
