//! Server-computed revision diff payload.
//!
//! Every sub-object is optional so the renderer can tell a missing field
//! apart from an empty one.

use serde::{Deserialize, Serialize};

/// Response of `GET /articles/{title}/revisions/{id}/diff`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RevisionDiff {
    #[serde(default)]
    pub revision_id: Option<i64>,
    #[serde(default)]
    pub is_first_revision: bool,
    #[serde(default)]
    pub current_content: Option<String>,
    #[serde(default)]
    pub previous_content: Option<String>,
    #[serde(default)]
    pub current_revision: Option<RevisionStamp>,
    #[serde(default)]
    pub previous_revision: Option<RevisionStamp>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub diff: Option<DiffData>,
}

/// Header of one side of a diff.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevisionStamp {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Unified diff hunks plus statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiffData {
    #[serde(default)]
    pub line_diff: Option<Vec<String>>,
    #[serde(default)]
    pub word_diff: Option<Vec<String>>,
    #[serde(default)]
    pub char_diff: Option<Vec<String>>,
    #[serde(default)]
    pub statistics: Option<DiffStatistics>,
    #[serde(default)]
    pub summary: Option<DiffSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffStatistics {
    #[serde(default)]
    pub added_lines: i64,
    #[serde(default)]
    pub removed_lines: i64,
    #[serde(default)]
    pub total_lines_old: i64,
    #[serde(default)]
    pub total_lines_new: i64,
    #[serde(default)]
    pub added_words: i64,
    #[serde(default)]
    pub removed_words: i64,
    #[serde(default)]
    pub total_words_old: i64,
    #[serde(default)]
    pub total_words_new: i64,
    #[serde(default)]
    pub added_chars: i64,
    #[serde(default)]
    pub removed_chars: i64,
    #[serde(default)]
    pub total_chars_old: i64,
    #[serde(default)]
    pub total_chars_new: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSummary {
    #[serde(default)]
    pub has_changes: bool,
    /// major, minor or none
    #[serde(default)]
    pub change_type: String,
    #[serde(default)]
    pub net_change: i64,
}
