//! Article, revision and comment DTOs.

use serde::{Deserialize, Deserializer, Serialize};

use super::UserRef;

/// A comment attached to a revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl Comment {
    /// Author name, or "Anonymous".
    pub fn author(&self) -> &str {
        self.user.as_ref().map_or("Anonymous", |u| u.username.as_str())
    }
}

/// A stored historical version of an article's content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Revision {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, alias = "articleId")]
    pub article_id: Option<i64>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user: Option<UserRef>,
    /// Moderation status (pending, approved, rejected)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub needs_review: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

impl Revision {
    /// Editor name, or "Anonymous".
    pub fn author(&self) -> &str {
        self.user.as_ref().map_or("Anonymous", |u| u.username.as_str())
    }

    /// Revision comment if present and non-blank.
    pub fn edit_comment(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A full article with its current revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    /// Normalized title (underscores for spaces)
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub revision_count: Option<u64>,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: String,
    #[serde(default, alias = "currentRevisionId")]
    pub current_revision_id: Option<i64>,
    #[serde(default, rename = "currentRevision", alias = "current_revision")]
    pub current_revision: Option<Revision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<Revision>,
}

/// Article list entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: String,
}

/// Body for `POST /articles`.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleCreate {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body for `PATCH /articles/{title}`.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleUpdate {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Response of the add-comment call.
///
/// Some deployments wrap the new comment, others return the whole revision.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommentPosted {
    Wrapped { comment: Comment },
    Revision(Revision),
}

impl CommentPosted {
    /// The comment that was just created, if the response carries one.
    pub fn into_comment(self) -> Option<Comment> {
        match self {
            Self::Wrapped { comment } => Some(comment),
            Self::Revision(revision) => revision.comments.into_iter().max_by_key(|c| c.id),
        }
    }
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
