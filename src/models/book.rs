//! Library book DTOs.

use serde::{Deserialize, Serialize};

/// A book in the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, alias = "published_date")]
    pub publication_date: Option<String>,
    #[serde(default, alias = "summary")]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body for book create and update calls.
///
/// Optional fields serialize as explicit `null` when unset.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub publication_date: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub isbn: Option<String>,
}
