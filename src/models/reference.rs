//! Bibliographic source and article reference DTOs.

use serde::{Deserialize, Serialize};

/// Kind of bibliographic source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Web,
    Book,
    Journal,
    Newspaper,
    #[serde(other)]
    Other,
}

impl SourceType {
    /// Badge colour for this source type.
    pub fn color(self) -> &'static str {
        match self {
            Self::Web => "blue",
            Self::Book => "green",
            Self::Journal => "purple",
            Self::Newspaper => "orange",
            Self::Other => "gray",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Book => "book",
            Self::Journal => "journal",
            Self::Newspaper => "newspaper",
            Self::Other => "other",
        }
    }
}

/// Bibliographic metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub access_date: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A citation of a source, positioned in an article by `reference_number`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    pub id: i64,
    #[serde(default)]
    pub article_id: i64,
    #[serde(default)]
    pub source_id: i64,
    pub reference_number: u32,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub page_number: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    pub source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_source_type_is_other() {
        let source: Source =
            serde_json::from_str(r#"{"title": "Oral history", "source_type": "interview"}"#)
                .unwrap();
        assert_eq!(source.source_type, SourceType::Other);
        assert_eq!(source.source_type.color(), "gray");
    }
}
