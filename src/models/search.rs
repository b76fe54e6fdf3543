//! Full-text search results.

use serde::{Deserialize, Serialize};

/// One article matching a search, best match first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub rank: Option<f64>,
    /// Excerpt with matches wrapped in `**`
    #[serde(default)]
    pub snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_without_snippet() {
        let hits: Vec<SearchHit> = serde_json::from_str(
            r#"[{"id": 1, "title": "Mali_Empire", "rank": 0.42, "snippet": "the **Mali** Empire"},
                {"id": 2, "title": "Timbuktu", "rank": null}]"#,
        )
        .unwrap();
        assert_eq!(hits[0].rank, Some(0.42));
        assert_eq!(hits[1].snippet, None);
    }
}
