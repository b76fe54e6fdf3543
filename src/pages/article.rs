//! Article pages: index, article, history, revision, diff and references.

use std::fmt;

use crate::error::AppError;
use crate::models::{ArticleSummary, ModerationAction, Reference, Revision};
use crate::pages::{Pages, settle, settle_alert};
use crate::render::{Alert, Page, layout};
use crate::services::comments::{CommentEntry, CommentThread, write_thread};
use crate::services::moderation::{revision_status, status_badge};
use crate::services::{ArticleView, DiffView, ReferenceList, ReviewTable};
use crate::utils::{display_title, non_blank, time};

/// List of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleIndex {
    pub heading: String,
    pub articles: Vec<ArticleSummary>,
    pub date_format: String,
}

impl fmt::Display for ArticleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &self.heading)?;
        if self.articles.is_empty() {
            return writeln!(f, "No articles yet.");
        }
        for article in &self.articles {
            let mut line = display_title(&article.title);
            if let Some(status) = non_blank(article.status.as_deref()) {
                line.push(' ');
                line.push_str(&layout::badge(&status_badge(status).label));
            }
            if article.is_featured {
                line.push(' ');
                line.push_str(&layout::badge("Featured"));
            }
            writeln!(f, "{line}")?;
            layout::sub_item(
                f,
                &format!(
                    "{} | updated {}",
                    layout::count(article.view_count as usize, "view"),
                    time::format_timestamp(&article.updated_at, &self.date_format)
                ),
            )?;
        }
        Ok(())
    }
}

/// An article with its reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub view: ArticleView,
    pub references: ReferenceList,
    /// Set when references failed to load; the article still shows.
    pub references_alert: Option<Alert>,
}

impl fmt::Display for ArticlePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.view)?;
        match &self.references_alert {
            Some(alert) => {
                writeln!(f)?;
                write!(f, "{alert}")
            }
            None => write!(f, "{}", self.references),
        }
    }
}

/// One revision in the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub revision_id: i64,
    pub timestamp: String,
    pub author: String,
    pub comment: Option<String>,
    pub status: &'static str,
    pub comments: Vec<CommentEntry>,
}

/// Revision history of one article, newest first as served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub title: String,
    pub entries: Vec<HistoryEntry>,
}

impl fmt::Display for HistoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &format!("Revision history: {}", self.title))?;
        if self.entries.is_empty() {
            return writeln!(f, "No revision history found for this article.");
        }
        for entry in &self.entries {
            writeln!(f)?;
            writeln!(
                f,
                "Revision #{} {}",
                entry.revision_id,
                layout::badge(entry.status)
            )?;
            layout::sub_item(f, &entry.timestamp)?;
            layout::sub_item(f, &format!("Edited by: {}", entry.author))?;
            if let Some(comment) = &entry.comment {
                layout::sub_item(f, &format!("Comment: {comment}"))?;
            }
            write_thread(f, &entry.comments, None)?;
        }
        Ok(())
    }
}

/// A single revision with its diff and peer reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPage {
    pub article_title: String,
    pub revision: Revision,
    pub timestamp: String,
    pub comments: Vec<CommentEntry>,
    pub actions: Vec<ModerationAction>,
    pub diff: std::result::Result<DiffView, Alert>,
    pub reviews: std::result::Result<ReviewTable, Alert>,
}

impl fmt::Display for RevisionPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let revision = &self.revision;
        layout::header(
            f,
            &format!("Revision #{} of {}", revision.id, self.article_title),
        )?;

        let (status, _) = revision_status(revision);
        let mut items = vec![
            ("Author", revision.author().to_string()),
            ("Date", self.timestamp.clone()),
            ("Status", status.to_string()),
        ];
        if let Some(comment) = revision.edit_comment() {
            items.push(("Edit comment", comment.to_string()));
        }
        layout::summary(f, "Revision", &items)?;

        layout::section(f, "Content")?;
        writeln!(f, "{}", revision.content.trim_end())?;

        write_thread(f, &self.comments, Some("No comments yet"))?;

        if !self.actions.is_empty() {
            layout::section(f, "Moderation History")?;
            for action in &self.actions {
                let moderator = action
                    .moderator
                    .as_ref()
                    .map_or("Unknown moderator", |m| m.username.as_str());
                writeln!(f, "{} by {}", action.action_type, moderator)?;
                if let Some(reason) = non_blank(action.reason.as_deref()) {
                    layout::sub_item(f, reason)?;
                }
            }
        }

        match &self.diff {
            Ok(view) => write!(f, "{view}")?,
            Err(alert) => {
                writeln!(f)?;
                write!(f, "{alert}")?;
            }
        }
        match &self.reviews {
            Ok(table) => write!(f, "{table}"),
            Err(alert) => {
                writeln!(f)?;
                write!(f, "{alert}")
            }
        }
    }
}

/// Standalone diff of one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPage {
    pub title: String,
    pub revision_id: i64,
    pub view: DiffView,
}

impl fmt::Display for DiffPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(
            f,
            &format!("Changes in revision #{} of {}", self.revision_id, self.title),
        )?;
        write!(f, "{}", self.view)
    }
}

/// Standalone reference list of an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencesPage {
    pub title: String,
    pub list: ReferenceList,
}

impl fmt::Display for ReferencesPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &format!("References: {}", self.title))?;
        if self.list.is_empty() {
            return writeln!(f, "No references for this article.");
        }
        write!(f, "{}", self.list)
    }
}

fn diff_alert(e: &AppError) -> Alert {
    Alert::from_error("Error loading changes", "Failed to load revision changes", e)
}

fn references_alert() -> Alert {
    Alert::error("Error loading references", "Failed to load references")
}

impl Pages<'_> {
    fn reference_list(&self, references: &[Reference], expanded: bool) -> ReferenceList {
        ReferenceList::new(
            references,
            &self.display.date_format,
            self.display.reference_collapse_threshold,
        )
        .expanded(expanded)
    }

    /// All articles.
    pub async fn articles(&self) -> Page<ArticleIndex> {
        let result = self.backend.list_articles().await;
        settle_alert(result, "Error loading articles", "Could not load articles").map(
            |articles| ArticleIndex {
                heading: "Articles".to_string(),
                articles,
                date_format: self.display.date_format.clone(),
            },
        )
    }

    /// An article and its references, fetched together.
    ///
    /// A missing article, or one without a current revision, is not found.
    /// Failing references only replace the reference section.
    pub async fn article(&self, title: &str, expand_references: bool) -> Page<ArticlePage> {
        let what = format!("Article \"{}\"", display_title(title));
        let (article, references) = futures::join!(
            self.backend.get_article(title),
            self.backend.list_references(title)
        );

        let article = match settle(article, &what, "Error loading article", "Failed to load article") {
            Page::Ready(article) => article,
            Page::NotFound(what) => return Page::NotFound(what),
            Page::Failed(alert) => return Page::Failed(alert),
        };
        let Some(view) = ArticleView::new(&article, &self.base, &self.display.date_format) else {
            log::warn!("Article {title} has no current revision");
            return Page::NotFound(what);
        };

        let (references, references_alert) = match references {
            Ok(refs) => (self.reference_list(&refs, expand_references), None),
            Err(e) => {
                log::warn!("Failed to load references for {title}: {e}");
                (self.reference_list(&[], false), Some(references_alert()))
            }
        };

        Page::Ready(ArticlePage {
            view,
            references,
            references_alert,
        })
    }

    /// Revision history of an article.
    pub async fn history(&self, title: &str) -> Page<HistoryPage> {
        let display = display_title(title);
        let prefix = format!("Could not load history for article \"{display}\"");
        let result = self.backend.list_revisions(title).await;

        settle(
            result,
            &format!("Article \"{display}\""),
            "Error loading history",
            &prefix,
        )
        .map(|revisions| HistoryPage {
            entries: revisions
                .iter()
                .map(|revision| self.history_entry(title, revision))
                .collect(),
            title: display,
        })
    }

    fn history_entry(&self, title: &str, revision: &Revision) -> HistoryEntry {
        let thread = CommentThread::new(title, revision.id, revision.comments.clone());
        HistoryEntry {
            revision_id: revision.id,
            timestamp: time::format_timestamp(&revision.timestamp, &self.display.datetime_format),
            author: revision.author().to_string(),
            comment: revision.edit_comment().map(str::to_string),
            status: revision_status(revision).0,
            comments: thread.entries(self.now, &self.display.date_format),
        }
    }

    /// A revision with its diff and reviews, fetched together.
    pub async fn revision(&self, title: &str, revision_id: i64) -> Page<RevisionPage> {
        let (details, diff, reviews) = futures::join!(
            self.backend.revision_details(revision_id),
            self.backend.revision_diff(title, revision_id),
            self.backend.revision_reviews(revision_id)
        );

        let details = match settle(
            details,
            &format!("Revision #{revision_id}"),
            "Error loading revision",
            "Failed to load revision details",
        ) {
            Page::Ready(details) => details,
            Page::NotFound(what) => return Page::NotFound(what),
            Page::Failed(alert) => return Page::Failed(alert),
        };

        let diff = diff.map(DiffView::from_payload).map_err(|e| {
            log::warn!("Failed to load diff for revision {revision_id}: {e}");
            diff_alert(&e)
        });
        let reviews = reviews.map(|r| ReviewTable::new(&r)).map_err(|e| {
            log::warn!("Failed to load reviews for revision {revision_id}: {e}");
            Alert::from_error("Error loading reviews", "Failed to load peer reviews", &e)
        });

        let thread = CommentThread::new(title, revision_id, details.revision.comments.clone());
        let article_title = match non_blank(Some(details.article.title.as_str())) {
            Some(t) => display_title(t),
            None => display_title(title),
        };

        Page::Ready(RevisionPage {
            article_title,
            timestamp: time::format_timestamp(
                &details.revision.timestamp,
                &self.display.datetime_format,
            ),
            comments: thread.entries(self.now, &self.display.date_format),
            actions: details.moderation_actions,
            revision: details.revision,
            diff,
            reviews,
        })
    }

    /// Diff of a revision against its predecessor.
    pub async fn diff(&self, title: &str, revision_id: i64) -> Page<DiffPage> {
        match self.backend.revision_diff(title, revision_id).await {
            Ok(payload) => Page::Ready(DiffPage {
                title: display_title(title),
                revision_id,
                view: DiffView::from_payload(payload),
            }),
            Err(e) => {
                log::warn!("Failed to load diff for revision {revision_id}: {e}");
                Page::Failed(diff_alert(&e))
            }
        }
    }

    /// References of an article.
    pub async fn references(&self, title: &str, expanded: bool) -> Page<ReferencesPage> {
        match self.backend.list_references(title).await {
            Ok(refs) => Page::Ready(ReferencesPage {
                title: display_title(title),
                list: self.reference_list(&refs, expanded),
            }),
            Err(e) => {
                log::warn!("Failed to load references for {title}: {e}");
                Page::Failed(references_alert())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::models::{Article, DisplayConfig, RevisionDetails};
    use crate::render::Level;
    use url::Url;

    fn pages(backend: &FakeBackend) -> Pages<'_> {
        Pages::new(
            backend,
            Url::parse("http://localhost:8000/").unwrap(),
            DisplayConfig::default(),
        )
        .at(time::parse_timestamp("2024-05-02T12:00:00").unwrap())
    }

    fn article() -> Article {
        serde_json::from_str(
            r#"{"id": 1, "title": "Great_Zimbabwe", "status": "published",
                "updated_at": "2024-04-01T08:00:00",
                "currentRevision": {"id": 12, "content": "Stone city [[Image:3]]"}}"#,
        )
        .unwrap()
    }

    fn reference(n: u32, title: &str) -> Reference {
        serde_json::from_value(serde_json::json!({
            "id": n,
            "reference_number": n,
            "source": {"title": title, "source_type": "book"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_article_404_is_not_found() {
        let backend = FakeBackend::new();
        let page = pages(&backend).article("Atlantis", false).await;
        assert_eq!(page, Page::NotFound("Article \"Atlantis\"".into()));
        assert!(page.to_string().contains("does not exist"));
        assert!(!page.to_string().contains("[ERROR]"));
    }

    #[tokio::test]
    async fn test_article_without_revision_is_not_found() {
        let mut backend = FakeBackend::new();
        let mut a = article();
        a.current_revision = None;
        backend.articles.insert("Great_Zimbabwe".into(), a);
        let page = pages(&backend).article("Great_Zimbabwe", false).await;
        assert!(matches!(page, Page::NotFound(_)));
    }

    #[tokio::test]
    async fn test_article_fetches_references_together() {
        let mut backend = FakeBackend::new();
        backend.articles.insert("Great_Zimbabwe".into(), article());
        backend.references = vec![reference(2, "Shona"), reference(1, "Masonry")];

        let page = pages(&backend).article("Great_Zimbabwe", false).await;
        let view = page.ready().unwrap();
        assert_eq!(view.references.entries[0].title, "Masonry");
        assert!(view.view.body.contains("[http://localhost:8000/images/stream/3]"));

        let mut calls = backend.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec!["get_article Great_Zimbabwe", "list_references Great_Zimbabwe"]
        );
    }

    #[tokio::test]
    async fn test_reference_failure_keeps_article() {
        let mut backend = FakeBackend::new().failing("list_references", 500);
        backend.articles.insert("Great_Zimbabwe".into(), article());

        let page = pages(&backend).article("Great_Zimbabwe", false).await;
        let view = page.ready().unwrap();
        let alert = view.references_alert.as_ref().unwrap();
        assert_eq!(alert.title, "Error loading references");
        assert_eq!(alert.description, "Failed to load references");
        assert!(page.to_string().contains("Stone city"));
    }

    #[tokio::test]
    async fn test_article_server_error_is_alert() {
        let backend = FakeBackend::new().failing("get_article", 503);
        let page = pages(&backend).article("Great_Zimbabwe", false).await;
        let Page::Failed(alert) = page else {
            panic!("expected alert");
        };
        assert_eq!(alert.level, Level::Error);
    }

    #[tokio::test]
    async fn test_history_omits_empty_comment_threads() {
        let mut backend = FakeBackend::new();
        backend.revisions = serde_json::from_str(
            r#"[
                {"id": 2, "timestamp": "2024-05-02T10:00:00", "comment": "Fix dates",
                 "user": {"id": 1, "username": "amina"}, "status": "approved",
                 "comments": [{"id": 9, "content": "Thanks", "created_at": "2024-05-02T11:00:00"}]},
                {"id": 1, "timestamp": "2024-05-01T10:00:00", "comments": []}
            ]"#,
        )
        .unwrap();

        let page = pages(&backend).history("Great_Zimbabwe").await;
        let history = page.ready().unwrap();
        assert_eq!(history.entries[0].comments.len(), 1);
        assert!(history.entries[1].comments.is_empty());

        let text = page.to_string();
        assert_eq!(text.matches("Comments (").count(), 1);
        assert!(text.contains("Edited by: amina"));
        assert!(text.contains("Comment: Fix dates"));
        assert!(text.contains("Thanks"));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let backend = FakeBackend::new();
        let text = pages(&backend).history("Great_Zimbabwe").await.to_string();
        assert!(text.contains("No revision history found for this article."));
    }

    fn details() -> RevisionDetails {
        serde_json::from_str(
            r#"{"revision": {"id": 12, "content": "Stone city", "status": "pending"},
                "article": {"id": 1, "title": "Great_Zimbabwe"}}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_revision_diff_failure_is_local_alert() {
        let mut backend = FakeBackend::new().failing("revision_diff", 500);
        backend.details = Some(details());

        let page = pages(&backend).revision("Great_Zimbabwe", 12).await;
        let view = page.ready().unwrap();
        let alert = view.diff.as_ref().unwrap_err();
        assert_eq!(alert.title, "Error loading changes");
        assert_eq!(
            alert.description,
            "Failed to load revision changes: revision_diff failed"
        );

        let text = page.to_string();
        assert!(text.contains("No comments yet"));
        assert!(text.contains("No peer reviews yet."));
    }

    #[tokio::test]
    async fn test_missing_revision_is_not_found() {
        let backend = FakeBackend::new();
        let page = pages(&backend).revision("Great_Zimbabwe", 77).await;
        assert_eq!(page, Page::NotFound("Revision #77".into()));
    }

    #[tokio::test]
    async fn test_null_diff_renders_warning() {
        let mut backend = FakeBackend::new();
        backend.diff = Some(serde_json::from_str(r#"{"revision_id": 12, "diff": null}"#).unwrap());

        let page = pages(&backend).diff("Great_Zimbabwe", 12).await;
        assert_eq!(page.ready().unwrap().view, DiffView::NoDiffData);
        assert!(page.to_string().contains("[WARNING] No diff data available"));
    }

    #[tokio::test]
    async fn test_references_page_collapses() {
        let mut backend = FakeBackend::new();
        backend.references = (1..=5).map(|n| reference(n, "Source")).collect();

        let page = pages(&backend).references("Great_Zimbabwe", false).await;
        assert_eq!(page.ready().unwrap().list.visible().len(), 3);

        let page = pages(&backend).references("Great_Zimbabwe", true).await;
        assert_eq!(page.ready().unwrap().list.visible().len(), 5);
    }
}
