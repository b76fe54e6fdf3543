//! In-memory [`Backend`] for tests.
//!
//! Serves canned data, records every call, and can be told to fail a given
//! method with an HTTP status.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::{
    Article, ArticleCreate, ArticleSummary, ArticleUpdate, Book, BookPayload, Comment,
    CommentPosted, FlagRequest, LoginResponse, ModerationDecision, NotificationFeed, PeerReview,
    Reference, Revision, RevisionDetails, RevisionDiff, ReviewCompletion, ReviewSubmission,
    SearchHit, User, Verdict,
};

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    failures: HashMap<&'static str, u16>,
    pub user: Option<User>,
    pub articles: HashMap<String, Article>,
    pub summaries: Vec<ArticleSummary>,
    /// `None` makes `user_articles` answer 404
    pub user_articles: Option<Vec<ArticleSummary>>,
    pub revisions: Vec<Revision>,
    pub diff: Option<RevisionDiff>,
    pub details: Option<RevisionDetails>,
    pub references: Vec<Reference>,
    pub hits: Vec<SearchHit>,
    pub books: Vec<Book>,
    pub reviews: Vec<PeerReview>,
    pub feed: NotificationFeed,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `method` fail with `status`.
    pub fn failing(mut self, method: &'static str, status: u16) -> Self {
        self.failures.insert(method, status);
        self
    }

    /// Every call made so far, as `"method args"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, args: impl AsRef<str>) -> Result<()> {
        let args = args.as_ref();
        let entry = if args.is_empty() {
            method.to_string()
        } else {
            format!("{method} {args}")
        };
        self.calls.lock().unwrap().push(entry);

        match self.failures.get(method) {
            Some(404) => Err(AppError::NotFound(format!("{method}: not found"))),
            Some(401) => Err(AppError::Unauthorized(format!("{method}: unauthorized"))),
            Some(&status) => Err(AppError::api(status, format!("{method} failed"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, identifier: &str, _password: &str) -> Result<LoginResponse> {
        self.record("login", identifier)?;
        let user = self
            .user
            .clone()
            .ok_or_else(|| AppError::Unauthorized("Incorrect username or password".into()))?;
        Ok(LoginResponse {
            access_token: "fake-token".into(),
            user,
        })
    }

    async fn profile(&self) -> Result<User> {
        self.record("profile", "")?;
        self.user
            .clone()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))
    }

    async fn list_articles(&self) -> Result<Vec<ArticleSummary>> {
        self.record("list_articles", "")?;
        Ok(self.summaries.clone())
    }

    async fn get_article(&self, title: &str) -> Result<Article> {
        self.record("get_article", title)?;
        self.articles
            .get(title)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Article '{title}' not found.")))
    }

    async fn create_article(&self, article: &ArticleCreate) -> Result<Article> {
        self.record("create_article", &article.title)?;
        Ok(Article {
            id: 100,
            title: article.title.clone(),
            status: Some("draft".into()),
            is_featured: false,
            view_count: 0,
            revision_count: Some(1),
            created_at: String::new(),
            updated_at: String::new(),
            current_revision_id: None,
            current_revision: None,
            revisions: Vec::new(),
        })
    }

    async fn update_article(&self, title: &str, update: &ArticleUpdate) -> Result<Article> {
        self.record("update_article", title)?;
        let mut article = self
            .articles
            .get(title)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Article '{title}' not found.")))?;
        if let Some(revision) = article.current_revision.as_mut() {
            revision.content = update.content.clone();
        }
        Ok(article)
    }

    async fn user_articles(&self, user_id: i64) -> Result<Vec<ArticleSummary>> {
        self.record("user_articles", user_id.to_string())?;
        self.user_articles
            .clone()
            .ok_or_else(|| AppError::NotFound("Not Found".into()))
    }

    async fn list_revisions(&self, title: &str) -> Result<Vec<Revision>> {
        self.record("list_revisions", title)?;
        Ok(self.revisions.clone())
    }

    async fn revision_diff(&self, title: &str, revision_id: i64) -> Result<Option<RevisionDiff>> {
        self.record("revision_diff", format!("{title} {revision_id}"))?;
        Ok(self.diff.clone())
    }

    async fn revision_details(&self, revision_id: i64) -> Result<RevisionDetails> {
        self.record("revision_details", revision_id.to_string())?;
        self.details
            .clone()
            .ok_or_else(|| AppError::NotFound("Revision not found.".into()))
    }

    async fn add_comment(
        &self,
        title: &str,
        revision_id: i64,
        text: &str,
    ) -> Result<CommentPosted> {
        self.record("add_comment", format!("{title} {revision_id} {text}"))?;
        Ok(CommentPosted::Wrapped {
            comment: Comment {
                id: 500,
                content: text.to_string(),
                user_id: self.user.as_ref().map(|u| u.id),
                created_at: "2024-01-01T00:00:00".into(),
                user: None,
            },
        })
    }

    async fn list_references(&self, title: &str) -> Result<Vec<Reference>> {
        self.record("list_references", title)?;
        Ok(self.references.clone())
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.record("search_articles", query)?;
        Ok(self.hits.clone())
    }

    async fn list_books(&self, search: Option<&str>) -> Result<Vec<Book>> {
        self.record("list_books", search.unwrap_or_default())?;
        Ok(self.books.clone())
    }

    async fn get_book(&self, id: i64) -> Result<Book> {
        self.record("get_book", id.to_string())?;
        self.books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".into()))
    }

    async fn create_book(&self, book: &BookPayload) -> Result<Book> {
        self.record("create_book", &book.title)?;
        Ok(Book {
            id: 900,
            title: book.title.clone(),
            author: book.author.clone(),
            publication_date: book.publication_date.clone(),
            description: book.description.clone(),
            cover_image: book.cover_image.clone(),
            isbn: book.isbn.clone(),
            genre: None,
            created_at: None,
            updated_at: None,
        })
    }

    async fn update_book(&self, id: i64, book: &BookPayload) -> Result<Book> {
        self.record("update_book", format!("{id} {}", book.title))?;
        let mut existing = self.get_book(id).await?;
        existing.title = book.title.clone();
        existing.author = book.author.clone();
        Ok(existing)
    }

    async fn flag_content(&self, flag: &FlagRequest) -> Result<()> {
        self.record(
            "flag_content",
            format!("{} {} {}", flag.content_type, flag.content_id, flag.flag_type),
        )
    }

    async fn decide(&self, verdict: Verdict, decision: &ModerationDecision) -> Result<()> {
        self.record(
            "decide",
            format!(
                "{} {} {}",
                verdict.endpoint(),
                decision.content_id,
                decision.reason
            ),
        )
    }

    async fn revision_reviews(&self, revision_id: i64) -> Result<Vec<PeerReview>> {
        self.record("revision_reviews", revision_id.to_string())?;
        Ok(self.reviews.clone())
    }

    async fn reviewer_reviews(&self, reviewer_id: i64) -> Result<Vec<PeerReview>> {
        self.record("reviewer_reviews", reviewer_id.to_string())?;
        Ok(self.reviews.clone())
    }

    async fn submit_review(&self, review: &ReviewSubmission) -> Result<()> {
        self.record(
            "submit_review",
            format!("{} {} {}", review.revision_id, review.status, review.score),
        )
    }

    async fn complete_review(&self, review_id: i64, completion: &ReviewCompletion) -> Result<()> {
        self.record(
            "complete_review",
            format!("{review_id} {} {}", completion.status, completion.score),
        )
    }

    async fn review_notifications(&self) -> Result<NotificationFeed> {
        self.record("review_notifications", "")?;
        Ok(self.feed.clone())
    }
}
