//! Data access for the Afropedia REST backend.
//!
//! Every endpoint the client uses is declared once on [`Backend`]. Pages and
//! view models only see the trait, so tests can swap in a recording fake.
//!
//! ```text
//! pages::*  ──►  dyn Backend  ──►  HttpBackend  ──►  reqwest  ──►  REST API
//! ```

pub mod http;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Article, ArticleCreate, ArticleSummary, ArticleUpdate, Book, BookPayload, CommentPosted,
    FlagRequest, LoginResponse, ModerationDecision, NotificationFeed, PeerReview, Reference,
    Revision, RevisionDetails, RevisionDiff, ReviewCompletion, ReviewSubmission, SearchHit, User,
    Verdict,
};

// Re-export for convenience
pub use http::HttpBackend;

/// Typed access to every backend endpoint.
#[async_trait]
pub trait Backend: Send + Sync {
    // --- Auth ---

    /// `POST /auth/login`
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse>;

    /// `GET /auth/profile`
    async fn profile(&self) -> Result<User>;

    // --- Articles ---

    /// `GET /articles`
    async fn list_articles(&self) -> Result<Vec<ArticleSummary>>;

    /// `GET /articles/{title}`
    async fn get_article(&self, title: &str) -> Result<Article>;

    /// `POST /articles`
    async fn create_article(&self, article: &ArticleCreate) -> Result<Article>;

    /// `PATCH /articles/{title}`; creates a new revision.
    async fn update_article(&self, title: &str, update: &ArticleUpdate) -> Result<Article>;

    /// `GET /articles/user/{user_id}`
    async fn user_articles(&self, user_id: i64) -> Result<Vec<ArticleSummary>>;

    // --- Revisions ---

    /// `GET /articles/{title}/revisions`
    async fn list_revisions(&self, title: &str) -> Result<Vec<Revision>>;

    /// `GET /articles/{title}/revisions/{id}/diff`; `None` when the body is `null`.
    async fn revision_diff(&self, title: &str, revision_id: i64) -> Result<Option<RevisionDiff>>;

    /// `GET /articles/revisions/{id}/details`
    async fn revision_details(&self, revision_id: i64) -> Result<RevisionDetails>;

    /// `PATCH /articles/{title}/revisions/{id}` with `{"comment": text}`
    async fn add_comment(&self, title: &str, revision_id: i64, text: &str)
    -> Result<CommentPosted>;

    /// `GET /articles/{title}/references`
    async fn list_references(&self, title: &str) -> Result<Vec<Reference>>;

    /// `GET /search/results?q=`; full-text search over current revisions.
    async fn search_articles(&self, query: &str) -> Result<Vec<SearchHit>>;

    // --- Library ---

    /// `GET /books`, with `?search=` when a query is given.
    async fn list_books(&self, search: Option<&str>) -> Result<Vec<Book>>;

    /// `GET /books/{id}`
    async fn get_book(&self, id: i64) -> Result<Book>;

    /// `POST /books`
    async fn create_book(&self, book: &BookPayload) -> Result<Book>;

    /// `PATCH /books/{id}`
    async fn update_book(&self, id: i64, book: &BookPayload) -> Result<Book>;

    // --- Moderation ---

    /// `POST /moderation/flag`
    async fn flag_content(&self, flag: &FlagRequest) -> Result<()>;

    /// `POST /moderation/approve` or `POST /moderation/reject`
    async fn decide(&self, verdict: Verdict, decision: &ModerationDecision) -> Result<()>;

    /// `GET /moderation/reviews/revision/{id}`
    async fn revision_reviews(&self, revision_id: i64) -> Result<Vec<PeerReview>>;

    /// `GET /moderation/reviews/reviewer/{id}`
    async fn reviewer_reviews(&self, reviewer_id: i64) -> Result<Vec<PeerReview>>;

    /// `POST /moderation/reviews`
    async fn submit_review(&self, review: &ReviewSubmission) -> Result<()>;

    /// `POST /moderation/complete-review/{id}` with query parameters
    async fn complete_review(&self, review_id: i64, completion: &ReviewCompletion) -> Result<()>;

    // --- Notifications ---

    /// `GET /peer-review/notifications`
    async fn review_notifications(&self) -> Result<NotificationFeed>;
}
