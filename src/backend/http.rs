//! reqwest implementation of [`Backend`].
//!
//! Non-success statuses become [`AppError::NotFound`], [`AppError::Unauthorized`]
//! or [`AppError::Api`] with the message the backend put in its body. Bodies
//! that fail to decode become [`AppError::InvalidData`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::{
    Article, ArticleCreate, ArticleSummary, ArticleUpdate, Book, BookPayload, CommentPosted,
    Config, FlagRequest, LoginRequest, LoginResponse, ModerationDecision, NotificationFeed,
    PeerReview, Reference, Revision, RevisionDetails, RevisionDiff, ReviewCompletion,
    ReviewSubmission, SearchHit, User, Verdict,
};
use crate::session::Session;
use crate::utils::{endpoint, http::create_client};

/// HTTP client for the Afropedia REST API.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    session: Option<Session>,
}

impl HttpBackend {
    /// Create a backend over an existing client. `base` must end with a slash.
    pub fn new(client: reqwest::Client, base: Url, session: Option<Session>) -> Self {
        Self {
            client,
            base,
            session,
        }
    }

    /// Create a backend from configuration and an optional logged-in session.
    pub fn from_config(config: &Config, session: Option<Session>) -> Result<Self> {
        let client = create_client(&config.api)?;
        Ok(Self::new(client, config.base_url()?, session))
    }

    /// Base URL requests are built from.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn url<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        endpoint(&self.base, segments)
    }

    /// Start a request, attaching the bearer token when logged in.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.session {
            Some(session) => builder.bearer_auth(&session.token),
            None => builder,
        }
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, context: &str) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(error_for_status(status, &body, context));
        }
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_data(context, e))
    }

    /// Send a request whose response body is not needed.
    async fn send_unit(&self, builder: RequestBuilder, context: &str) -> Result<()> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(error_for_status(status, &body, context));
        }
        Ok(())
    }
}

/// Map a non-success response to an error carrying the backend's message.
pub(crate) fn error_for_status(status: StatusCode, body: &[u8], context: &str) -> AppError {
    let message = extract_message(body).unwrap_or_else(|| {
        format!(
            "{} failed: {}",
            context,
            status.canonical_reason().unwrap_or("unexpected status")
        )
    });
    log::debug!("{} returned {}: {}", context, status, message);

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        other => AppError::api(other.as_u16(), message),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `detail` (string, or a list of `{msg}` validation entries),
/// then `message`, then `error.message`.
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => {
            return Some(detail.clone());
        }
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.pointer("/error/message").and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            login_identifier: identifier.to_string(),
            password: password.to_string(),
        };
        let url = self.url(["auth", "login"])?;
        self.send(self.request(Method::POST, url).json(&body), "login")
            .await
    }

    async fn profile(&self) -> Result<User> {
        let url = self.url(["auth", "profile"])?;
        self.send(self.request(Method::GET, url), "profile").await
    }

    async fn list_articles(&self) -> Result<Vec<ArticleSummary>> {
        let url = self.url(["articles", ""])?;
        self.send(self.request(Method::GET, url), "article list")
            .await
    }

    async fn get_article(&self, title: &str) -> Result<Article> {
        let url = self.url(["articles", title])?;
        self.send(self.request(Method::GET, url), "article").await
    }

    async fn create_article(&self, article: &ArticleCreate) -> Result<Article> {
        let url = self.url(["articles", ""])?;
        self.send(
            self.request(Method::POST, url).json(article),
            "create article",
        )
        .await
    }

    async fn update_article(&self, title: &str, update: &ArticleUpdate) -> Result<Article> {
        let url = self.url(["articles", title])?;
        self.send(
            self.request(Method::PATCH, url).json(update),
            "update article",
        )
        .await
    }

    async fn user_articles(&self, user_id: i64) -> Result<Vec<ArticleSummary>> {
        let id = user_id.to_string();
        let url = self.url(["articles", "user", id.as_str()])?;
        self.send(self.request(Method::GET, url), "user articles")
            .await
    }

    async fn list_revisions(&self, title: &str) -> Result<Vec<Revision>> {
        let url = self.url(["articles", title, "revisions"])?;
        self.send(self.request(Method::GET, url), "revision history")
            .await
    }

    async fn revision_diff(&self, title: &str, revision_id: i64) -> Result<Option<RevisionDiff>> {
        let id = revision_id.to_string();
        let url = self.url(["articles", title, "revisions", id.as_str(), "diff"])?;
        self.send(self.request(Method::GET, url), "revision diff")
            .await
    }

    async fn revision_details(&self, revision_id: i64) -> Result<RevisionDetails> {
        let id = revision_id.to_string();
        let url = self.url(["articles", "revisions", id.as_str(), "details"])?;
        self.send(self.request(Method::GET, url), "revision details")
            .await
    }

    async fn add_comment(
        &self,
        title: &str,
        revision_id: i64,
        text: &str,
    ) -> Result<CommentPosted> {
        let id = revision_id.to_string();
        let url = self.url(["articles", title, "revisions", id.as_str()])?;
        self.send(
            self.request(Method::PATCH, url)
                .json(&json!({ "comment": text })),
            "add comment",
        )
        .await
    }

    async fn list_references(&self, title: &str) -> Result<Vec<Reference>> {
        let url = self.url(["articles", title, "references"])?;
        self.send(self.request(Method::GET, url), "references")
            .await
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<SearchHit>> {
        let mut url = self.url(["search", "results"])?;
        url.query_pairs_mut().append_pair("q", query.trim());
        self.send(self.request(Method::GET, url), "search").await
    }

    async fn list_books(&self, search: Option<&str>) -> Result<Vec<Book>> {
        let mut url = self.url(["books", ""])?;
        if let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("search", query);
        }
        self.send(self.request(Method::GET, url), "book list").await
    }

    async fn get_book(&self, id: i64) -> Result<Book> {
        let id = id.to_string();
        let url = self.url(["books", id.as_str()])?;
        self.send(self.request(Method::GET, url), "book").await
    }

    async fn create_book(&self, book: &BookPayload) -> Result<Book> {
        let url = self.url(["books", ""])?;
        self.send(self.request(Method::POST, url).json(book), "create book")
            .await
    }

    async fn update_book(&self, id: i64, book: &BookPayload) -> Result<Book> {
        let id = id.to_string();
        let url = self.url(["books", id.as_str()])?;
        self.send(self.request(Method::PATCH, url).json(book), "update book")
            .await
    }

    async fn flag_content(&self, flag: &FlagRequest) -> Result<()> {
        let url = self.url(["moderation", "flag"])?;
        self.send_unit(self.request(Method::POST, url).json(flag), "flag content")
            .await
    }

    async fn decide(&self, verdict: Verdict, decision: &ModerationDecision) -> Result<()> {
        let url = self.url(["moderation", verdict.endpoint()])?;
        self.send_unit(
            self.request(Method::POST, url).json(decision),
            verdict.endpoint(),
        )
        .await
    }

    async fn revision_reviews(&self, revision_id: i64) -> Result<Vec<PeerReview>> {
        let id = revision_id.to_string();
        let url = self.url(["moderation", "reviews", "revision", id.as_str()])?;
        self.send(self.request(Method::GET, url), "peer reviews")
            .await
    }

    async fn reviewer_reviews(&self, reviewer_id: i64) -> Result<Vec<PeerReview>> {
        let id = reviewer_id.to_string();
        let url = self.url(["moderation", "reviews", "reviewer", id.as_str()])?;
        self.send(self.request(Method::GET, url), "reviewer reviews")
            .await
    }

    async fn submit_review(&self, review: &ReviewSubmission) -> Result<()> {
        let url = self.url(["moderation", "reviews"])?;
        self.send_unit(
            self.request(Method::POST, url).json(review),
            "submit review",
        )
        .await
    }

    async fn complete_review(&self, review_id: i64, completion: &ReviewCompletion) -> Result<()> {
        let id = review_id.to_string();
        let url = self.url(["moderation", "complete-review", id.as_str()])?;
        self.send_unit(
            self.request(Method::POST, url).query(completion),
            "complete review",
        )
        .await
    }

    async fn review_notifications(&self) -> Result<NotificationFeed> {
        let url = self.url(["peer-review", "notifications"])?;
        self.send(self.request(Method::GET, url), "notifications")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned response and hand back the raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });
        let base = Url::parse(&format!("http://{addr}/")).unwrap();
        (base, handle)
    }

    /// Read headers, then as many body bytes as `content-length` announces.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= split + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn session() -> Session {
        Session::new(
            "secret-token",
            User {
                id: 1,
                username: "amina".into(),
                email: String::new(),
                role: None,
                is_active: None,
            },
        )
    }

    #[test]
    fn test_extract_message_shapes() {
        assert_eq!(
            extract_message(br#"{"detail": "Article 'X' not found."}"#).as_deref(),
            Some("Article 'X' not found.")
        );
        assert_eq!(
            extract_message(br#"{"detail": [{"msg": "field required"}, {"msg": "too short"}]}"#)
                .as_deref(),
            Some("field required; too short")
        );
        assert_eq!(
            extract_message(br#"{"error": {"message": "boom"}}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(extract_message(b"<html>oops</html>"), None);
    }

    #[test]
    fn test_error_for_status_variants() {
        let err = error_for_status(StatusCode::NOT_FOUND, b"{}", "article");
        assert!(matches!(err, AppError::NotFound(_)));

        let err = error_for_status(StatusCode::UNAUTHORIZED, b"{}", "profile");
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = error_for_status(
            StatusCode::BAD_REQUEST,
            br#"{"detail": "Comment content is required."}"#,
            "add comment",
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message(), "Comment content is required.");
    }

    #[tokio::test]
    async fn test_get_article_404_is_not_found() {
        let (base, server) =
            serve_once("404 Not Found", r#"{"detail": "Article 'Nope' not found."}"#).await;
        let backend = HttpBackend::new(reqwest::Client::new(), base, None);

        let err = backend.get_article("Nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Article 'Nope' not found."));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /articles/Nope "));
    }

    #[tokio::test]
    async fn test_bearer_token_and_comment_body() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"message": "Comment added successfully", "comment": {"id": 3, "content": "Nice", "created_at": "2024-01-01T00:00:00"}}"#,
        )
        .await;
        let backend = HttpBackend::new(reqwest::Client::new(), base, Some(session()));

        let posted = backend.add_comment("Great Zimbabwe", 12, "Nice").await.unwrap();
        assert_eq!(posted.into_comment().unwrap().id, 3);

        let request = server.await.unwrap();
        assert!(request.starts_with("PATCH /articles/Great%20Zimbabwe/revisions/12 "));
        assert!(request.to_lowercase().contains("authorization: bearer secret-token"));
        assert!(request.contains(r#"{"comment":"Nice"}"#));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_data() {
        let (base, server) = serve_once("200 OK", r#"{"unexpected": true}"#).await;
        let backend = HttpBackend::new(reqwest::Client::new(), base, None);

        let err = backend.list_references("Mali_Empire").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidData(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_search_sends_encoded_query() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "title": "Great_Zimbabwe", "rank": 0.8, "snippet": "**Great** walls"}]"#,
        )
        .await;
        let backend = HttpBackend::new(reqwest::Client::new(), base, None);

        let hits = backend.search_articles(" stone walls ").await.unwrap();
        assert_eq!(hits[0].title, "Great_Zimbabwe");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /search/results?q=stone+walls "));
    }

    #[tokio::test]
    async fn test_complete_review_uses_query_params() {
        let (base, server) = serve_once("200 OK", r#"{"message": "ok"}"#).await;
        let backend = HttpBackend::new(reqwest::Client::new(), base, None);

        let completion = ReviewCompletion {
            status: crate::models::ReviewStatus::NeedsChanges,
            score: 2,
            feedback: "More sources".into(),
        };
        backend.complete_review(8, &completion).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "POST /moderation/complete-review/8?status=needs_changes&score=2&feedback=More+sources "
        ));
    }
}
