//! Page loaders.
//!
//! Each loader fetches what one screen needs from the [`Backend`], issuing
//! independent requests together, and settles every outcome into a
//! [`Page`]: a ready view, a not-found state, or an alert. Loaders never
//! return `Err`; a failed load is itself something to display.

pub mod article;
pub mod library;
pub mod review;
pub mod search;

use chrono::{NaiveDateTime, Utc};
use url::Url;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::DisplayConfig;
use crate::render::{Alert, Page};

pub use article::{ArticleIndex, ArticlePage, DiffPage, HistoryPage, ReferencesPage, RevisionPage};
pub use review::{MyArticles, ReviewsPage};
pub use search::SearchPage;

/// Loads pages from one backend with one set of display preferences.
pub struct Pages<'a> {
    backend: &'a dyn Backend,
    base: Url,
    display: DisplayConfig,
    now: NaiveDateTime,
}

impl<'a> Pages<'a> {
    /// `base` is the backend base URL, used for media stream links.
    pub fn new(backend: &'a dyn Backend, base: Url, display: DisplayConfig) -> Self {
        Self {
            backend,
            base,
            display,
            now: Utc::now().naive_utc(),
        }
    }

    /// Fix the clock used for relative times.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }
}

/// Settle a fetch result. A 404 becomes `NotFound(what)`; any other error
/// becomes an error alert titled `title` with `prefix` before the message.
pub(crate) fn settle<T>(result: Result<T>, what: &str, title: &str, prefix: &str) -> Page<T> {
    match result {
        Ok(value) => Page::Ready(value),
        Err(AppError::NotFound(detail)) => {
            log::debug!("{what} not found: {detail}");
            Page::NotFound(what.to_string())
        }
        Err(e) => {
            log::warn!("{prefix}: {e}");
            Page::Failed(Alert::from_error(title, prefix, &e))
        }
    }
}

/// Like [`settle`], but 404 is an error too.
pub(crate) fn settle_alert<T>(result: Result<T>, title: &str, prefix: &str) -> Page<T> {
    match result {
        Ok(value) => Page::Ready(value),
        Err(e) => {
            log::warn!("{prefix}: {e}");
            Page::Failed(Alert::from_error(title, prefix, &e))
        }
    }
}
