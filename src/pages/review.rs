//! Peer review, notification and "my articles" pages.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::User;
use crate::pages::{ArticleIndex, Pages, settle_alert};
use crate::render::{Alert, Page, layout};
use crate::services::{Inbox, ReviewDashboard, ReviewTable};

/// Peer reviews of one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsPage {
    pub revision_id: i64,
    pub table: ReviewTable,
}

impl fmt::Display for ReviewsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &format!("Reviews of revision #{}", self.revision_id))?;
        write!(f, "{}", self.table)
    }
}

/// Articles written by the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MyArticles {
    Listed(ArticleIndex),
    /// The server has no per-author listing
    Unsupported,
}

impl fmt::Display for MyArticles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MyArticles::Listed(index) => write!(f, "{index}"),
            MyArticles::Unsupported => {
                layout::header(f, "My Articles")?;
                write!(
                    f,
                    "{}",
                    Alert::info(
                        "Not available",
                        "This server does not support listing articles by author.",
                    )
                )
            }
        }
    }
}

fn login_required() -> Alert {
    Alert::warning(
        "Authentication Required",
        "Please log in with `afropedia login` first.",
    )
}

impl Pages<'_> {
    /// Reviews of a revision.
    pub async fn reviews(&self, revision_id: i64) -> Page<ReviewsPage> {
        let result = self.backend.revision_reviews(revision_id).await;
        settle_alert(result, "Error loading reviews", "Failed to load peer reviews").map(
            |reviews| ReviewsPage {
                revision_id,
                table: ReviewTable::new(&reviews),
            },
        )
    }

    /// Reviews assigned to the current user.
    pub async fn review_dashboard(&self, user: Option<&User>) -> Page<ReviewDashboard> {
        let Some(user) = user else {
            return Page::Failed(login_required());
        };
        let result = self.backend.reviewer_reviews(user.id).await;
        settle_alert(result, "Error", "Failed to load peer review data")
            .map(|reviews| ReviewDashboard::new(user.display_name(), &reviews))
    }

    /// Notification inbox of the current user.
    pub async fn notifications(&self, user: Option<&User>, unread_only: bool) -> Page<Inbox> {
        if user.is_none() {
            return Page::Failed(login_required());
        }
        let received = DateTime::<Utc>::from_naive_utc_and_offset(self.now, Utc).to_rfc3339();
        let result = self.backend.review_notifications().await;
        settle_alert(
            result,
            "Error loading notifications",
            "Failed to fetch notifications",
        )
        .map(|feed| Inbox::from_feed(feed, &received).unread_only(unread_only))
    }

    /// Articles by the current user.
    ///
    /// Asks the server's per-author endpoint and never filters the global
    /// list. A 404 or 405 means the server does not offer it.
    pub async fn my_articles(&self, user: Option<&User>) -> Page<MyArticles> {
        let Some(user) = user else {
            return Page::Failed(login_required());
        };

        match self.backend.user_articles(user.id).await {
            Ok(articles) => Page::Ready(MyArticles::Listed(ArticleIndex {
                heading: format!("Articles by {}", user.display_name()),
                articles,
                date_format: self.display.date_format.clone(),
            })),
            Err(e) if matches!(e, AppError::NotFound(_)) || e.status() == Some(405) => {
                log::info!("Server has no per-author article listing: {e}");
                Page::Ready(MyArticles::Unsupported)
            }
            Err(e) => {
                log::warn!("Failed to load articles of user {}: {e}", user.id);
                Page::Failed(Alert::from_error(
                    "Error loading articles",
                    "Could not load your articles",
                    &e,
                ))
            }
        }
    }
}
