// src/models/mod.rs

//! Data transfer objects for the Afropedia backend.
//!
//! Every response and request shape is declared once here and shared by the
//! backend client, the view models and the CLI.

mod article;
mod book;
mod config;
mod diff;
mod moderation;
mod notification;
mod reference;
mod review;
mod search;
mod user;

// Re-export all public types
pub use article::{
    Article, ArticleCreate, ArticleSummary, ArticleUpdate, Comment, CommentPosted, Revision,
};
pub use book::{Book, BookPayload};
pub use config::{API_URL_ENV, ApiConfig, Config, DisplayConfig, SessionConfig};
pub use diff::{DiffData, DiffStatistics, DiffSummary, RevisionDiff, RevisionStamp};
pub use moderation::{
    ArticleRef, FlagRequest, ModerationAction, ModerationDecision, RevisionDetails, Verdict,
};
pub use notification::{Notification, NotificationFeed, NotificationKind, ReviewNotice};
pub use reference::{Reference, Source, SourceType};
pub use review::{PeerReview, ReviewCompletion, ReviewStatus, ReviewSubmission};
pub use search::SearchHit;
pub use user::{LoginRequest, LoginResponse, User, UserRef};
