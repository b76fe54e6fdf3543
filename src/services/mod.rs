//! View models and form workflows.
//!
//! This module contains the client-side logic for:
//! - Reference formatting (`ReferenceList`)
//! - Revision diffs (`DiffView`)
//! - Comment threads (`CommentThread`)
//! - Moderation badges and flags (`FlagForm`)
//! - Peer reviews (`ReviewForm`, `ReviewTable`, `ReviewDashboard`)
//! - The book library (`BookForm`)
//! - Notifications (`Inbox`)
//! - Article bodies (`ArticleView`)

pub mod citation;
pub mod comments;
pub mod content;
pub mod diff;
pub mod library;
pub mod moderation;
pub mod notifications;
pub mod review;

pub use citation::{ReferenceList, format_reference};
pub use comments::CommentThread;
pub use content::{ArticleForm, ArticleView};
pub use diff::DiffView;
pub use library::{BookDetail, BookForm, BookList};
pub use moderation::{FlagForm, FlagType, decide_revision, status_badge};
pub use notifications::Inbox;
pub use review::{CompletionForm, ReviewDashboard, ReviewForm, ReviewTable};
