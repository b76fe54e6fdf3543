//! Revision comment threads.

use std::fmt;

use chrono::NaiveDateTime;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::Comment;
use crate::render::layout;
use crate::utils::time;

/// A comment prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub author: String,
    /// "Just now", "5h ago", "3d ago" or a date
    pub relative: String,
    pub date: String,
    pub content: String,
}

impl CommentEntry {
    pub fn new(comment: &Comment, now: NaiveDateTime, date_format: &str) -> Self {
        Self {
            author: comment.author().to_string(),
            relative: time::time_ago(&comment.created_at, now, date_format),
            date: time::format_timestamp(&comment.created_at, date_format),
            content: comment.content.clone(),
        }
    }
}

impl fmt::Display for CommentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | {} | {}", self.author, self.relative, self.date)?;
        for line in self.content.lines() {
            layout::sub_item(f, line)?;
        }
        Ok(())
    }
}

/// Comments on one revision, with local append after a successful post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    title: String,
    revision_id: i64,
    comments: Vec<Comment>,
}

impl CommentThread {
    pub fn new(title: impl Into<String>, revision_id: i64, comments: Vec<Comment>) -> Self {
        Self {
            title: title.into(),
            revision_id,
            comments,
        }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Post a comment and append it locally.
    ///
    /// A blank draft is rejected without contacting the backend.
    pub async fn submit(&mut self, backend: &dyn Backend, draft: &str) -> Result<&Comment> {
        let text = draft.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }

        let posted = backend
            .add_comment(&self.title, self.revision_id, text)
            .await?;
        let mut comment = posted.into_comment().ok_or_else(|| {
            AppError::invalid_data("add comment", "response carried no comment")
        })?;
        if comment.content.trim().is_empty() {
            comment.content = text.to_string();
        }

        log::info!(
            "Added comment {} to revision {}",
            comment.id,
            self.revision_id
        );
        self.comments.push(comment);
        Ok(&self.comments[self.comments.len() - 1])
    }

    /// Display entries, oldest first.
    pub fn entries(&self, now: NaiveDateTime, date_format: &str) -> Vec<CommentEntry> {
        self.comments
            .iter()
            .map(|c| CommentEntry::new(c, now, date_format))
            .collect()
    }
}

/// Write a "Comments (n)" block. With no comments, writes `empty_text` if
/// given and nothing otherwise.
pub fn write_thread(
    out: &mut impl fmt::Write,
    entries: &[CommentEntry],
    empty_text: Option<&str>,
) -> fmt::Result {
    if entries.is_empty() {
        if let Some(text) = empty_text {
            layout::section(out, "Comments (0)")?;
            writeln!(out, "{text}")?;
        }
        return Ok(());
    }

    layout::section(out, &format!("Comments ({})", entries.len()))?;
    for entry in entries {
        write!(out, "{entry}")?;
    }
    Ok(())
}
