//! Page-level rendering: alerts and load states.

pub mod layout;

use std::fmt;

use crate::error::AppError;

/// Severity of an [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// A titled message shown in place of, or next to, page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: Level,
    pub title: String,
    pub description: String,
}

impl Alert {
    pub fn new(level: Level, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Level::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Level::Success, title, description)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Level::Warning, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Level::Error, title, description)
    }

    /// Error alert whose description is `"{prefix}: {error}"`.
    pub fn from_error(title: impl Into<String>, prefix: &str, error: &AppError) -> Self {
        Self::error(title, format!("{prefix}: {}", error.user_message()))
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.level.as_str(), self.title)?;
        if !self.description.is_empty() {
            layout::sub_item(f, &self.description)?;
        }
        Ok(())
    }
}

/// Outcome of loading one page.
#[derive(Debug, Clone, PartialEq)]
pub enum Page<T> {
    Ready(T),
    /// The requested resource does not exist
    NotFound(String),
    /// Loading failed; the alert replaces the content
    Failed(Alert),
}

impl<T> Page<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Page::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Page::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Page<U> {
        match self {
            Page::Ready(view) => Page::Ready(f(view)),
            Page::NotFound(what) => Page::NotFound(what),
            Page::Failed(alert) => Page::Failed(alert),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Page<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Ready(view) => write!(f, "{view}"),
            Page::NotFound(what) => {
                layout::header(f, "Not found")?;
                writeln!(f, "{what} does not exist.")
            }
            Page::Failed(alert) => write!(f, "{alert}"),
        }
    }
}
