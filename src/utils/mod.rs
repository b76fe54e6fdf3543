//! Utility functions and helpers.

pub mod http;
pub mod time;

use url::Url;

use crate::error::{AppError, Result};

/// Build an endpoint URL by appending percent-encoded path segments to `base`.
///
/// Titles may contain spaces, slashes or `?`, so each segment is encoded on
/// its own instead of being formatted into a path string.
pub fn endpoint<I, S>(base: &Url, segments: I) -> Result<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("base URL cannot take a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Collapse whitespace runs into single underscores, as the backend stores titles.
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Human-readable title: underscores become spaces.
pub fn display_title(title: &str) -> String {
    title.replace('_', " ")
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
