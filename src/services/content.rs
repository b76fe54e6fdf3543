//! Article body preprocessing and the article view.
//!
//! Stored content is markdown with a few wiki extensions. Before display the
//! extensions are rewritten to plain text and embedded HTML is reduced to
//! its text, so the terminal only ever sees markdown.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::{Article, ArticleCreate, ArticleUpdate};
use crate::render::{Alert, layout};
use crate::services::moderation::{StatusBadge, status_badge};
use crate::utils::{display_title, non_blank, normalize_title, time};

static FOOTNOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^([^\]\s]+)\]").expect("valid regex"));

static MEDIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(Image|Video|Audio):\s*([^\]\s]+)\s*\]\]").expect("valid regex")
});

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]|]+?)(?:\|([^\]]+))?\]\]").expect("valid regex")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("valid regex"));

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|tr|blockquote|h[1-6])>").expect("valid regex")
});

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").expect("valid regex"));

/// Stream path for an embedded media kind.
fn stream_path(kind: &str) -> &'static str {
    match kind {
        "Video" => "videos",
        "Audio" => "music",
        _ => "images",
    }
}

/// Rewrite stored article markdown for terminal display.
pub fn preprocess(markdown: &str, base: &Url) -> String {
    let text = strip_html(markdown);
    let text = FOOTNOTE.replace_all(&text, "[$1]");

    let root = base.as_str().trim_end_matches('/');
    let text = MEDIA.replace_all(&text, |caps: &regex::Captures| {
        format!("[{root}/{}/stream/{}]", stream_path(&caps[1]), &caps[2])
    });

    WIKILINK
        .replace_all(&text, |caps: &regex::Captures| match caps.get(2) {
            Some(label) => label.as_str().trim().to_string(),
            None => display_title(caps[1].trim()),
        })
        .into_owned()
}

/// Reduce embedded HTML to its text. Text without tags is returned as is.
pub fn strip_html(text: &str) -> String {
    if !HTML_TAG.is_match(text) {
        return text.to_string();
    }

    let spaced = BLOCK_END.replace_all(text, "$0\n");
    let fragment = Html::parse_fragment(&spaced);

    let mut out = String::with_capacity(text.len());
    for node in fragment.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style"));
        if !hidden {
            out.push_str(chunk);
        }
    }
    out
}

/// A heading in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
    pub id: String,
}

/// Lowercased words joined by hyphens.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .unicode_words()
        .collect::<Vec<_>>()
        .join("-")
}

/// Collect `#`..`######` headings outside fenced code blocks.
///
/// Repeated slugs get `-1`, `-2` suffixes so ids stay unique.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut in_fence = false;
    let mut headings = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let Some(caps) = HEADING.captures(line) else {
            continue;
        };

        let text = caps[2].to_string();
        let base = slugify(&text);
        let n = seen.entry(base.clone()).or_insert(0);
        let id = if *n == 0 { base } else { format!("{base}-{n}") };
        *n += 1;

        headings.push(Heading {
            level: caps[1].len(),
            text,
            id,
        });
    }
    headings
}

/// The article page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub title: String,
    pub status: Option<StatusBadge>,
    pub is_featured: bool,
    pub view_count: u64,
    pub author: String,
    pub updated: String,
    pub revision_id: i64,
    pub toc: Vec<Heading>,
    pub body: String,
}

impl ArticleView {
    /// `None` when the article has no current revision to show.
    pub fn new(article: &Article, base: &Url, date_format: &str) -> Option<Self> {
        let revision = article.current_revision.as_ref()?;
        let body = preprocess(&revision.content, base);
        let updated = non_blank(Some(article.updated_at.as_str()))
            .unwrap_or(revision.timestamp.as_str());

        Some(Self {
            title: display_title(&article.title),
            status: non_blank(article.status.as_deref()).map(status_badge),
            is_featured: article.is_featured,
            view_count: article.view_count,
            author: revision.author().to_string(),
            updated: time::format_timestamp(updated, date_format),
            revision_id: revision.id,
            toc: extract_headings(&body),
            body,
        })
    }
}

impl fmt::Display for ArticleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &self.title)?;

        let mut meta = format!(
            "Last edited by {} on {} | {} | revision #{}",
            self.author,
            self.updated,
            layout::count(self.view_count as usize, "view"),
            self.revision_id
        );
        if self.is_featured {
            meta.push_str(" | ");
            meta.push_str(&layout::badge("Featured"));
        }
        writeln!(f, "{meta}")?;
        if let Some(status) = &self.status {
            writeln!(f, "Status: {status}")?;
        }

        if !self.toc.is_empty() {
            layout::section(f, "Contents")?;
            for heading in &self.toc {
                let indent = "  ".repeat(heading.level.saturating_sub(1));
                writeln!(f, "{indent}{} (#{})", heading.text, heading.id)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", self.body.trim_end())
    }
}

/// Article create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    /// Edit summary; optional
    pub comment: String,
}

impl ArticleForm {
    fn checked_content(&self) -> Result<String> {
        if self.content.trim().is_empty() {
            return Err(AppError::validation("Content cannot be empty"));
        }
        Ok(self.content.clone())
    }

    fn comment(&self) -> Option<String> {
        non_blank(Some(self.comment.as_str())).map(str::to_string)
    }

    /// Validate and publish a new article. The title is normalized first.
    pub async fn create(&self, backend: &dyn Backend) -> Result<(Article, Alert)> {
        let title = normalize_title(&self.title);
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        let body = ArticleCreate {
            title,
            content: self.checked_content()?,
            comment: self.comment(),
        };

        let article = backend.create_article(&body).await?;
        log::info!("Created article {} ({})", article.title, article.id);
        let alert = Alert::success(
            "Article Published!",
            format!("\"{}\" is now live.", display_title(&article.title)),
        );
        Ok((article, alert))
    }

    /// Validate and save a new revision of `self.title`.
    pub async fn update(&self, backend: &dyn Backend) -> Result<(Article, Alert)> {
        let title = normalize_title(&self.title);
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        let body = ArticleUpdate {
            content: self.checked_content()?,
            comment: self.comment(),
        };

        let article = backend.update_article(&title, &body).await?;
        log::info!("Updated article {}", article.title);
        let alert = Alert::success(
            "Article Updated!",
            format!("Saved a new revision of \"{}\".", display_title(&article.title)),
        );
        Ok((article, alert))
    }
}
