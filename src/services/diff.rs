//! Revision diff view.
//!
//! The backend computes the diff; this module only classifies the payload
//! and lays out what it already contains.

use std::fmt;

use crate::models::{DiffStatistics, RevisionDiff};
use crate::render::{Alert, layout};

/// Graphemes per column in the side-by-side view.
const COLUMN_WIDTH: usize = 36;

/// One line of a side-by-side column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub text: String,
    /// Non-blank lines are highlighted; blank ones render as a placeholder.
    pub highlighted: bool,
}

impl DiffLine {
    fn split(content: Option<&str>) -> Vec<DiffLine> {
        content
            .unwrap_or_default()
            .split('\n')
            .map(|line| DiffLine {
                text: line.to_string(),
                highlighted: !line.trim().is_empty(),
            })
            .collect()
    }
}

/// Headline numbers of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Upper-cased change type (MAJOR, MINOR, NONE)
    pub change_type: String,
    pub color: &'static str,
    pub net_change: i64,
    pub added_lines: i64,
    pub removed_lines: i64,
}

impl ChangeSummary {
    /// `+3 lines net change`, `-2 lines net change`, `0 lines net change`
    pub fn net_change_text(&self) -> String {
        let sign = if self.net_change > 0 { "+" } else { "" };
        format!("{sign}{} lines net change", self.net_change)
    }

    pub fn added_text(&self) -> String {
        format!("+{}", self.added_lines)
    }

    pub fn removed_text(&self) -> String {
        format!("-{} removed", self.removed_lines)
    }
}

/// Colour of a change-type badge.
pub fn change_type_color(change_type: &str) -> &'static str {
    match change_type {
        "major" => "red",
        "minor" => "yellow",
        _ => "green",
    }
}

/// A fully populated diff ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPanel {
    pub summary: ChangeSummary,
    pub statistics: DiffStatistics,
    pub previous: Vec<DiffLine>,
    pub current: Vec<DiffLine>,
}

/// What the diff section shows for a given payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffView {
    /// The request returned no payload
    NoChanges,
    /// The revision has no predecessor
    FirstRevision { message: String, content: String },
    /// `diff` is null
    NoDiffData,
    /// `statistics` or `summary` is missing
    MissingProperties,
    /// One of the diff arrays is missing
    MissingArrays,
    Ready(Box<DiffPanel>),
}

impl DiffView {
    /// Classify a payload into exactly one display state.
    pub fn from_payload(payload: Option<RevisionDiff>) -> Self {
        let Some(payload) = payload else {
            return DiffView::NoChanges;
        };

        if payload.is_first_revision {
            return DiffView::FirstRevision {
                message: payload.message.unwrap_or_default(),
                content: payload.current_content.unwrap_or_default(),
            };
        }

        let Some(diff) = payload.diff else {
            return DiffView::NoDiffData;
        };

        let (Some(statistics), Some(summary)) = (diff.statistics, diff.summary) else {
            log::warn!(
                "Diff for revision {:?} is missing statistics or summary",
                payload.revision_id
            );
            return DiffView::MissingProperties;
        };

        if diff.line_diff.is_none() || diff.word_diff.is_none() || diff.char_diff.is_none() {
            log::warn!(
                "Diff for revision {:?} is missing diff arrays",
                payload.revision_id
            );
            return DiffView::MissingArrays;
        }

        DiffView::Ready(Box::new(DiffPanel {
            summary: ChangeSummary {
                change_type: summary.change_type.to_uppercase(),
                color: change_type_color(&summary.change_type),
                net_change: summary.net_change,
                added_lines: statistics.added_lines,
                removed_lines: statistics.removed_lines,
            },
            previous: DiffLine::split(payload.previous_content.as_deref()),
            current: DiffLine::split(payload.current_content.as_deref()),
            statistics,
        }))
    }

    /// The alert shown instead of a diff, if any.
    pub fn alert(&self) -> Option<Alert> {
        match self {
            DiffView::NoChanges => Some(Alert::info(
                "No changes found",
                "Unable to load revision changes.",
            )),
            DiffView::NoDiffData => Some(Alert::warning(
                "No diff data available",
                "Unable to generate diff for this revision.",
            )),
            DiffView::MissingProperties => Some(Alert::error(
                "Invalid diff data",
                "Diff data is missing required properties.",
            )),
            DiffView::MissingArrays => Some(Alert::error(
                "Invalid diff format",
                "Diff data is missing required arrays.",
            )),
            DiffView::FirstRevision { .. } | DiffView::Ready(_) => None,
        }
    }
}

impl fmt::Display for DiffView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alert) = self.alert() {
            return write!(f, "{alert}");
        }
        match self {
            DiffView::FirstRevision { message, content } => {
                layout::section(f, "First Revision")?;
                writeln!(f, "{message}")?;
                writeln!(f)?;
                writeln!(f, "Content:")?;
                for line in content.split('\n') {
                    layout::sub_item(f, line)?;
                }
                Ok(())
            }
            DiffView::Ready(panel) => write!(f, "{panel}"),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for DiffPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        let st = &self.statistics;

        layout::section(f, "Changes Summary")?;
        writeln!(
            f,
            "Change Type: {} {}",
            layout::badge(&s.change_type),
            s.net_change_text()
        )?;
        writeln!(f, "Lines: {} / {}", s.added_text(), s.removed_text())?;
        writeln!(
            f,
            "Words: +{} / -{} removed ({} -> {})",
            st.added_words, st.removed_words, st.total_words_old, st.total_words_new
        )?;
        writeln!(
            f,
            "Characters: +{} / -{} removed ({} -> {})",
            st.added_chars, st.removed_chars, st.total_chars_old, st.total_chars_new
        )?;

        layout::section(f, "Line-by-Line Changes")?;
        writeln!(
            f,
            "{} | {}",
            layout::pad("Previous Version", COLUMN_WIDTH + 2),
            "Current Version"
        )?;
        layout::separator(f)?;

        let left = column(&self.previous, '-');
        let right = column(&self.current, '+');
        for row in 0..left.len().max(right.len()) {
            let l = left.get(row).map(String::as_str).unwrap_or_default();
            let r = right.get(row).map(String::as_str).unwrap_or_default();
            writeln!(f, "{} | {}", layout::pad(l, COLUMN_WIDTH + 2), r)?;
        }
        Ok(())
    }
}

/// Wrap lines to the column width, marking highlighted lines.
fn column(lines: &[DiffLine], marker: char) -> Vec<String> {
    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        let prefix = if line.highlighted {
            format!("{marker} ")
        } else {
            "  ".to_string()
        };
        for (i, chunk) in layout::wrap(&line.text, COLUMN_WIDTH).into_iter().enumerate() {
            if i == 0 {
                rows.push(format!("{prefix}{chunk}"));
            } else {
                rows.push(format!("  {chunk}"));
            }
        }
    }
    rows
}
