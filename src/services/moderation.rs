//! Moderation status display and the flag / decision workflows.
//!
//! Status handling is a pure lookup. The backend owns every transition; the
//! client only validates form input before sending it.

use std::fmt;
use std::str::FromStr;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::{FlagRequest, ModerationDecision, Revision, Verdict};
use crate::render::{Alert, layout};
use crate::utils::non_blank;

/// Colour, label and tooltip for a moderation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub color: &'static str,
    pub label: String,
    pub description: &'static str,
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", layout::badge(&self.label), self.description)
    }
}

/// Look up the badge for a content status, case-insensitively.
pub fn status_badge(status: &str) -> StatusBadge {
    let (color, label, description) = match status.to_lowercase().as_str() {
        "draft" => ("gray", "Draft", "Content is in draft state"),
        "pending" => ("yellow", "Pending Review", "Awaiting moderation review"),
        "in_review" => ("blue", "In Review", "Currently being reviewed"),
        "approved" => ("green", "Approved", "Content has been approved"),
        "rejected" => ("red", "Rejected", "Content has been rejected"),
        "featured" => ("purple", "Featured", "Featured content"),
        "published" => ("green", "Published", "Content is published"),
        "under_review" => ("yellow", "Under Review", "Awaiting peer review"),
        _ => {
            return StatusBadge {
                color: "gray",
                label: status.to_string(),
                description: "Unknown status",
            };
        }
    };
    StatusBadge {
        color,
        label: label.to_string(),
        description,
    }
}

/// Label and colour of a revision's moderation state.
///
/// `is_approved` wins over the status string.
pub fn revision_status(revision: &Revision) -> (&'static str, &'static str) {
    if revision.is_approved == Some(true) {
        return ("Approved", "green");
    }
    match revision.status.as_deref() {
        Some("rejected") => ("Rejected", "red"),
        Some("approved") => ("Approved", "green"),
        Some("pending") => ("Pending", "yellow"),
        _ => ("Unknown", "gray"),
    }
}

/// Reasons a piece of content can be flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagType {
    Inappropriate,
    Spam,
    Inaccurate,
    Copyright,
    Other,
}

impl FlagType {
    pub const ALL: [FlagType; 5] = [
        Self::Inappropriate,
        Self::Spam,
        Self::Inaccurate,
        Self::Copyright,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inappropriate => "inappropriate",
            Self::Spam => "spam",
            Self::Inaccurate => "inaccurate",
            Self::Copyright => "copyright",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Inappropriate => "Inappropriate Content",
            Self::Spam => "Spam",
            Self::Inaccurate => "Inaccurate Information",
            Self::Copyright => "Copyright Violation",
            Self::Other => "Other",
        }
    }
}

impl FromStr for FlagType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Unknown flag type: {s}")))
    }
}

const FLAG_REQUIRED: &str = "Please select a flag type and provide a reason";

/// Input of the "flag content" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagForm {
    pub content_type: String,
    pub content_id: i64,
    /// Raw flag type as entered; empty when nothing was selected
    pub flag_type: String,
    pub reason: String,
}

impl FlagForm {
    /// Check the form and build the request body.
    pub fn validate(&self) -> Result<FlagRequest> {
        let reason = self.reason.trim();
        if self.flag_type.trim().is_empty() || reason.is_empty() {
            return Err(AppError::validation(FLAG_REQUIRED));
        }
        let flag_type: FlagType = self.flag_type.parse()?;
        Ok(FlagRequest {
            content_type: self.content_type.clone(),
            content_id: self.content_id,
            flag_type: flag_type.as_str().to_string(),
            reason: reason.to_string(),
        })
    }

    /// Validate, then submit. Invalid input never reaches the backend.
    pub async fn submit(&self, backend: &dyn Backend) -> Result<Alert> {
        let request = self.validate()?;
        backend.flag_content(&request).await?;
        log::info!(
            "Flagged {} {} as {}",
            request.content_type,
            request.content_id,
            request.flag_type
        );
        Ok(Alert::success(
            "Content Flagged",
            "Your flag has been submitted for review",
        ))
    }
}

/// Approve or reject a revision. A blank reason falls back to the default.
pub async fn decide_revision(
    backend: &dyn Backend,
    verdict: Verdict,
    revision_id: i64,
    reason: Option<&str>,
) -> Result<Alert> {
    let decision = ModerationDecision {
        content_type: "revision".to_string(),
        content_id: revision_id,
        reason: non_blank(reason)
            .unwrap_or(verdict.default_reason())
            .to_string(),
    };
    backend.decide(verdict, &decision).await?;

    let past = match verdict {
        Verdict::Approve => "approved",
        Verdict::Reject => "rejected",
    };
    log::info!("Revision {} {}", revision_id, past);
    Ok(Alert::success(
        "Success",
        format!("Revision {past} successfully"),
    ))
}
