//! Peer review forms and the review table.

use std::fmt;
use std::ops::RangeInclusive;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::{PeerReview, ReviewCompletion, ReviewStatus, ReviewSubmission};
use crate::render::{Alert, layout};
use crate::utils::non_blank;

/// Valid review scores.
pub const SCORE_RANGE: RangeInclusive<u8> = 1..=5;

/// Colour of a score badge.
pub fn score_color(score: f64) -> &'static str {
    if score >= 4.0 {
        "green"
    } else if score >= 3.0 {
        "yellow"
    } else {
        "red"
    }
}

/// `n/5`, with at most two decimals.
fn score_label(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    format!("{rounded}/{}", SCORE_RANGE.end())
}

fn check(score: u8, feedback: &str) -> Result<String> {
    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Err(AppError::validation(
            "Please provide feedback for your review",
        ));
    }
    if !SCORE_RANGE.contains(&score) {
        return Err(AppError::validation(format!(
            "Score must be between {} and {}",
            SCORE_RANGE.start(),
            SCORE_RANGE.end()
        )));
    }
    Ok(feedback.to_string())
}

/// A new review of a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub revision_id: i64,
    pub reviewer_id: i64,
    pub status: ReviewStatus,
    pub score: u8,
    pub feedback: String,
}

impl ReviewForm {
    pub fn validate(&self) -> Result<ReviewSubmission> {
        let feedback = check(self.score, &self.feedback)?;
        Ok(ReviewSubmission {
            revision_id: self.revision_id,
            reviewer_id: self.reviewer_id,
            status: self.status,
            score: self.score,
            feedback,
        })
    }

    pub async fn submit(&self, backend: &dyn Backend) -> Result<Alert> {
        let submission = self.validate()?;
        backend.submit_review(&submission).await?;
        log::info!(
            "Submitted {} review for revision {}",
            submission.status,
            submission.revision_id
        );
        Ok(Alert::success(
            "Review Submitted",
            "Your peer review has been submitted successfully",
        ))
    }
}

/// Completion of an assigned review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionForm {
    pub review_id: i64,
    pub status: ReviewStatus,
    pub score: u8,
    pub feedback: String,
}

impl CompletionForm {
    pub fn validate(&self) -> Result<ReviewCompletion> {
        let feedback = check(self.score, &self.feedback)?;
        Ok(ReviewCompletion {
            status: self.status,
            score: self.score,
            feedback,
        })
    }

    pub async fn submit(&self, backend: &dyn Backend) -> Result<Alert> {
        let completion = self.validate()?;
        backend.complete_review(self.review_id, &completion).await?;
        log::info!("Completed review {}", self.review_id);
        Ok(Alert::success(
            "Review Completed",
            "Your peer review has been submitted successfully",
        ))
    }
}

/// One row of the review table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub reviewer: String,
    pub status: ReviewStatus,
    /// `n/5`, or `-` without a score
    pub score: String,
    pub score_color: Option<&'static str>,
    pub summary: String,
}

impl From<&PeerReview> for ReviewRow {
    fn from(review: &PeerReview) -> Self {
        let reviewer = match &review.reviewer {
            Some(user) => match user.role.as_deref() {
                Some(role) => format!("{} ({role})", user.username),
                None => user.username.clone(),
            },
            None => review
                .reviewer_id
                .map_or_else(|| "Unknown reviewer".to_string(), |id| format!("Reviewer #{id}")),
        };
        Self {
            reviewer,
            status: review.status,
            score: review.score.map_or_else(|| "-".to_string(), score_label),
            score_color: review.score.map(score_color),
            summary: non_blank(review.feedback.as_deref())
                .unwrap_or("No summary provided")
                .to_string(),
        }
    }
}

/// Peer reviews of one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTable {
    pub rows: Vec<ReviewRow>,
}

impl ReviewTable {
    pub fn new(reviews: &[PeerReview]) -> Self {
        Self {
            rows: reviews.iter().map(ReviewRow::from).collect(),
        }
    }
}

impl fmt::Display for ReviewTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::section(f, &format!("Peer Reviews ({})", self.rows.len()))?;
        if self.rows.is_empty() {
            return writeln!(f, "No peer reviews yet.");
        }
        for row in &self.rows {
            writeln!(
                f,
                "{} {} score {}",
                row.reviewer,
                layout::badge(row.status.as_str()),
                row.score
            )?;
            layout::sub_item(f, &row.summary)?;
        }
        Ok(())
    }
}

/// A reviewer's own reviews, split into open and finished work.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDashboard {
    pub reviewer: String,
    pub active: Vec<DashboardEntry>,
    pub completed: Vec<DashboardEntry>,
    /// Mean of the scored reviews
    pub average_score: Option<f64>,
}

/// One review on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardEntry {
    pub review_id: i64,
    pub revision_id: Option<i64>,
    pub row: ReviewRow,
}

impl ReviewDashboard {
    pub fn new(reviewer: impl Into<String>, reviews: &[PeerReview]) -> Self {
        let (completed, active): (Vec<&PeerReview>, Vec<&PeerReview>) =
            reviews.iter().partition(|r| is_finished(r.status));
        let entry = |review: &&PeerReview| DashboardEntry {
            review_id: review.id,
            revision_id: review.revision_id,
            row: ReviewRow::from(*review),
        };

        let scores: Vec<f64> = reviews.iter().filter_map(|r| r.score).collect();
        let average_score =
            (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

        Self {
            reviewer: reviewer.into(),
            active: active.iter().map(entry).collect(),
            completed: completed.iter().map(entry).collect(),
            average_score,
        }
    }

    pub fn total(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    /// Share of finished reviews, in percent.
    pub fn completion_rate(&self) -> u32 {
        match self.total() {
            0 => 0,
            total => (self.completed.len() * 100 / total) as u32,
        }
    }
}

fn is_finished(status: ReviewStatus) -> bool {
    matches!(
        status,
        ReviewStatus::Approved | ReviewStatus::Rejected | ReviewStatus::NeedsChanges
    )
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[DashboardEntry]) -> fmt::Result {
    for entry in entries {
        let revision = entry
            .revision_id
            .map_or_else(|| "unknown revision".to_string(), |id| format!("Revision #{id}"));
        writeln!(
            f,
            "Review #{} - {} {} score {}",
            entry.review_id,
            revision,
            layout::badge(entry.row.status.as_str()),
            entry.row.score
        )?;
        layout::sub_item(f, &entry.row.summary)?;
    }
    Ok(())
}

impl fmt::Display for ReviewDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &format!("Peer Review Dashboard: {}", self.reviewer))?;
        let average = self.average_score.map_or_else(|| "-".to_string(), score_label);
        layout::summary(
            f,
            "Review activity",
            &[
                ("Total reviews", self.total().to_string()),
                ("Average score", average),
                ("Completion rate", format!("{}%", self.completion_rate())),
            ],
        )?;

        layout::section(f, &format!("In Progress ({})", self.active.len()))?;
        if self.active.is_empty() {
            writeln!(f, "No reviews in progress.")?;
        }
        write_entries(f, &self.active)?;

        layout::section(f, &format!("Completed ({})", self.completed.len()))?;
        if self.completed.is_empty() {
            writeln!(f, "No completed reviews yet.")?;
        }
        write_entries(f, &self.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn form(score: u8, feedback: &str) -> ReviewForm {
        ReviewForm {
            revision_id: 12,
            reviewer_id: 3,
            status: ReviewStatus::Approved,
            score,
            feedback: feedback.into(),
        }
    }

    #[test]
    fn test_score_colors() {
        assert_eq!(score_color(5.0), "green");
        assert_eq!(score_color(4.0), "green");
        assert_eq!(score_color(3.67), "yellow");
        assert_eq!(score_color(2.99), "red");
    }

    #[tokio::test]
    async fn test_empty_feedback_makes_no_call() {
        let backend = FakeBackend::new();
        let err = form(4, " ").submit(&backend).await.unwrap_err();
        assert_eq!(err.user_message(), "Please provide feedback for your review");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_score_rejected() {
        let backend = FakeBackend::new();
        assert!(form(0, "ok").submit(&backend).await.is_err());
        assert!(form(6, "ok").submit(&backend).await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_and_complete() {
        let backend = FakeBackend::new();
        let alert = form(5, "Accurate").submit(&backend).await.unwrap();
        assert_eq!(alert.title, "Review Submitted");

        let completion = CompletionForm {
            review_id: 44,
            status: ReviewStatus::NeedsChanges,
            score: 2,
            feedback: "Needs citations".into(),
        };
        completion.submit(&backend).await.unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                "submit_review 12 approved 5",
                "complete_review 44 needs_changes 2"
            ]
        );
    }

    #[test]
    fn test_review_rows() {
        let reviews: Vec<PeerReview> = serde_json::from_str(
            r#"[
                {"id": 1, "reviewer": {"id": 3, "username": "kofi", "role": "editor"},
                 "status": "approved", "overall_score": 4, "summary": "Solid"},
                {"id": 2, "reviewer_id": 8, "status": "pending"}
            ]"#,
        )
        .unwrap();
        let table = ReviewTable::new(&reviews);

        assert_eq!(table.rows[0].reviewer, "kofi (editor)");
        assert_eq!(table.rows[0].score, "4/5");
        assert_eq!(table.rows[0].score_color, Some("green"));
        assert_eq!(table.rows[1].score, "-");
        assert_eq!(table.rows[1].summary, "No summary provided");
        assert!(table.to_string().contains("Peer Reviews (2)"));
    }

    #[test]
    fn test_fractional_score_and_open_status() {
        let reviews: Vec<PeerReview> = serde_json::from_str(
            r#"[
                {"id": 1, "reviewer_id": 3, "status": "approved", "overall_score": 3.666667},
                {"id": 2, "reviewer_id": 4, "status": "in_progress"}
            ]"#,
        )
        .unwrap();
        let table = ReviewTable::new(&reviews);

        assert_eq!(table.rows[0].score, "3.67/5");
        assert_eq!(table.rows[0].score_color, Some("yellow"));
        assert_eq!(table.rows[1].status, ReviewStatus::InProgress);
        assert!(table.to_string().contains("[in_progress]"));
    }

    #[test]
    fn test_dashboard_splits_open_and_finished() {
        let reviews: Vec<PeerReview> = serde_json::from_str(
            r#"[
                {"id": 5, "revision_id": 40, "status": "in_progress"},
                {"id": 6, "revision_id": 41, "status": "approved", "overall_score": 4.5, "summary": "Good"},
                {"id": 7, "revision_id": 42, "status": "needs_changes", "overall_score": 2.5}
            ]"#,
        )
        .unwrap();
        let dashboard = ReviewDashboard::new("kofi", &reviews);

        assert_eq!(dashboard.active.len(), 1);
        assert_eq!(dashboard.completed.len(), 2);
        assert_eq!(dashboard.average_score, Some(3.5));
        assert_eq!(dashboard.completion_rate(), 66);

        let text = dashboard.to_string();
        assert!(text.contains("Peer Review Dashboard: kofi"));
        assert!(text.contains("Review #6 - Revision #41 [approved] score 4.5/5"));
        assert!(text.contains("Average score: 3.5/5"));
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = ReviewDashboard::new("kofi", &[]);
        assert_eq!(dashboard.completion_rate(), 0);
        let text = dashboard.to_string();
        assert!(text.contains("No reviews in progress."));
        assert!(text.contains("Average score: -"));
    }
}
