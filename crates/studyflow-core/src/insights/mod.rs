//! Insight engine.
//!
//! Each insight has a pure analyzer over already-fetched records and a
//! fetch wrapper over the [`Datastore`](crate::storage::Datastore) that
//! degrades to `None`/empty on failure instead of propagating -- a failed
//! read should cost one card on a dashboard, not the whole screen.

mod best_time;
mod capacity;
mod health;
mod revision;
mod weekly;

pub use best_time::{best_study_time, detect_best_time, BestTimeInsight, TimeBand};
pub use capacity::{
    capacity_insights, day_adherence, summarize_week, CapacityFeedback, CapacityInsights,
    DayAdherence,
};
pub use health::{
    compute_health, subject_health, subject_health_batch, HealthLevel, SubjectHealth,
};
pub use revision::{rank_revisions, revision_suggestions, RevisionReason, RevisionSuggestion};
pub use weekly::{build_weekly_review, weekly_review, QualityCounts, WeeklyReview};
