use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Current confidence for a sub-topic. One row per sub-topic, overwritten
/// on re-rating; every rating event also appends a [`RevisionEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceRating {
    pub sub_topic_id: String,
    pub level: ConfidenceLevel,
    pub rated_at: DateTime<Utc>,
}

/// Append-only review log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub sub_topic_id: String,
    pub reviewed_at: DateTime<Utc>,
}
