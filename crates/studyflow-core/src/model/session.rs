use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Focus,
    Rest,
}

/// Self-rated quality, collected via the post-session prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Focused,
    Okay,
    Distracted,
}

impl QualityRating {
    /// Weight used by the best-study-time detector.
    pub fn weight(self) -> f64 {
        match self {
            QualityRating::Focused => 1.0,
            QualityRating::Okay => 0.5,
            QualityRating::Distracted => 0.0,
        }
    }
}

/// A recorded focus (or rest) session.
///
/// Only sessions of at least 10 seconds ever reach the store; the timer
/// discards shorter ones on stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub subject_id: Option<String>,
    pub topic_id: Option<String>,
    pub sub_topic_id: Option<String>,
    pub task_id: Option<String>,
    /// Whole seconds, truncated at the source tick resolution.
    pub duration_seconds: u32,
    pub target_duration_seconds: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub session_type: SessionType,
    #[serde(default)]
    pub quality_rating: Option<QualityRating>,
}

impl FocusSession {
    pub fn duration_minutes(&self) -> u32 {
        self.duration_seconds / 60
    }

    /// A session counts as completed when it ran to its target.
    pub fn met_target(&self) -> bool {
        self.target_duration_seconds
            .map(|t| self.duration_seconds >= t)
            .unwrap_or(false)
    }
}

/// Fields for inserting a session; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFocusSession {
    pub subject_id: Option<String>,
    pub topic_id: Option<String>,
    pub sub_topic_id: Option<String>,
    pub task_id: Option<String>,
    pub duration_seconds: u32,
    pub target_duration_seconds: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub session_type: SessionType,
}
