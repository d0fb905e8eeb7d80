use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A study task attached to a sub-topic.
///
/// Invariant: `completed_at` is `Some` iff `is_completed` is true. The
/// planner's `complete_task` sets both in one update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub sub_topic_id: String,
    pub title: String,
    pub priority: Priority,
    pub is_completed: bool,
    pub due_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// An incomplete task whose due date has passed.
    pub fn is_missed(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date < today
    }
}

/// Fields for inserting a task; the store assigns id and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub sub_topic_id: String,
    pub title: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
}
