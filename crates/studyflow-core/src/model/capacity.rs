use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user configured limits. Read-only input to the insight engine;
/// absent entirely when the user never opted in to capacity tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCapacity {
    pub max_tasks_per_day: u32,
    pub max_daily_focus_minutes: u32,
    pub default_focus_minutes: u32,
    pub default_break_minutes: u32,
    pub recommended_sessions_per_day: u32,
}

/// At most one active exam per user; drives exam-proximity scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamMode {
    pub name: String,
    pub exam_date: NaiveDate,
    pub is_active: bool,
}

impl ExamMode {
    /// Whole days from `today` until the exam; negative once it has passed.
    pub fn days_away(&self, today: NaiveDate) -> i64 {
        (self.exam_date - today).num_days()
    }
}
