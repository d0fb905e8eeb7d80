//! The injected data-access boundary.
//!
//! Every insight computation and planner write goes through this trait, so
//! the engine can run against SQLite in the app and an in-memory fake in
//! tests. One call, one result: no retries, no batching; retry policy, if
//! ever wanted, belongs behind an implementation.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DatastoreError;
use crate::model::{
    ConfidenceLevel, ConfidenceRating, Difficulty, ExamMode, FocusSession, NewFocusSession,
    NewTask, QualityRating, SubTopic, Subject, Task, Topic, UserCapacity,
};

pub trait Datastore: Send + Sync {
    /// Resolved user for the session, if any. Write paths fail fast when
    /// this is `None`.
    fn current_user_id(&self) -> Option<String>;

    // ── Structure ────────────────────────────────────────────────────

    fn subjects(&self) -> Result<Vec<Subject>, DatastoreError>;
    fn topics_for_subject(&self, subject_id: &str) -> Result<Vec<Topic>, DatastoreError>;
    fn sub_topics_for_topics(&self, topic_ids: &[String]) -> Result<Vec<SubTopic>, DatastoreError>;
    fn all_sub_topics(&self) -> Result<Vec<SubTopic>, DatastoreError>;

    fn insert_subject(&self, name: &str) -> Result<Subject, DatastoreError>;
    fn insert_topic(&self, subject_id: &str, name: &str) -> Result<Topic, DatastoreError>;
    fn insert_sub_topic(
        &self,
        topic_id: &str,
        name: &str,
        difficulty: Option<Difficulty>,
    ) -> Result<SubTopic, DatastoreError>;

    // ── Tasks ────────────────────────────────────────────────────────

    fn tasks_for_sub_topics(&self, sub_topic_ids: &[String]) -> Result<Vec<Task>, DatastoreError>;
    fn count_tasks_created_on(&self, day: NaiveDate) -> Result<u32, DatastoreError>;
    fn count_tasks_completed_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u32, DatastoreError>;
    fn insert_task(&self, task: NewTask) -> Result<Task, DatastoreError>;
    fn mark_task_completed(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatastoreError>;

    // ── Sessions ─────────────────────────────────────────────────────

    /// Sessions with `started_at` in the half-open range `[from, to)`.
    fn sessions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, DatastoreError>;
    fn sessions_for_tasks(&self, task_ids: &[String]) -> Result<Vec<FocusSession>, DatastoreError>;
    fn insert_session(&self, session: NewFocusSession) -> Result<FocusSession, DatastoreError>;
    fn set_session_quality(&self, id: &str, rating: QualityRating) -> Result<(), DatastoreError>;

    // ── Confidence & revision history ────────────────────────────────

    fn confidence_ratings(&self) -> Result<Vec<ConfidenceRating>, DatastoreError>;
    fn upsert_confidence(
        &self,
        sub_topic_id: &str,
        level: ConfidenceLevel,
        at: DateTime<Utc>,
    ) -> Result<(), DatastoreError>;
    fn append_revision(&self, sub_topic_id: &str, at: DateTime<Utc>) -> Result<(), DatastoreError>;
    /// Most recent review time per sub-topic.
    fn last_review_times(&self) -> Result<HashMap<String, DateTime<Utc>>, DatastoreError>;

    // ── Capacity & exam mode ─────────────────────────────────────────

    fn user_capacity(&self) -> Result<Option<UserCapacity>, DatastoreError>;
    fn set_user_capacity(&self, capacity: &UserCapacity) -> Result<(), DatastoreError>;
    fn active_exam(&self) -> Result<Option<ExamMode>, DatastoreError>;
    /// Activates the named exam, deactivating any other.
    fn set_active_exam(&self, name: &str, exam_date: NaiveDate) -> Result<(), DatastoreError>;
    fn clear_active_exam(&self) -> Result<(), DatastoreError>;
}
