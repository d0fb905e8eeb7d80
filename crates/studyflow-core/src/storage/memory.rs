//! In-memory datastore fake.
//!
//! Backs engine and planner tests: seedable, optionally unauthenticated,
//! and able to fail reads on demand to exercise the degraded paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::datastore::Datastore;
use crate::error::DatastoreError;
use crate::model::{
    ConfidenceLevel, ConfidenceRating, Difficulty, ExamMode, FocusSession, NewFocusSession,
    NewTask, QualityRating, RevisionEntry, SubTopic, Subject, Task, Topic, UserCapacity,
};
use crate::util::day_bounds;

#[derive(Default)]
struct Inner {
    subjects: Vec<Subject>,
    topics: Vec<Topic>,
    sub_topics: Vec<SubTopic>,
    tasks: Vec<Task>,
    sessions: Vec<FocusSession>,
    confidence: HashMap<String, ConfidenceRating>,
    revisions: Vec<RevisionEntry>,
    capacity: Option<UserCapacity>,
    exam: Option<ExamMode>,
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
    user_id: Option<String>,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            user_id: Some("user-1".to_string()),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// A store with no resolved user, for exercising fail-fast writes.
    pub fn unauthenticated() -> Self {
        Self {
            user_id: None,
            ..Self::new()
        }
    }

    /// Make every read return an error until called with `false`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn read_guard(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DatastoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DatastoreError::QueryFailed("injected failure".into()));
        }
        self.lock()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DatastoreError> {
        self.inner.lock().map_err(|_| DatastoreError::Locked)
    }

    // ── Seeding helpers ──────────────────────────────────────────────

    pub fn seed_capacity(&self, capacity: UserCapacity) {
        if let Ok(mut inner) = self.lock() {
            inner.capacity = Some(capacity);
        }
    }

    pub fn seed_exam(&self, name: &str, exam_date: NaiveDate) {
        if let Ok(mut inner) = self.lock() {
            inner.exam = Some(ExamMode {
                name: name.to_string(),
                exam_date,
                is_active: true,
            });
        }
    }

    pub fn seed_session(&self, session: FocusSession) {
        if let Ok(mut inner) = self.lock() {
            inner.sessions.push(session);
        }
    }

    pub fn seed_task(&self, task: Task) {
        if let Ok(mut inner) = self.lock() {
            inner.tasks.push(task);
        }
    }

    pub fn revision_entries(&self) -> Vec<RevisionEntry> {
        self.lock().map(|i| i.revisions.clone()).unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Datastore for MemoryStore {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn subjects(&self) -> Result<Vec<Subject>, DatastoreError> {
        Ok(self.read_guard()?.subjects.clone())
    }

    fn topics_for_subject(&self, subject_id: &str) -> Result<Vec<Topic>, DatastoreError> {
        Ok(self
            .read_guard()?
            .topics
            .iter()
            .filter(|t| t.subject_id == subject_id)
            .cloned()
            .collect())
    }

    fn sub_topics_for_topics(&self, topic_ids: &[String]) -> Result<Vec<SubTopic>, DatastoreError> {
        Ok(self
            .read_guard()?
            .sub_topics
            .iter()
            .filter(|s| topic_ids.contains(&s.topic_id))
            .cloned()
            .collect())
    }

    fn all_sub_topics(&self) -> Result<Vec<SubTopic>, DatastoreError> {
        Ok(self.read_guard()?.sub_topics.clone())
    }

    fn insert_subject(&self, name: &str) -> Result<Subject, DatastoreError> {
        let subject = Subject {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.lock()?.subjects.push(subject.clone());
        Ok(subject)
    }

    fn insert_topic(&self, subject_id: &str, name: &str) -> Result<Topic, DatastoreError> {
        let topic = Topic {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            name: name.to_string(),
        };
        self.lock()?.topics.push(topic.clone());
        Ok(topic)
    }

    fn insert_sub_topic(
        &self,
        topic_id: &str,
        name: &str,
        difficulty: Option<Difficulty>,
    ) -> Result<SubTopic, DatastoreError> {
        let sub_topic = SubTopic {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            name: name.to_string(),
            difficulty,
        };
        self.lock()?.sub_topics.push(sub_topic.clone());
        Ok(sub_topic)
    }

    fn tasks_for_sub_topics(&self, sub_topic_ids: &[String]) -> Result<Vec<Task>, DatastoreError> {
        Ok(self
            .read_guard()?
            .tasks
            .iter()
            .filter(|t| sub_topic_ids.contains(&t.sub_topic_id))
            .cloned()
            .collect())
    }

    fn count_tasks_created_on(&self, day: NaiveDate) -> Result<u32, DatastoreError> {
        let (start, end) = day_bounds(day);
        Ok(self
            .read_guard()?
            .tasks
            .iter()
            .filter(|t| t.created_at >= start && t.created_at < end)
            .count() as u32)
    }

    fn count_tasks_completed_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u32, DatastoreError> {
        Ok(self
            .read_guard()?
            .tasks
            .iter()
            .filter(|t| {
                t.completed_at
                    .map(|at| at >= from && at < to)
                    .unwrap_or(false)
            })
            .count() as u32)
    }

    fn insert_task(&self, task: NewTask) -> Result<Task, DatastoreError> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            sub_topic_id: task.sub_topic_id,
            title: task.title,
            priority: task.priority,
            is_completed: false,
            due_date: task.due_date,
            completed_at: None,
            created_at: Utc::now(),
        };
        self.lock()?.tasks.push(task.clone());
        Ok(task)
    }

    fn mark_task_completed(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatastoreError> {
        let mut inner = self.lock()?;
        match inner.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.is_completed = true;
                task.completed_at = Some(at);
                Ok(())
            }
            None => Err(DatastoreError::NotFound {
                entity: "task",
                id: id.to_string(),
            }),
        }
    }

    fn sessions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, DatastoreError> {
        Ok(self
            .read_guard()?
            .sessions
            .iter()
            .filter(|s| s.started_at >= from && s.started_at < to)
            .cloned()
            .collect())
    }

    fn sessions_for_tasks(&self, task_ids: &[String]) -> Result<Vec<FocusSession>, DatastoreError> {
        Ok(self
            .read_guard()?
            .sessions
            .iter()
            .filter(|s| {
                s.task_id
                    .as_ref()
                    .map(|id| task_ids.contains(id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn insert_session(&self, session: NewFocusSession) -> Result<FocusSession, DatastoreError> {
        let session = FocusSession {
            id: Uuid::new_v4().to_string(),
            subject_id: session.subject_id,
            topic_id: session.topic_id,
            sub_topic_id: session.sub_topic_id,
            task_id: session.task_id,
            duration_seconds: session.duration_seconds,
            target_duration_seconds: session.target_duration_seconds,
            started_at: session.started_at,
            ended_at: session.ended_at,
            session_type: session.session_type,
            quality_rating: None,
        };
        self.lock()?.sessions.push(session.clone());
        Ok(session)
    }

    fn set_session_quality(&self, id: &str, rating: QualityRating) -> Result<(), DatastoreError> {
        let mut inner = self.lock()?;
        match inner.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.quality_rating = Some(rating);
                Ok(())
            }
            None => Err(DatastoreError::NotFound {
                entity: "session",
                id: id.to_string(),
            }),
        }
    }

    fn confidence_ratings(&self) -> Result<Vec<ConfidenceRating>, DatastoreError> {
        Ok(self.read_guard()?.confidence.values().cloned().collect())
    }

    fn upsert_confidence(
        &self,
        sub_topic_id: &str,
        level: ConfidenceLevel,
        at: DateTime<Utc>,
    ) -> Result<(), DatastoreError> {
        self.lock()?.confidence.insert(
            sub_topic_id.to_string(),
            ConfidenceRating {
                sub_topic_id: sub_topic_id.to_string(),
                level,
                rated_at: at,
            },
        );
        Ok(())
    }

    fn append_revision(&self, sub_topic_id: &str, at: DateTime<Utc>) -> Result<(), DatastoreError> {
        self.lock()?.revisions.push(RevisionEntry {
            sub_topic_id: sub_topic_id.to_string(),
            reviewed_at: at,
        });
        Ok(())
    }

    fn last_review_times(&self) -> Result<HashMap<String, DateTime<Utc>>, DatastoreError> {
        let inner = self.read_guard()?;
        let mut last: HashMap<String, DateTime<Utc>> = HashMap::new();
        for entry in &inner.revisions {
            last.entry(entry.sub_topic_id.clone())
                .and_modify(|at| {
                    if entry.reviewed_at > *at {
                        *at = entry.reviewed_at;
                    }
                })
                .or_insert(entry.reviewed_at);
        }
        Ok(last)
    }

    fn user_capacity(&self) -> Result<Option<UserCapacity>, DatastoreError> {
        Ok(self.read_guard()?.capacity.clone())
    }

    fn set_user_capacity(&self, capacity: &UserCapacity) -> Result<(), DatastoreError> {
        self.lock()?.capacity = Some(capacity.clone());
        Ok(())
    }

    fn active_exam(&self) -> Result<Option<ExamMode>, DatastoreError> {
        Ok(self.read_guard()?.exam.clone())
    }

    fn set_active_exam(&self, name: &str, exam_date: NaiveDate) -> Result<(), DatastoreError> {
        self.lock()?.exam = Some(ExamMode {
            name: name.to_string(),
            exam_date,
            is_active: true,
        });
        Ok(())
    }

    fn clear_active_exam(&self) -> Result<(), DatastoreError> {
        self.lock()?.exam = None;
        Ok(())
    }
}
