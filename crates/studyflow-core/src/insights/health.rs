//! Subject health scoring.
//!
//! Combines four weighted ratios over a subject's tasks and linked focus
//! sessions into a 0-100 score with a coarse level. Weights and level
//! breakpoints are fixed; tests pin the exact boundaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatastoreError;
use crate::model::{FocusSession, Task};
use crate::storage::Datastore;
use crate::util::window_start;

const WEIGHT_COMPLETION: f64 = 0.40;
const WEIGHT_CONSISTENCY: f64 = 0.25;
const WEIGHT_STUDY: f64 = 0.25;
const WEIGHT_MISSED: f64 = 0.10;

/// Days of history that feed the consistency ratio.
const CONSISTENCY_WINDOW_DAYS: u64 = 14;
/// Study minutes at which the study ratio saturates (10 hours).
const STUDY_CAP_MINUTES: f64 = 600.0;

const NEUTRAL_SCORE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Strong,
    Good,
    NeedsAttention,
    Critical,
}

impl HealthLevel {
    /// Fixed breakpoints: >=75 strong, >=55 good, >=35 needs attention.
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => HealthLevel::Strong,
            55..=74 => HealthLevel::Good,
            35..=54 => HealthLevel::NeedsAttention,
            _ => HealthLevel::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectHealth {
    pub subject_id: String,
    pub score: u8,
    pub level: HealthLevel,
    pub completion_rate: f64,
    pub consistency: f64,
    pub study_minutes: u32,
    pub missed_count: u32,
}

impl SubjectHealth {
    /// The score given to subjects with no topics or tasks yet. An empty
    /// subject is not unhealthy, just unknown.
    fn neutral(subject_id: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            score: NEUTRAL_SCORE,
            level: HealthLevel::from_score(NEUTRAL_SCORE),
            completion_rate: 0.0,
            consistency: 0.0,
            study_minutes: 0,
            missed_count: 0,
        }
    }
}

/// Compute health from already-fetched inputs.
pub fn compute_health(
    subject_id: &str,
    tasks: &[Task],
    sessions: &[FocusSession],
    today: NaiveDate,
) -> SubjectHealth {
    if tasks.is_empty() {
        return SubjectHealth::neutral(subject_id);
    }

    let total = tasks.len() as f64;
    let completed = tasks.iter().filter(|t| t.is_completed).count() as f64;
    let completion_rate = completed / total;

    let from = window_start(today, CONSISTENCY_WINDOW_DAYS);
    let mut active_days: Vec<NaiveDate> = tasks
        .iter()
        .filter_map(|t| t.completed_at)
        .map(|at| at.date_naive())
        .filter(|d| *d >= from && *d <= today)
        .collect();
    active_days.sort_unstable();
    active_days.dedup();
    let consistency = active_days.len() as f64 / CONSISTENCY_WINDOW_DAYS as f64;

    let study_minutes: u32 = sessions.iter().map(|s| s.duration_minutes()).sum();
    let study_score = (f64::from(study_minutes) / STUDY_CAP_MINUTES).min(1.0);

    let missed_count = tasks.iter().filter(|t| t.is_missed(today)).count() as u32;
    let missed_frequency = f64::from(missed_count) / total;

    let score = (100.0
        * (WEIGHT_COMPLETION * completion_rate
            + WEIGHT_CONSISTENCY * consistency
            + WEIGHT_STUDY * study_score
            + WEIGHT_MISSED * (1.0 - missed_frequency)))
        .round() as u8;

    SubjectHealth {
        subject_id: subject_id.to_string(),
        score,
        level: HealthLevel::from_score(score),
        completion_rate,
        consistency,
        study_minutes,
        missed_count,
    }
}

/// Fetch a subject's inputs and score it. Degrades to `None` on any fetch
/// failure; never propagates.
pub fn subject_health<S: Datastore + ?Sized>(
    store: &S,
    subject_id: &str,
    today: NaiveDate,
) -> Option<SubjectHealth> {
    match fetch_and_compute(store, subject_id, today) {
        Ok(health) => Some(health),
        Err(e) => {
            log::debug!("health computation degraded for subject {subject_id}: {e}");
            None
        }
    }
}

/// Score several subjects; each is computed independently, so one failed
/// fetch yields `None` for that subject without aborting the rest.
pub fn subject_health_batch<S: Datastore + ?Sized>(
    store: &S,
    subject_ids: &[String],
    today: NaiveDate,
) -> Vec<Option<SubjectHealth>> {
    subject_ids
        .iter()
        .map(|id| subject_health(store, id, today))
        .collect()
}

fn fetch_and_compute<S: Datastore + ?Sized>(
    store: &S,
    subject_id: &str,
    today: NaiveDate,
) -> Result<SubjectHealth, DatastoreError> {
    let topics = store.topics_for_subject(subject_id)?;
    if topics.is_empty() {
        return Ok(SubjectHealth::neutral(subject_id));
    }
    let topic_ids: Vec<String> = topics.into_iter().map(|t| t.id).collect();
    let sub_topic_ids: Vec<String> = store
        .sub_topics_for_topics(&topic_ids)?
        .into_iter()
        .map(|s| s.id)
        .collect();
    let tasks = store.tasks_for_sub_topics(&sub_topic_ids)?;
    let task_ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
    let sessions = store.sessions_for_tasks(&task_ids)?;
    Ok(compute_health(subject_id, &tasks, &sessions, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, SessionType};
    use chrono::{Duration, Utc};

    fn task(completed: bool, due_days_from_now: i64) -> Task {
        let now = Utc::now();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            sub_topic_id: "st-1".into(),
            title: "t".into(),
            priority: Priority::Medium,
            is_completed: completed,
            due_date: (now + Duration::days(due_days_from_now)).date_naive(),
            completed_at: completed.then_some(now),
            created_at: now,
        }
    }

    fn session(minutes: u32) -> FocusSession {
        let now = Utc::now();
        FocusSession {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: None,
            topic_id: None,
            sub_topic_id: None,
            task_id: Some("task-1".into()),
            duration_seconds: minutes * 60,
            target_duration_seconds: None,
            started_at: now,
            ended_at: now,
            session_type: SessionType::Focus,
            quality_rating: None,
        }
    }

    #[test]
    fn empty_subject_is_neutral() {
        let health = compute_health("s-1", &[], &[], Utc::now().date_naive());
        assert_eq!(health.score, 50);
        assert_eq!(health.level, HealthLevel::Good);
    }

    #[test]
    fn level_boundaries_are_exact() {
        assert_eq!(HealthLevel::from_score(75), HealthLevel::Strong);
        assert_eq!(HealthLevel::from_score(74), HealthLevel::Good);
        assert_eq!(HealthLevel::from_score(55), HealthLevel::Good);
        assert_eq!(HealthLevel::from_score(54), HealthLevel::NeedsAttention);
        assert_eq!(HealthLevel::from_score(35), HealthLevel::NeedsAttention);
        assert_eq!(HealthLevel::from_score(34), HealthLevel::Critical);
        assert_eq!(HealthLevel::from_score(0), HealthLevel::Critical);
        assert_eq!(HealthLevel::from_score(100), HealthLevel::Strong);
    }

    #[test]
    fn all_complete_today_with_heavy_study_is_strong() {
        let today = Utc::now().date_naive();
        let tasks: Vec<Task> = (0..4).map(|_| task(true, 1)).collect();
        let sessions: Vec<FocusSession> = (0..10).map(|_| session(60)).collect();
        let health = compute_health("s-1", &tasks, &sessions, today);
        // completion 1.0, consistency 1/14, study capped at 1.0, no misses:
        // 100 * (0.40 + 0.25/14 + 0.25 + 0.10) = 76.8 -> 77
        assert_eq!(health.score, 77);
        assert_eq!(health.level, HealthLevel::Strong);
        assert_eq!(health.study_minutes, 600);
    }

    #[test]
    fn overdue_tasks_drag_the_score_down() {
        let today = Utc::now().date_naive();
        let tasks = vec![task(false, -3), task(false, -1)];
        let health = compute_health("s-1", &tasks, &[], today);
        // Everything missed: only the (1 - missed) term could contribute,
        // and it is zero too.
        assert_eq!(health.score, 0);
        assert_eq!(health.level, HealthLevel::Critical);
        assert_eq!(health.missed_count, 2);
    }

    #[test]
    fn study_minutes_cap_at_ten_hours() {
        let today = Utc::now().date_naive();
        let tasks = vec![task(false, 5)];
        let a = compute_health("s-1", &tasks, &(0..10).map(|_| session(60)).collect::<Vec<_>>(), today);
        let b = compute_health("s-1", &tasks, &(0..20).map(|_| session(60)).collect::<Vec<_>>(), today);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn failed_fetch_yields_none_without_blocking_batch() {
        use crate::storage::{Datastore, MemoryStore};
        let store = MemoryStore::new();
        let subject = store.insert_subject("Chemistry").unwrap();
        store.set_fail_reads(true);
        let results = subject_health_batch(
            &store,
            &[subject.id.clone(), "missing".into()],
            Utc::now().date_naive(),
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_none()));

        store.set_fail_reads(false);
        let healthy = subject_health(&store, &subject.id, Utc::now().date_naive());
        assert_eq!(healthy.unwrap().score, 50);
    }
}
