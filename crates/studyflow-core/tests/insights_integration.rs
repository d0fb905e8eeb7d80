//! End-to-end insight computations over a seeded SQLite store.
//!
//! Exercises the full read path: planner writes records through the
//! datastore, the insight engine fetches them back and scores.

use chrono::{Duration, Utc};
use studyflow_core::insights::{
    best_study_time, capacity_insights, revision_suggestions, subject_health, weekly_review,
    CapacityFeedback, HealthLevel, RevisionReason,
};
use studyflow_core::model::{
    ConfidenceLevel, Difficulty, NewFocusSession, NewTask, Priority, SessionType,
};
use studyflow_core::planner;
use studyflow_core::storage::{Datastore, SqliteStore};

struct Fixture {
    store: SqliteStore,
    subject_id: String,
    sub_topic_id: String,
}

fn seeded_store() -> Fixture {
    let store = SqliteStore::open_memory().expect("in-memory store");
    let subject = store.insert_subject("Physics").unwrap();
    let topic = store.insert_topic(&subject.id, "Mechanics").unwrap();
    let sub_topic = store
        .insert_sub_topic(&topic.id, "Momentum", Some(Difficulty::Hard))
        .unwrap();
    Fixture {
        store,
        subject_id: subject.id,
        sub_topic_id: sub_topic.id,
    }
}

fn add_task(fixture: &Fixture, title: &str, complete: bool) -> String {
    let today = Utc::now().date_naive();
    let task = planner::create_task(
        &fixture.store,
        NewTask {
            sub_topic_id: fixture.sub_topic_id.clone(),
            title: title.into(),
            priority: Priority::Medium,
            due_date: today + Duration::days(3),
        },
        today,
    )
    .unwrap();
    if complete {
        planner::complete_task(&fixture.store, &task.id, Utc::now()).unwrap();
    }
    task.id
}

fn add_focus_session(fixture: &Fixture, task_id: &str, minutes: u32) {
    // Anchored at "now" so the whole session lands on today's date even
    // when the test runs just after midnight.
    let now = Utc::now();
    planner::record_session(
        &fixture.store,
        NewFocusSession {
            subject_id: Some(fixture.subject_id.clone()),
            topic_id: None,
            sub_topic_id: Some(fixture.sub_topic_id.clone()),
            task_id: Some(task_id.into()),
            duration_seconds: minutes * 60,
            target_duration_seconds: None,
            started_at: now,
            ended_at: now + Duration::minutes(i64::from(minutes)),
            session_type: SessionType::Focus,
        },
    )
    .unwrap();
}

#[test]
fn subject_health_end_to_end() {
    let fixture = seeded_store();
    let today = Utc::now().date_naive();

    let done_1 = add_task(&fixture, "Derive impulse relation", true);
    add_task(&fixture, "Problem set 3", true);
    add_task(&fixture, "Problem set 4", false);
    add_task(&fixture, "Read chapter 9", false);
    add_focus_session(&fixture, &done_1, 150);
    add_focus_session(&fixture, &done_1, 150);

    let health = subject_health(&fixture.store, &fixture.subject_id, today).unwrap();
    // completion 0.5, consistency 1/14, study 300/600, nothing missed:
    // 100 * (0.20 + 0.01786 + 0.125 + 0.10) = 44.3 -> 44
    assert_eq!(health.score, 44);
    assert_eq!(health.level, HealthLevel::NeedsAttention);
    assert_eq!(health.study_minutes, 300);
    assert_eq!(health.missed_count, 0);
}

#[test]
fn unknown_subject_scores_neutral() {
    let fixture = seeded_store();
    let today = Utc::now().date_naive();
    let health = subject_health(&fixture.store, "no-such-subject", today).unwrap();
    assert_eq!(health.score, 50);
    assert_eq!(health.level, HealthLevel::Good);
}

#[test]
fn confidence_rating_drives_revision_suggestions() {
    let fixture = seeded_store();
    let now = Utc::now();

    planner::set_confidence(&fixture.store, &fixture.sub_topic_id, ConfidenceLevel::Low, now)
        .unwrap();

    let suggestions = revision_suggestions(&fixture.store, now, 5);
    assert_eq!(suggestions.len(), 1);
    // Just reviewed (gap 0) + low confidence (30) + hard (15) = 45.
    assert_eq!(suggestions[0].score, 45);
    assert_eq!(suggestions[0].reason, RevisionReason::LowConfidence);
    assert_eq!(suggestions[0].sub_topic_id, fixture.sub_topic_id);
}

#[test]
fn high_confidence_just_reviewed_produces_no_suggestion() {
    let fixture = seeded_store();
    let now = Utc::now();
    planner::set_confidence(&fixture.store, &fixture.sub_topic_id, ConfidenceLevel::High, now)
        .unwrap();
    // Gap 0 + high (0) + hard (15) = 15: under the noise floor.
    assert!(revision_suggestions(&fixture.store, now, 5).is_empty());
}

#[test]
fn exam_mode_boosts_and_rewords_suggestions() {
    let fixture = seeded_store();
    let now = Utc::now();
    let today = now.date_naive();

    planner::set_confidence(&fixture.store, &fixture.sub_topic_id, ConfidenceLevel::Low, now)
        .unwrap();
    planner::set_exam(&fixture.store, "Mechanics final", today + Duration::days(3), today)
        .unwrap();

    let suggestions = revision_suggestions(&fixture.store, now, 5);
    // 45 from confidence and difficulty, plus 15 - 3 = 12 exam points.
    assert_eq!(suggestions[0].score, 57);
    assert_eq!(suggestions[0].reason, RevisionReason::ExamSoon);
}

#[test]
fn capacity_insights_end_to_end() {
    let fixture = seeded_store();
    let today = Utc::now().date_naive();

    assert!(capacity_insights(&fixture.store, today).is_none());

    planner::set_capacity(
        &fixture.store,
        &studyflow_core::model::UserCapacity {
            max_tasks_per_day: 5,
            max_daily_focus_minutes: 240,
            default_focus_minutes: 25,
            default_break_minutes: 5,
            recommended_sessions_per_day: 2,
        },
    )
    .unwrap();

    let task = add_task(&fixture, "Past paper 2019", false);
    add_task(&fixture, "Past paper 2020", false);
    add_task(&fixture, "Past paper 2021", false);
    add_task(&fixture, "Past paper 2022", false);
    add_focus_session(&fixture, &task, 150);
    add_focus_session(&fixture, &task, 150);

    let insights = capacity_insights(&fixture.store, today).unwrap();
    assert_eq!(insights.days.len(), 7);
    let today_entry = insights.days.last().unwrap();
    // 4/5 tasks, 300/240 minutes capped: (0.8 + 1.0) / 2 = 90.
    assert_eq!(today_entry.score, 90);
    assert!(today_entry.over_capacity);
    assert_eq!(insights.over_capacity_days, 1);
    // 90 over 7 days: 12.857 -> 13; low adherence reads as under-use.
    assert_eq!(insights.average_score, 13);
    assert_eq!(insights.feedback, CapacityFeedback::RoomToGrow);
    // No session had a target, so none count as completed.
    assert_eq!(insights.session_completion_rate, 0);
}

#[test]
fn weekly_review_end_to_end() {
    let fixture = seeded_store();
    let today = Utc::now().date_naive();

    let task = add_task(&fixture, "Flashcards", true);
    add_focus_session(&fixture, &task, 50);
    add_focus_session(&fixture, &task, 25);

    let review = weekly_review(&fixture.store, today).unwrap();
    assert_eq!(review.session_count, 2);
    assert_eq!(review.total_focus_minutes, 75);
    assert_eq!(review.tasks_completed, 1);
    assert_eq!(review.active_days, 1);
    assert_eq!(review.avg_session_minutes, 38); // 75 / 2 -> 37.5 -> 38
    assert_eq!(review.quality.unrated, 2);
}

#[test]
fn best_time_needs_enough_history() {
    let fixture = seeded_store();
    let now = Utc::now();
    let task = add_task(&fixture, "Reading", false);

    add_focus_session(&fixture, &task, 30);
    assert!(best_study_time(&fixture.store, now + Duration::seconds(1)).is_none());

    for _ in 0..5 {
        add_focus_session(&fixture, &task, 30);
    }
    // Six sessions, all in the current hour (or split across a boundary);
    // either way one hour now holds at least two.
    assert!(best_study_time(&fixture.store, now + Duration::seconds(1)).is_some());
}
