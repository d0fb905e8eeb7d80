//! Revision priority ranking.
//!
//! Four additive, individually-capped factors produce a 0-100 urgency
//! score per sub-topic. A single human-readable reason is chosen by a
//! fixed priority order, not by the largest factor.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ConfidenceLevel, Difficulty, ExamMode, SubTopic};
use crate::storage::Datastore;

/// Factor weight: days since last review, saturating at two weeks.
const REVIEW_GAP_MAX_POINTS: f64 = 40.0;
const REVIEW_GAP_SATURATION_DAYS: f64 = 14.0;
/// Sentinel gap for sub-topics that were never reviewed.
const NEVER_REVIEWED_DAYS: i64 = 30;
/// Exams further out than this contribute nothing.
const EXAM_HORIZON_DAYS: i64 = 14;
/// Suggestions below this score are noise and are dropped.
const MIN_SUGGESTION_SCORE: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionReason {
    ExamSoon,
    LowConfidence,
    HardTopic,
    NotReviewedRecently,
    DueForRevision,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionSuggestion {
    pub sub_topic_id: String,
    pub sub_topic_name: String,
    pub score: u8,
    pub reason: RevisionReason,
    pub reason_text: String,
}

/// Rank sub-topics by revision urgency from already-fetched inputs.
///
/// Output is sorted non-increasing by score (ties keep input order),
/// contains no entry below [`MIN_SUGGESTION_SCORE`], and is truncated to
/// `limit`.
pub fn rank_revisions(
    sub_topics: &[SubTopic],
    confidence: &HashMap<String, ConfidenceLevel>,
    last_review: &HashMap<String, DateTime<Utc>>,
    active_exam: Option<&ExamMode>,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<RevisionSuggestion> {
    let today = now.date_naive();
    let exam_days_away = active_exam
        .filter(|e| e.is_active)
        .map(|e| e.days_away(today))
        .filter(|d| (0..=EXAM_HORIZON_DAYS).contains(d));

    let mut suggestions: Vec<RevisionSuggestion> = sub_topics
        .iter()
        .filter_map(|sub_topic| {
            score_sub_topic(sub_topic, confidence, last_review, exam_days_away, now)
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions.truncate(limit);
    suggestions
}

fn score_sub_topic(
    sub_topic: &SubTopic,
    confidence: &HashMap<String, ConfidenceLevel>,
    last_review: &HashMap<String, DateTime<Utc>>,
    exam_days_away: Option<i64>,
    now: DateTime<Utc>,
) -> Option<RevisionSuggestion> {
    let days_since_review = last_review
        .get(&sub_topic.id)
        .map(|at| (now - *at).num_days().max(0))
        .unwrap_or(NEVER_REVIEWED_DAYS);

    // A never-rated sub-topic is treated as low confidence, mirroring the
    // never-reviewed sentinel.
    let level = confidence
        .get(&sub_topic.id)
        .copied()
        .unwrap_or(ConfidenceLevel::Low);
    let difficulty = sub_topic.difficulty.unwrap_or(Difficulty::Medium);

    let gap_factor =
        (days_since_review as f64 / REVIEW_GAP_SATURATION_DAYS).min(1.0) * REVIEW_GAP_MAX_POINTS;
    let confidence_factor = match level {
        ConfidenceLevel::Low => 30.0,
        ConfidenceLevel::Medium => 15.0,
        ConfidenceLevel::High => 0.0,
    };
    let difficulty_factor = match difficulty {
        Difficulty::Hard => 15.0,
        Difficulty::Medium => 8.0,
        Difficulty::Easy => 0.0,
    };
    let exam_factor = exam_days_away
        .map(|days| (15 - days).max(0) as f64)
        .unwrap_or(0.0);

    let score = (gap_factor + confidence_factor + difficulty_factor + exam_factor)
        .round()
        .min(100.0) as u8;
    if score < MIN_SUGGESTION_SCORE {
        return None;
    }

    // First match wins, even when several factors contributed.
    let (reason, reason_text) = if exam_days_away.map(|d| d <= 7).unwrap_or(false) {
        (
            RevisionReason::ExamSoon,
            format!("Exam coming up — revise {} now", sub_topic.name),
        )
    } else if level == ConfidenceLevel::Low {
        (
            RevisionReason::LowConfidence,
            format!("You rated {} low confidence", sub_topic.name),
        )
    } else if difficulty == Difficulty::Hard {
        (
            RevisionReason::HardTopic,
            format!("{} is a hard topic — keep it fresh", sub_topic.name),
        )
    } else if days_since_review >= 7 {
        (
            RevisionReason::NotReviewedRecently,
            format!("{} days since you last reviewed {}", days_since_review, sub_topic.name),
        )
    } else {
        (
            RevisionReason::DueForRevision,
            format!("{} is due for revision", sub_topic.name),
        )
    };

    Some(RevisionSuggestion {
        sub_topic_id: sub_topic.id.clone(),
        sub_topic_name: sub_topic.name.clone(),
        score,
        reason,
        reason_text,
    })
}

/// Fetch all ranking inputs and rank. Degrades to an empty list on any
/// fetch failure.
pub fn revision_suggestions<S: Datastore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<RevisionSuggestion> {
    match fetch_inputs(store) {
        Ok((sub_topics, confidence, last_review, exam)) => rank_revisions(
            &sub_topics,
            &confidence,
            &last_review,
            exam.as_ref(),
            now,
            limit,
        ),
        Err(e) => {
            log::debug!("revision ranking degraded: {e}");
            Vec::new()
        }
    }
}

type RankingInputs = (
    Vec<SubTopic>,
    HashMap<String, ConfidenceLevel>,
    HashMap<String, DateTime<Utc>>,
    Option<ExamMode>,
);

fn fetch_inputs<S: Datastore + ?Sized>(
    store: &S,
) -> Result<RankingInputs, crate::error::DatastoreError> {
    let sub_topics = store.all_sub_topics()?;
    let confidence = store
        .confidence_ratings()?
        .into_iter()
        .map(|r| (r.sub_topic_id, r.level))
        .collect();
    let last_review = store.last_review_times()?;
    let exam = store.active_exam()?;
    Ok((sub_topics, confidence, last_review, exam))
}
