//! Property tests for the revision ranker's output invariants.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use proptest::prelude::*;
use studyflow_core::insights::rank_revisions;
use studyflow_core::model::{ConfidenceLevel, Difficulty, ExamMode, SubTopic};

fn difficulty_strategy() -> impl Strategy<Value = Option<Difficulty>> {
    prop_oneof![
        Just(None),
        Just(Some(Difficulty::Easy)),
        Just(Some(Difficulty::Medium)),
        Just(Some(Difficulty::Hard)),
    ]
}

fn confidence_strategy() -> impl Strategy<Value = Option<ConfidenceLevel>> {
    prop_oneof![
        Just(None),
        Just(Some(ConfidenceLevel::Low)),
        Just(Some(ConfidenceLevel::Medium)),
        Just(Some(ConfidenceLevel::High)),
    ]
}

#[derive(Debug, Clone)]
struct SubTopicCase {
    difficulty: Option<Difficulty>,
    confidence: Option<ConfidenceLevel>,
    days_since_review: Option<i64>,
}

fn case_strategy() -> impl Strategy<Value = SubTopicCase> {
    (
        difficulty_strategy(),
        confidence_strategy(),
        prop_oneof![Just(None), (0i64..90).prop_map(Some)],
    )
        .prop_map(|(difficulty, confidence, days_since_review)| SubTopicCase {
            difficulty,
            confidence,
            days_since_review,
        })
}

proptest! {
    #[test]
    fn ranking_invariants_hold(
        cases in prop::collection::vec(case_strategy(), 0..40),
        exam_days in prop_oneof![Just(None), (0i64..30).prop_map(Some)],
        limit in 0usize..10,
    ) {
        let now = Utc::now();
        let mut sub_topics = Vec::new();
        let mut confidence = HashMap::new();
        let mut last_review = HashMap::new();
        for (i, case) in cases.iter().enumerate() {
            let id = format!("st-{i}");
            sub_topics.push(SubTopic {
                id: id.clone(),
                topic_id: "topic".into(),
                name: format!("Sub-topic {i}"),
                difficulty: case.difficulty,
            });
            if let Some(level) = case.confidence {
                confidence.insert(id.clone(), level);
            }
            if let Some(days) = case.days_since_review {
                last_review.insert(id.clone(), now - Duration::days(days));
            }
        }
        let exam = exam_days.map(|days| ExamMode {
            name: "Exam".into(),
            exam_date: (now + Duration::days(days)).date_naive(),
            is_active: true,
        });

        let out = rank_revisions(&sub_topics, &confidence, &last_review, exam.as_ref(), now, limit);

        // Never longer than the requested limit.
        prop_assert!(out.len() <= limit);
        // No suggestion below the noise floor, none above 100.
        prop_assert!(out.iter().all(|s| s.score >= 25 && s.score <= 100));
        // Sorted non-increasing by score.
        prop_assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
        // Every suggestion refers to a real input sub-topic.
        prop_assert!(out.iter().all(|s| sub_topics.iter().any(|t| t.id == s.sub_topic_id)));
    }
}
