//! Best-study-time detection.
//!
//! Buckets the trailing month of focus sessions by start hour and scores
//! each hour by average length weighted by self-rated quality. Needs
//! enough signal before it says anything: at least five sessions overall
//! and two in an hour before that hour is a candidate.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{FocusSession, SessionType};
use crate::storage::Datastore;

const WINDOW_DAYS: i64 = 30;
const MIN_SESSIONS: usize = 5;
const MIN_SESSIONS_PER_HOUR: usize = 2;
/// Quality weight for sessions the user never rated.
const UNRATED_QUALITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

impl TimeBand {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeBand::Morning,
            12..=16 => TimeBand::Afternoon,
            17..=20 => TimeBand::Evening,
            _ => TimeBand::LateNight,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBand::Morning => "in the morning",
            TimeBand::Afternoon => "in the afternoon",
            TimeBand::Evening => "in the evening",
            TimeBand::LateNight => "late at night",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestTimeInsight {
    /// Winning hour of day (0-23).
    pub hour: u32,
    pub band: TimeBand,
    pub session_count: u32,
    pub avg_minutes: f64,
}

/// Detect the best study hour from already-fetched sessions.
///
/// Ties break toward the earliest hour, so the result is deterministic
/// regardless of input ordering.
pub fn detect_best_time(sessions: &[FocusSession]) -> Option<BestTimeInsight> {
    if sessions.len() < MIN_SESSIONS {
        return None;
    }

    struct HourBucket {
        count: usize,
        total_minutes: f64,
        total_quality: f64,
    }

    let mut buckets: [Option<HourBucket>; 24] = std::array::from_fn(|_| None);
    for session in sessions {
        let hour = session.started_at.hour() as usize;
        let bucket = buckets[hour].get_or_insert(HourBucket {
            count: 0,
            total_minutes: 0.0,
            total_quality: 0.0,
        });
        bucket.count += 1;
        bucket.total_minutes += f64::from(session.duration_seconds) / 60.0;
        bucket.total_quality += session
            .quality_rating
            .map(|q| q.weight())
            .unwrap_or(UNRATED_QUALITY);
    }

    let mut best: Option<(u32, f64, &HourBucket)> = None;
    for (hour, bucket) in buckets.iter().enumerate() {
        let Some(bucket) = bucket else { continue };
        if bucket.count < MIN_SESSIONS_PER_HOUR {
            continue;
        }
        let avg_minutes = bucket.total_minutes / bucket.count as f64;
        let avg_quality = bucket.total_quality / bucket.count as f64;
        let score = avg_minutes * (1.0 + avg_quality);
        // Strict comparison keeps the earliest hour on ties.
        if best.map(|(_, s, _)| score > s).unwrap_or(true) {
            best = Some((hour as u32, score, bucket));
        }
    }

    best.map(|(hour, _, bucket)| BestTimeInsight {
        hour,
        band: TimeBand::from_hour(hour),
        session_count: bucket.count as u32,
        avg_minutes: bucket.total_minutes / bucket.count as f64,
    })
}

/// Fetch the trailing month of focus sessions and detect. Degrades to
/// `None` on fetch failure.
pub fn best_study_time<S: Datastore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> Option<BestTimeInsight> {
    match store.sessions_between(now - Duration::days(WINDOW_DAYS), now) {
        Ok(sessions) => {
            let focus: Vec<FocusSession> = sessions
                .into_iter()
                .filter(|s| s.session_type == SessionType::Focus)
                .collect();
            detect_best_time(&focus)
        }
        Err(e) => {
            log::debug!("best-time detection degraded: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QualityRating;
    use chrono::TimeZone;

    fn session_at(hour: u32, minutes: u32, quality: Option<QualityRating>) -> FocusSession {
        let started_at = Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap();
        FocusSession {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: None,
            topic_id: None,
            sub_topic_id: None,
            task_id: None,
            duration_seconds: minutes * 60,
            target_duration_seconds: None,
            started_at,
            ended_at: started_at,
            session_type: SessionType::Focus,
            quality_rating: quality,
        }
    }

    #[test]
    fn too_few_sessions_is_no_signal() {
        let sessions: Vec<FocusSession> =
            (0..4).map(|_| session_at(9, 30, None)).collect();
        assert!(detect_best_time(&sessions).is_none());
    }

    #[test]
    fn lone_session_hours_are_not_candidates() {
        // Five sessions, but every hour has only one.
        let sessions: Vec<FocusSession> =
            (8..13).map(|h| session_at(h, 30, None)).collect();
        assert!(detect_best_time(&sessions).is_none());
    }

    #[test]
    fn quality_outweighs_raw_minutes() {
        let mut sessions = vec![
            session_at(9, 30, Some(QualityRating::Focused)),
            session_at(9, 30, Some(QualityRating::Focused)),
        ];
        sessions.push(session_at(21, 40, Some(QualityRating::Distracted)));
        sessions.push(session_at(21, 40, Some(QualityRating::Distracted)));
        sessions.push(session_at(21, 40, Some(QualityRating::Distracted)));
        // 9am: 30 * (1 + 1.0) = 60; 9pm: 40 * (1 + 0.0) = 40.
        let best = detect_best_time(&sessions).unwrap();
        assert_eq!(best.hour, 9);
        assert_eq!(best.band, TimeBand::Morning);
    }

    #[test]
    fn unrated_sessions_count_half_quality() {
        let sessions = vec![
            session_at(14, 40, None),
            session_at(14, 40, None),
            session_at(9, 30, Some(QualityRating::Focused)),
            session_at(9, 30, Some(QualityRating::Focused)),
            session_at(23, 10, None),
        ];
        // 2pm: 40 * 1.5 = 60; 9am: 30 * 2.0 = 60 -> tie, earliest hour wins.
        let best = detect_best_time(&sessions).unwrap();
        assert_eq!(best.hour, 9);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(TimeBand::from_hour(5), TimeBand::Morning);
        assert_eq!(TimeBand::from_hour(11), TimeBand::Morning);
        assert_eq!(TimeBand::from_hour(12), TimeBand::Afternoon);
        assert_eq!(TimeBand::from_hour(16), TimeBand::Afternoon);
        assert_eq!(TimeBand::from_hour(17), TimeBand::Evening);
        assert_eq!(TimeBand::from_hour(20), TimeBand::Evening);
        assert_eq!(TimeBand::from_hour(21), TimeBand::LateNight);
        assert_eq!(TimeBand::from_hour(2), TimeBand::LateNight);
    }
}
