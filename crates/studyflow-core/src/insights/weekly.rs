//! Weekly review aggregation over the trailing seven days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatastoreError;
use crate::model::{FocusSession, QualityRating, SessionType};
use crate::storage::Datastore;
use crate::util::{day_bounds, window_start};

const WINDOW_DAYS: u64 = 7;

/// Count of sessions per self-rated quality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityCounts {
    pub focused: u32,
    pub okay: u32,
    pub distracted: u32,
    pub unrated: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReview {
    pub week_start: NaiveDate,
    pub total_focus_minutes: u32,
    pub session_count: u32,
    pub tasks_completed: u32,
    /// Days in the window with at least one focus session.
    pub active_days: u32,
    pub avg_session_minutes: u32,
    pub quality: QualityCounts,
    /// Day with the most focus minutes; `None` for an idle week.
    pub busiest_day: Option<NaiveDate>,
}

/// Build the review from already-fetched inputs. `sessions` must already
/// be restricted to the window.
pub fn build_weekly_review(
    sessions: &[FocusSession],
    tasks_completed: u32,
    today: NaiveDate,
) -> WeeklyReview {
    let week_start = window_start(today, WINDOW_DAYS);
    let focus: Vec<&FocusSession> = sessions
        .iter()
        .filter(|s| s.session_type == SessionType::Focus)
        .collect();

    let total_focus_minutes: u32 = focus.iter().map(|s| s.duration_minutes()).sum();
    let session_count = focus.len() as u32;
    let avg_session_minutes = if session_count == 0 {
        0
    } else {
        (f64::from(total_focus_minutes) / f64::from(session_count)).round() as u32
    };

    let mut quality = QualityCounts::default();
    for session in &focus {
        match session.quality_rating {
            Some(QualityRating::Focused) => quality.focused += 1,
            Some(QualityRating::Okay) => quality.okay += 1,
            Some(QualityRating::Distracted) => quality.distracted += 1,
            None => quality.unrated += 1,
        }
    }

    // Per-day focus minutes; earliest day wins a tie for busiest.
    let mut by_day: Vec<(NaiveDate, u32)> = Vec::new();
    for session in &focus {
        let day = session.started_at.date_naive();
        match by_day.iter_mut().find(|(d, _)| *d == day) {
            Some((_, minutes)) => *minutes += session.duration_minutes(),
            None => by_day.push((day, session.duration_minutes())),
        }
    }
    by_day.sort_by_key(|(d, _)| *d);
    let active_days = by_day.len() as u32;
    let mut busiest: Option<(NaiveDate, u32)> = None;
    for (day, minutes) in &by_day {
        // Strict comparison keeps the earliest day on ties.
        if busiest.map(|(_, m)| *minutes > m).unwrap_or(true) {
            busiest = Some((*day, *minutes));
        }
    }
    let busiest_day = busiest.map(|(d, _)| d);

    WeeklyReview {
        week_start,
        total_focus_minutes,
        session_count,
        tasks_completed,
        active_days,
        avg_session_minutes,
        quality,
        busiest_day,
    }
}

/// Fetch the trailing week and build the review. Degrades to `None` on
/// fetch failure.
pub fn weekly_review<S: Datastore + ?Sized>(store: &S, today: NaiveDate) -> Option<WeeklyReview> {
    match fetch_and_compute(store, today) {
        Ok(review) => Some(review),
        Err(e) => {
            log::debug!("weekly review degraded: {e}");
            None
        }
    }
}

fn fetch_and_compute<S: Datastore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> Result<WeeklyReview, DatastoreError> {
    let (from, _) = day_bounds(window_start(today, WINDOW_DAYS));
    let (_, to) = day_bounds(today);
    let sessions = store.sessions_between(from, to)?;
    let tasks_completed = store.count_tasks_completed_between(from, to)?;
    Ok(build_weekly_review(&sessions, tasks_completed, today))
}
