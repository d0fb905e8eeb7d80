//! Capacity adherence over the trailing week.
//!
//! Compares each day's actual task and focus activity against the user's
//! configured limits. Opt-in: users without a capacity record get no
//! insight at all.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatastoreError;
use crate::model::{SessionType, UserCapacity};
use crate::storage::Datastore;
use crate::util::{day_bounds, window_start};

const WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityFeedback {
    GreatBalance,
    GoodRhythm,
    Overloading,
    RoomToGrow,
    FindingBalance,
}

impl CapacityFeedback {
    /// First matching branch wins; the order is part of the contract.
    fn select(avg_adherence: u8, over_capacity_days: u32) -> Self {
        if avg_adherence >= 80 && over_capacity_days == 0 {
            CapacityFeedback::GreatBalance
        } else if avg_adherence >= 60 && over_capacity_days <= 1 {
            CapacityFeedback::GoodRhythm
        } else if over_capacity_days >= 3 {
            CapacityFeedback::Overloading
        } else if avg_adherence < 40 {
            CapacityFeedback::RoomToGrow
        } else {
            CapacityFeedback::FindingBalance
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            CapacityFeedback::GreatBalance => {
                "Great balance — you're working within your limits."
            }
            CapacityFeedback::GoodRhythm => "Good rhythm — mostly on pace with your plan.",
            CapacityFeedback::Overloading => {
                "You're overloading several days a week — consider raising your limits or planning less."
            }
            CapacityFeedback::RoomToGrow => "Room to grow — you planned more than you used.",
            CapacityFeedback::FindingBalance => "Still finding your balance this week.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAdherence {
    pub date: NaiveDate,
    pub tasks_created: u32,
    pub focus_minutes: u32,
    /// 0-100; mean of the capped task and focus ratios.
    pub score: u8,
    /// Breach check, independent of the score: either limit exceeded.
    pub over_capacity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityInsights {
    pub days: Vec<DayAdherence>,
    pub average_score: u8,
    pub over_capacity_days: u32,
    /// 0-100 share of the recommended weekly session count actually met.
    pub session_completion_rate: u32,
    pub feedback: CapacityFeedback,
    pub feedback_text: String,
}

/// Score one day against the configured limits.
pub fn day_adherence(
    capacity: &UserCapacity,
    date: NaiveDate,
    tasks_created: u32,
    focus_minutes: u32,
) -> DayAdherence {
    let task_ratio = capped_ratio(tasks_created, capacity.max_tasks_per_day);
    let focus_ratio = capped_ratio(focus_minutes, capacity.max_daily_focus_minutes);
    let score = (100.0 * (task_ratio + focus_ratio) / 2.0).round() as u8;
    let over_capacity = tasks_created > capacity.max_tasks_per_day
        || focus_minutes > capacity.max_daily_focus_minutes;
    DayAdherence {
        date,
        tasks_created,
        focus_minutes,
        score,
        over_capacity,
    }
}

fn capped_ratio(actual: u32, limit: u32) -> f64 {
    if limit == 0 {
        // Guard only: limits are validated >= 1 when set via the planner.
        return if actual == 0 { 0.0 } else { 1.0 };
    }
    (f64::from(actual) / f64::from(limit)).min(1.0)
}

/// Aggregate a week of daily scores into the full insight.
pub fn summarize_week(
    capacity: &UserCapacity,
    days: Vec<DayAdherence>,
    sessions_completed: u32,
) -> CapacityInsights {
    let total: u32 = days.iter().map(|d| u32::from(d.score)).sum();
    let average_score = if days.is_empty() {
        0
    } else {
        (f64::from(total) / days.len() as f64).round() as u8
    };
    let over_capacity_days = days.iter().filter(|d| d.over_capacity).count() as u32;

    let recommended_week = capacity.recommended_sessions_per_day * WINDOW_DAYS as u32;
    let session_completion_rate = if recommended_week == 0 {
        0
    } else {
        (100.0 * f64::from(sessions_completed) / f64::from(recommended_week)).round() as u32
    };

    let feedback = CapacityFeedback::select(average_score, over_capacity_days);
    CapacityInsights {
        days,
        average_score,
        over_capacity_days,
        session_completion_rate,
        feedback,
        feedback_text: feedback.text().to_string(),
    }
}

/// Fetch the trailing week and compute adherence. `None` when the user has
/// no capacity record, and on any fetch failure.
pub fn capacity_insights<S: Datastore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> Option<CapacityInsights> {
    match fetch_and_compute(store, today) {
        Ok(insights) => insights,
        Err(e) => {
            log::debug!("capacity insight degraded: {e}");
            None
        }
    }
}

fn fetch_and_compute<S: Datastore + ?Sized>(
    store: &S,
    today: NaiveDate,
) -> Result<Option<CapacityInsights>, DatastoreError> {
    let Some(capacity) = store.user_capacity()? else {
        return Ok(None);
    };

    let start = window_start(today, WINDOW_DAYS);
    let mut days = Vec::with_capacity(WINDOW_DAYS as usize);
    let mut sessions_completed = 0u32;
    let mut date = start;
    while date <= today {
        let tasks_created = store.count_tasks_created_on(date)?;
        let (from, to) = day_bounds(date);
        let sessions = store.sessions_between(from, to)?;
        let focus_minutes: u32 = sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Focus)
            .map(|s| s.duration_minutes())
            .sum();
        sessions_completed += sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Focus && s.met_target())
            .count() as u32;
        days.push(day_adherence(&capacity, date, tasks_created, focus_minutes));
        date = date + chrono::Days::new(1);
    }

    Ok(Some(summarize_week(&capacity, days, sessions_completed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity() -> UserCapacity {
        UserCapacity {
            max_tasks_per_day: 5,
            max_daily_focus_minutes: 240,
            default_focus_minutes: 25,
            default_break_minutes: 5,
            recommended_sessions_per_day: 4,
        }
    }

    fn day(score_inputs: (u32, u32)) -> DayAdherence {
        day_adherence(
            &capacity(),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            score_inputs.0,
            score_inputs.1,
        )
    }

    #[test]
    fn daily_score_is_mean_of_capped_ratios() {
        // 4/5 tasks and 120/240 minutes: (0.8 + 0.5) / 2 = 65.
        assert_eq!(day((4, 120)).score, 65);
        // Both over limit: ratios cap at 1.0 each.
        let over = day((10, 500));
        assert_eq!(over.score, 100);
        assert!(over.over_capacity);
    }

    #[test]
    fn at_limit_is_not_over_capacity() {
        let at = day((5, 240));
        assert_eq!(at.score, 100);
        assert!(!at.over_capacity);
    }

    #[test]
    fn feedback_boundaries_are_exact() {
        use CapacityFeedback::*;
        assert_eq!(CapacityFeedback::select(80, 0), GreatBalance);
        assert_eq!(CapacityFeedback::select(80, 1), GoodRhythm);
        assert_eq!(CapacityFeedback::select(79, 0), GoodRhythm);
        assert_eq!(CapacityFeedback::select(60, 1), GoodRhythm);
        assert_eq!(CapacityFeedback::select(59, 3), Overloading);
        assert_eq!(CapacityFeedback::select(90, 3), Overloading);
        assert_eq!(CapacityFeedback::select(39, 0), RoomToGrow);
        assert_eq!(CapacityFeedback::select(40, 2), FindingBalance);
        assert_eq!(CapacityFeedback::select(59, 2), FindingBalance);
    }

    #[test]
    fn weekly_aggregate_rounds_the_mean() {
        let days: Vec<DayAdherence> = [(5, 240), (5, 240), (4, 120), (0, 0), (0, 0), (0, 0), (0, 0)]
            .into_iter()
            .map(day)
            .collect();
        let insights = summarize_week(&capacity(), days, 14);
        // (100 + 100 + 65 + 0*4) / 7 = 37.857 -> 38
        assert_eq!(insights.average_score, 38);
        assert_eq!(insights.over_capacity_days, 0);
        // 14 of 28 recommended sessions.
        assert_eq!(insights.session_completion_rate, 50);
        assert_eq!(insights.feedback, CapacityFeedback::RoomToGrow);
    }

    #[test]
    fn zero_recommended_sessions_rate_is_zero() {
        let mut cap = capacity();
        cap.recommended_sessions_per_day = 0;
        let insights = summarize_week(&cap, Vec::new(), 10);
        assert_eq!(insights.session_completion_rate, 0);
    }

    #[test]
    fn no_capacity_record_yields_none() {
        use crate::storage::MemoryStore;
        let store = MemoryStore::new();
        assert!(capacity_insights(&store, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()).is_none());
    }

    #[test]
    fn fetch_failure_yields_none() {
        use crate::storage::MemoryStore;
        let store = MemoryStore::new();
        store.seed_capacity(capacity());
        store.set_fail_reads(true);
        assert!(capacity_insights(&store, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()).is_none());
    }
}
