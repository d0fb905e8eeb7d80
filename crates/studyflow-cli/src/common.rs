//! Shared plumbing for the CLI commands.

use studyflow_core::model::{ConfidenceLevel, Difficulty, Priority, QualityRating};
use studyflow_core::planner::persist_outcome;
use studyflow_core::storage::SqliteStore;
use studyflow_core::timer::{FlowTimer, FocusTimer, StopOutcome};

/// kv keys for the machines persisted between invocations.
pub const TIMER_KEY: &str = "focus_timer";
pub const FLOW_KEY: &str = "flow_timer";

pub fn open_store() -> Result<SqliteStore, Box<dyn std::error::Error>> {
    Ok(SqliteStore::open()?)
}

pub fn load_timer(store: &SqliteStore) -> FocusTimer {
    if let Ok(Some(json)) = store.kv_get(TIMER_KEY) {
        if let Ok(timer) = serde_json::from_str::<FocusTimer>(&json) {
            return timer;
        }
    }
    FocusTimer::new()
}

pub fn save_timer(
    store: &SqliteStore,
    timer: &FocusTimer,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(timer)?;
    store.kv_set(TIMER_KEY, &json)?;
    Ok(())
}

pub fn load_flow(store: &SqliteStore) -> Option<FlowTimer> {
    let json = store.kv_get(FLOW_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

pub fn save_flow(store: &SqliteStore, flow: &FlowTimer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(flow)?;
    store.kv_set(FLOW_KEY, &json)?;
    Ok(())
}

pub fn clear_flow(store: &SqliteStore) -> Result<(), Box<dyn std::error::Error>> {
    store.kv_set(FLOW_KEY, "")?;
    Ok(())
}

/// Persist a stop outcome and point the user at the quality prompt when
/// the session was long enough to deserve one.
pub fn handle_outcome(store: &SqliteStore, outcome: &StopOutcome) {
    let Some(stored) = persist_outcome(store, outcome) else {
        return;
    };
    if let Some(minutes) = outcome.quality_prompt_minutes {
        eprintln!(
            "Recorded a {minutes}-minute session. Rate it: studyflow timer rate --id {} --rating focused|okay|distracted",
            stored.id
        );
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// clap value parsers for the core enums.

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        _ => Err(format!("unknown priority '{s}' (low|medium|high)")),
    }
}

pub fn parse_confidence(s: &str) -> Result<ConfidenceLevel, String> {
    match s {
        "low" => Ok(ConfidenceLevel::Low),
        "medium" => Ok(ConfidenceLevel::Medium),
        "high" => Ok(ConfidenceLevel::High),
        _ => Err(format!("unknown confidence '{s}' (low|medium|high)")),
    }
}

pub fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    match s {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(format!("unknown difficulty '{s}' (easy|medium|hard)")),
    }
}

pub fn parse_rating(s: &str) -> Result<QualityRating, String> {
    match s {
        "focused" => Ok(QualityRating::Focused),
        "okay" => Ok(QualityRating::Okay),
        "distracted" => Ok(QualityRating::Distracted),
        _ => Err(format!("unknown rating '{s}' (focused|okay|distracted)")),
    }
}
