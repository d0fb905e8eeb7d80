use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{FlowPhase, StopOutcome, TimerState};
use crate::model::SessionType;

/// Every timer state change produces an Event.
/// A GUI polls for events; the CLI prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        target_secs: Option<u32>,
        /// Outcome of the session that was implicitly stopped, if a timer
        /// was already live when `start` was called.
        interrupted: Option<StopOutcome>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// Explicit stop by the user.
    TimerStopped {
        outcome: StopOutcome,
        at: DateTime<Utc>,
    },
    /// Target duration reached; the timer stopped itself during `tick`.
    TimerCompleted {
        outcome: StopOutcome,
        at: DateTime<Utc>,
    },
    /// Two-phase flow advanced into its rest phase.
    RestStarted {
        target_secs: u32,
        at: DateTime<Utc>,
    },
    /// Two-phase flow reached its terminal phase.
    FlowCompleted {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Option<FlowPhase>,
        session_type: Option<SessionType>,
        elapsed_ms: u64,
        target_ms: Option<u64>,
        /// 0.0 .. 1.0 within the target, 0.0 when no target is set.
        progress: f64,
        at: DateTime<Utc>,
    },
}
