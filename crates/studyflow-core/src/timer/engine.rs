//! Focus timer implementation.
//!
//! The timer is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` periodically.
//! Elapsed time is always re-derived from absolute timestamps, never
//! incremented, so missed ticks or app suspension cannot drift it and a
//! redundant `tick()` is a no-op.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new();
//! timer.start(Some(25 * 60), SessionContext::bare(SessionType::Focus));
//! // In a loop:
//! timer.tick(); // Returns Some(Event::TimerCompleted) when the target is reached
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::model::{NewFocusSession, SessionType};

/// Sessions shorter than this are discarded on stop: no record, no prompt.
pub const MIN_PERSIST_SECS: u32 = 10;
/// Sessions at least this long are eligible for the quality prompt.
pub const QUALITY_PROMPT_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// What the in-progress session is attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub subject_id: Option<String>,
    pub topic_id: Option<String>,
    pub sub_topic_id: Option<String>,
    pub task_id: Option<String>,
    pub session_type: SessionType,
}

impl SessionContext {
    /// A context with no links, just a session type.
    pub fn bare(session_type: SessionType) -> Self {
        Self {
            subject_id: None,
            topic_id: None,
            sub_topic_id: None,
            task_id: None,
            session_type,
        }
    }
}

/// Result of stopping the timer.
///
/// `session` is `None` when the run was shorter than [`MIN_PERSIST_SECS`];
/// `quality_prompt_minutes` is `Some` (rounded-down whole minutes) only when
/// the run reached [`QUALITY_PROMPT_SECS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopOutcome {
    pub session: Option<NewFocusSession>,
    pub quality_prompt_minutes: Option<u32>,
}

/// Core focus timer.
///
/// Operates on wall-clock deltas -- no internal thread. Serializable so a
/// CLI can persist it between invocations; a reloaded timer keeps counting
/// correctly because elapsed derives from the stored anchor timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    state: TimerState,
    /// Anchor (ms since epoch) that elapsed is derived from while running.
    /// Re-anchored to `now - elapsed` on resume.
    #[serde(default)]
    anchor_epoch_ms: Option<u64>,
    /// Elapsed milliseconds, flushed from the anchor on pause/stop.
    elapsed_ms: u64,
    target_ms: Option<u64>,
    /// Wall-clock start of the session, kept for the record.
    started_at: Option<chrono::DateTime<Utc>>,
    context: Option<SessionContext>,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            anchor_epoch_ms: None,
            elapsed_ms: 0,
            target_ms: None,
            started_at: None,
            context: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Elapsed milliseconds as of now.
    pub fn elapsed_ms(&self) -> u64 {
        match (self.state, self.anchor_epoch_ms) {
            (TimerState::Running, Some(anchor)) => now_ms().saturating_sub(anchor),
            _ => self.elapsed_ms,
        }
    }

    pub fn target_ms(&self) -> Option<u64> {
        self.target_ms
    }

    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    /// 0.0 .. 1.0 progress toward the target; 0.0 when no target is set.
    pub fn progress(&self) -> f64 {
        match self.target_ms {
            Some(target) if target > 0 => (self.elapsed_ms() as f64 / target as f64).min(1.0),
            _ => 0.0,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: None,
            session_type: self.context.as_ref().map(|c| c.session_type),
            elapsed_ms: self.elapsed_ms(),
            target_ms: self.target_ms,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session.
    ///
    /// If a session is already running or paused it is stopped first; its
    /// outcome rides along on the returned event so the caller can persist
    /// it. Only one session is ever live.
    pub fn start(&mut self, target_secs: Option<u32>, context: SessionContext) -> Event {
        let interrupted = match self.state {
            TimerState::Idle => None,
            _ => Some(self.finish()),
        };
        let session_type = context.session_type;
        self.state = TimerState::Running;
        self.anchor_epoch_ms = Some(now_ms());
        self.elapsed_ms = 0;
        self.target_ms = target_secs.map(|s| u64::from(s) * 1000);
        self.started_at = Some(Utc::now());
        self.context = Some(context);
        Event::TimerStarted {
            session_type,
            target_secs,
            interrupted,
            at: Utc::now(),
        }
    }

    /// No-op unless running.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.flush_elapsed();
                self.state = TimerState::Paused;
                self.anchor_epoch_ms = None;
                Some(Event::TimerPaused {
                    elapsed_ms: self.elapsed_ms,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// No-op unless paused. Re-anchors so elapsed keeps deriving from the
    /// wall clock.
    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.anchor_epoch_ms = Some(now_ms().saturating_sub(self.elapsed_ms));
                Some(Event::TimerResumed {
                    elapsed_ms: self.elapsed_ms,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Call periodically while a session is live. Returns
    /// `Some(Event::TimerCompleted)` when the target is reached; the timer
    /// has already stopped itself by then.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed();
        match self.target_ms {
            Some(target) if self.elapsed_ms >= target => {
                let outcome = self.finish();
                Some(Event::TimerCompleted {
                    outcome,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Stop the current session. Always leaves the timer idle; `None` when
    /// there was nothing to stop.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state == TimerState::Idle {
            return None;
        }
        let outcome = self.finish();
        Some(Event::TimerStopped {
            outcome,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self) {
        if let Some(anchor) = self.anchor_epoch_ms {
            self.elapsed_ms = now_ms().saturating_sub(anchor);
        }
    }

    /// Clear all session state and build the stop outcome.
    fn finish(&mut self) -> StopOutcome {
        if self.state == TimerState::Running {
            self.flush_elapsed();
        }
        let duration_seconds = (self.elapsed_ms / 1000) as u32;
        let target_duration_seconds = self.target_ms.map(|ms| (ms / 1000) as u32);
        let started_at = self.started_at.unwrap_or_else(Utc::now);
        let context = self.context.take();

        self.state = TimerState::Idle;
        self.anchor_epoch_ms = None;
        self.elapsed_ms = 0;
        self.target_ms = None;
        self.started_at = None;

        if duration_seconds < MIN_PERSIST_SECS {
            return StopOutcome {
                session: None,
                quality_prompt_minutes: None,
            };
        }
        let context = context.unwrap_or_else(|| SessionContext::bare(SessionType::Focus));
        let session = NewFocusSession {
            subject_id: context.subject_id,
            topic_id: context.topic_id,
            sub_topic_id: context.sub_topic_id,
            task_id: context.task_id,
            duration_seconds,
            target_duration_seconds,
            started_at,
            ended_at: Utc::now(),
            session_type: context.session_type,
        };
        StopOutcome {
            session: Some(session),
            quality_prompt_minutes: if duration_seconds >= QUALITY_PROMPT_SECS {
                Some(duration_seconds / 60)
            } else {
                None
            },
        }
    }

    /// Shift the anchor into the past to simulate elapsed wall-clock time.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, ms: u64) {
        if let Some(anchor) = self.anchor_epoch_ms.as_mut() {
            *anchor = anchor.saturating_sub(ms);
        } else {
            self.elapsed_ms += ms;
        }
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
