//! Two-phase study flow: focus -> rest -> complete.
//!
//! Built on two sequential [`FocusTimer`] runs. The flow itself holds no
//! clock state; all time arithmetic lives in the inner timer.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::engine::{FocusTimer, SessionContext, TimerState};
use crate::events::Event;
use crate::model::SessionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowPhase {
    Focus,
    Rest,
    Complete,
}

/// Orchestrates an advanced session: a focus run followed by a rest run.
///
/// On focus completion the rest timer starts immediately; on rest
/// completion (or an explicit skip) the flow is complete with no timer
/// running. The >=10s persistence rule applies to both phases, but quality
/// prompts are only raised for the focus phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowTimer {
    phase: FlowPhase,
    timer: FocusTimer,
    focus_secs: u32,
    rest_secs: u32,
    context: SessionContext,
}

impl FlowTimer {
    /// Create and immediately start the focus phase.
    pub fn start(focus_secs: u32, rest_secs: u32, context: SessionContext) -> (Self, Event) {
        let mut timer = FocusTimer::new();
        let focus_context = SessionContext {
            session_type: SessionType::Focus,
            ..context.clone()
        };
        let event = timer.start(Some(focus_secs), focus_context);
        (
            Self {
                phase: FlowPhase::Focus,
                timer,
                focus_secs,
                rest_secs,
                context,
            },
            event,
        )
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms()
    }

    pub fn snapshot(&self) -> Event {
        match self.timer.snapshot() {
            Event::StateSnapshot {
                state,
                session_type,
                elapsed_ms,
                target_ms,
                progress,
                at,
                ..
            } => Event::StateSnapshot {
                state,
                phase: Some(self.phase),
                session_type,
                elapsed_ms,
                target_ms,
                progress,
                at,
            },
            other => other,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Delegate to the inner timer; drives phase transitions.
    ///
    /// Focus target reached: the focus outcome is emitted and the rest
    /// timer starts in the same call. Rest target reached: the flow
    /// completes.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(completed) = self.timer.tick() else {
            return events;
        };
        match self.phase {
            FlowPhase::Focus => {
                events.push(completed);
                let rest_context = SessionContext {
                    session_type: SessionType::Rest,
                    ..self.context.clone()
                };
                self.timer.start(Some(self.rest_secs), rest_context);
                self.phase = FlowPhase::Rest;
                events.push(Event::RestStarted {
                    target_secs: self.rest_secs,
                    at: Utc::now(),
                });
            }
            FlowPhase::Rest => {
                events.push(Self::suppress_prompt(completed));
                self.phase = FlowPhase::Complete;
                events.push(Event::FlowCompleted { at: Utc::now() });
            }
            FlowPhase::Complete => {}
        }
        events
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.timer.resume()
    }

    /// Force-transition to complete without waiting for the rest target.
    /// No-op unless resting.
    pub fn skip_rest(&mut self) -> Vec<Event> {
        if self.phase != FlowPhase::Rest {
            return Vec::new();
        }
        let mut events = Vec::new();
        if let Some(stopped) = self.timer.stop() {
            events.push(Self::suppress_prompt(stopped));
        }
        self.phase = FlowPhase::Complete;
        events.push(Event::FlowCompleted { at: Utc::now() });
        events
    }

    /// Abandon the flow mid-phase; the live run stops and its outcome is
    /// surfaced so a long-enough partial session still persists.
    pub fn abandon(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(stopped) = self.timer.stop() {
            events.push(match self.phase {
                FlowPhase::Rest => Self::suppress_prompt(stopped),
                _ => stopped,
            });
        }
        self.phase = FlowPhase::Complete;
        events.push(Event::FlowCompleted { at: Utc::now() });
        events
    }

    /// Rest runs never raise the quality prompt.
    fn suppress_prompt(event: Event) -> Event {
        match event {
            Event::TimerCompleted { mut outcome, at } => {
                outcome.quality_prompt_minutes = None;
                Event::TimerCompleted { outcome, at }
            }
            Event::TimerStopped { mut outcome, at } => {
                outcome.quality_prompt_minutes = None;
                Event::TimerStopped { outcome, at }
            }
            other => other,
        }
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, ms: u64) {
        self.timer.backdate(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::StopOutcome;

    fn outcome_of(event: &Event) -> &StopOutcome {
        match event {
            Event::TimerCompleted { outcome, .. } | Event::TimerStopped { outcome, .. } => outcome,
            other => panic!("Expected a stop-carrying event, got {:?}", other),
        }
    }

    #[test]
    fn focus_completion_starts_rest() {
        let (mut flow, _) = FlowTimer::start(1500, 300, SessionContext::bare(SessionType::Focus));
        assert_eq!(flow.phase(), FlowPhase::Focus);

        flow.backdate(1_500_000);
        let events = flow.tick();
        assert_eq!(events.len(), 2);
        let focus = outcome_of(&events[0]);
        let session = focus.session.as_ref().expect("focus session persists");
        assert_eq!(session.session_type, SessionType::Focus);
        assert_eq!(focus.quality_prompt_minutes, Some(25));
        assert!(matches!(events[1], Event::RestStarted { target_secs: 300, .. }));
        assert_eq!(flow.phase(), FlowPhase::Rest);
        assert_eq!(flow.timer_state(), TimerState::Running);
    }

    #[test]
    fn rest_completion_finishes_flow() {
        let (mut flow, _) = FlowTimer::start(1500, 300, SessionContext::bare(SessionType::Focus));
        flow.backdate(1_500_000);
        flow.tick();
        flow.backdate(300_000);
        let events = flow.tick();
        let rest = outcome_of(&events[0]);
        let session = rest.session.as_ref().expect("5-minute rest persists");
        assert_eq!(session.session_type, SessionType::Rest);
        assert!(rest.quality_prompt_minutes.is_none());
        assert!(matches!(events[1], Event::FlowCompleted { .. }));
        assert_eq!(flow.phase(), FlowPhase::Complete);
        assert_eq!(flow.timer_state(), TimerState::Idle);
    }

    #[test]
    fn skip_rest_completes_immediately() {
        let (mut flow, _) = FlowTimer::start(1500, 300, SessionContext::bare(SessionType::Focus));
        flow.backdate(1_500_000);
        flow.tick();

        flow.backdate(5_000);
        let events = flow.skip_rest();
        // 5s rest is under the persistence threshold.
        assert!(outcome_of(&events[0]).session.is_none());
        assert!(matches!(events.last(), Some(Event::FlowCompleted { .. })));
        assert_eq!(flow.phase(), FlowPhase::Complete);
    }

    #[test]
    fn skip_rest_is_noop_during_focus() {
        let (mut flow, _) = FlowTimer::start(1500, 300, SessionContext::bare(SessionType::Focus));
        assert!(flow.skip_rest().is_empty());
        assert_eq!(flow.phase(), FlowPhase::Focus);
    }

    #[test]
    fn abandon_persists_long_partial_focus() {
        let (mut flow, _) = FlowTimer::start(1500, 300, SessionContext::bare(SessionType::Focus));
        flow.backdate(600_000);
        let events = flow.abandon();
        let outcome = outcome_of(&events[0]);
        assert_eq!(outcome.session.as_ref().unwrap().duration_seconds, 600);
        assert_eq!(outcome.quality_prompt_minutes, Some(10));
        assert_eq!(flow.phase(), FlowPhase::Complete);
    }
}
