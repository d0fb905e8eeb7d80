mod engine;
mod flow;

pub use engine::{
    FocusTimer, SessionContext, StopOutcome, TimerState, MIN_PERSIST_SECS, QUALITY_PROMPT_SECS,
};
pub use flow::{FlowPhase, FlowTimer};
