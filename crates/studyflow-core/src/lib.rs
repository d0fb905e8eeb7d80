//! # Studyflow Core Library
//!
//! This library provides the core business logic for the Studyflow study
//! planner. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary; any GUI would be a thin layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Timer**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Insights**: Pure analyzers (health, revision ranking, capacity
//!   adherence, weekly review, best study time) plus fetch wrappers that
//!   degrade to `None` on failure
//! - **Planner**: Validated writes (tasks, confidence ratings, sessions)
//! - **Storage**: A `Datastore` trait with SQLite and in-memory
//!   implementations, TOML configuration, and key-value preferences
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Core timer state machine
//! - [`FlowTimer`]: Two-phase focus/rest orchestration
//! - [`SqliteStore`]: Record persistence
//! - [`Event`]: State-change notifications for polling frontends

pub mod error;
pub mod events;
pub mod insights;
pub mod model;
pub mod planner;
pub mod storage;
pub mod timer;
mod util;

pub use error::{ConfigError, CoreError, DatastoreError, ValidationError};
pub use events::Event;
pub use insights::{
    BestTimeInsight, CapacityInsights, HealthLevel, RevisionSuggestion, SubjectHealth,
    WeeklyReview,
};
pub use storage::{Config, Datastore, MemoryStore, Preferences, SqliteStore, Theme};
pub use timer::{FlowPhase, FlowTimer, FocusTimer, SessionContext, StopOutcome, TimerState};
pub use util::format_minutes;
