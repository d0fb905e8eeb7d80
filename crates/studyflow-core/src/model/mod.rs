//! Record types owned by the external datastore.
//!
//! The insight engine and planner only ever read or derive from these;
//! derived results (health scores, suggestions, reviews) live with their
//! analyzers under `insights`.

mod capacity;
mod revision;
mod session;
mod structure;
mod task;

pub use capacity::{ExamMode, UserCapacity};
pub use revision::{ConfidenceLevel, ConfidenceRating, RevisionEntry};
pub use session::{FocusSession, NewFocusSession, QualityRating, SessionType};
pub use structure::{Difficulty, SubTopic, Subject, Topic};
pub use task::{NewTask, Priority, Task};
