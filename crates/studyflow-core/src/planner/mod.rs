//! Validated write operations over the datastore.
//!
//! Every write resolves the current user first and fails fast when there
//! is none; validation happens before any write is attempted.

mod capacity;
mod confidence;
mod sessions;
mod tasks;

pub use capacity::{clear_exam, set_capacity, set_exam};
pub use confidence::set_confidence;
pub use sessions::{persist_outcome, rate_session, record_session};
pub use tasks::{complete_task, create_task};

use crate::error::DatastoreError;
use crate::storage::Datastore;

fn require_user<S: Datastore + ?Sized>(store: &S) -> Result<String, DatastoreError> {
    store
        .current_user_id()
        .ok_or(DatastoreError::NotAuthenticated)
}
