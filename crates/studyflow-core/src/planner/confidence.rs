use chrono::{DateTime, Utc};

use super::require_user;
use crate::error::Result;
use crate::model::ConfidenceLevel;
use crate::storage::Datastore;

/// Rate a sub-topic's confidence.
///
/// Two writes, always both: the one-row-per-sub-topic upsert and an
/// append to the revision history log. The history append is what drives
/// "days since last review", so skipping it would freeze the revision
/// ranking for this sub-topic.
pub fn set_confidence<S: Datastore + ?Sized>(
    store: &S,
    sub_topic_id: &str,
    level: ConfidenceLevel,
    at: DateTime<Utc>,
) -> Result<()> {
    require_user(store)?;
    store.upsert_confidence(sub_topic_id, level, at)?;
    store.append_revision(sub_topic_id, at)?;
    Ok(())
}
