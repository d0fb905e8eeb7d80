use super::require_user;
use crate::error::Result;
use crate::model::{FocusSession, NewFocusSession, QualityRating};
use crate::storage::Datastore;
use crate::timer::StopOutcome;

/// Insert a stopped timer's session record.
pub fn record_session<S: Datastore + ?Sized>(
    store: &S,
    session: NewFocusSession,
) -> Result<FocusSession> {
    require_user(store)?;
    Ok(store.insert_session(session)?)
}

/// Persist a stop outcome, fire-and-forget.
///
/// A failed write is logged and swallowed: the timer has already cleared
/// its in-memory state, and surfacing the failure would resurrect a ghost
/// session. Returns the stored record when one was written.
pub fn persist_outcome<S: Datastore + ?Sized>(
    store: &S,
    outcome: &StopOutcome,
) -> Option<FocusSession> {
    let draft = outcome.session.as_ref()?;
    match record_session(store, draft.clone()) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("failed to persist focus session: {e}");
            None
        }
    }
}

/// Attach a self-rated quality after the post-session prompt.
pub fn rate_session<S: Datastore + ?Sized>(
    store: &S,
    id: &str,
    rating: QualityRating,
) -> Result<()> {
    require_user(store)?;
    store.set_session_quality(id, rating)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionType;
    use crate::storage::{Datastore, MemoryStore};
    use crate::timer::{FocusTimer, SessionContext};
    use chrono::{Duration, Utc};

    fn outcome_with_session(secs: u32) -> StopOutcome {
        let now = Utc::now();
        StopOutcome {
            session: Some(NewFocusSession {
                subject_id: None,
                topic_id: None,
                sub_topic_id: None,
                task_id: None,
                duration_seconds: secs,
                target_duration_seconds: None,
                started_at: now - Duration::seconds(i64::from(secs)),
                ended_at: now,
                session_type: SessionType::Focus,
            }),
            quality_prompt_minutes: None,
        }
    }

    #[test]
    fn empty_outcome_persists_nothing() {
        let store = MemoryStore::new();
        let outcome = StopOutcome {
            session: None,
            quality_prompt_minutes: None,
        };
        assert!(persist_outcome(&store, &outcome).is_none());
    }

    #[test]
    fn persisted_session_reads_back_whole_seconds() {
        let store = MemoryStore::new();
        let stored = persist_outcome(&store, &outcome_with_session(73)).unwrap();
        let now = Utc::now();
        let sessions = store
            .sessions_between(now - Duration::days(1), now + Duration::seconds(1))
            .unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, stored.id);
        assert_eq!(sessions[0].duration_seconds, 73);
    }

    #[test]
    fn failed_write_is_swallowed() {
        let store = MemoryStore::unauthenticated();
        assert!(persist_outcome(&store, &outcome_with_session(30)).is_none());
    }

    #[test]
    fn quality_rating_round_trip() {
        let store = MemoryStore::new();
        let stored = persist_outcome(&store, &outcome_with_session(90)).unwrap();
        rate_session(&store, &stored.id, QualityRating::Focused).unwrap();
        let now = Utc::now();
        let sessions = store
            .sessions_between(now - Duration::days(1), now + Duration::seconds(1))
            .unwrap();
        assert_eq!(sessions[0].quality_rating, Some(QualityRating::Focused));
    }

    #[test]
    fn timer_stop_round_trips_through_the_store() {
        let store = MemoryStore::new();
        let mut timer = FocusTimer::new();
        timer.start(None, SessionContext::bare(SessionType::Focus));
        timer.backdate(45_500);
        let outcome = match timer.stop() {
            Some(crate::events::Event::TimerStopped { outcome, .. }) => outcome,
            other => panic!("Expected TimerStopped, got {:?}", other),
        };
        let stored = persist_outcome(&store, &outcome).unwrap();
        assert_eq!(stored.duration_seconds, 45);
    }
}
