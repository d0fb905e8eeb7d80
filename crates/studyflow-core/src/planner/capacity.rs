use chrono::NaiveDate;

use super::require_user;
use crate::error::{Result, ValidationError};
use crate::model::UserCapacity;
use crate::storage::Datastore;

/// Configure (or reconfigure) capacity limits.
///
/// The hard limits must be at least 1; a recommended session count of 0 is
/// allowed and simply disables the completion-rate insight.
pub fn set_capacity<S: Datastore + ?Sized>(store: &S, capacity: &UserCapacity) -> Result<()> {
    require_user(store)?;
    if capacity.max_tasks_per_day == 0 {
        return Err(ValidationError::InvalidValue {
            field: "max_tasks_per_day",
            message: "must be at least 1".into(),
        }
        .into());
    }
    if capacity.max_daily_focus_minutes == 0 {
        return Err(ValidationError::InvalidValue {
            field: "max_daily_focus_minutes",
            message: "must be at least 1".into(),
        }
        .into());
    }
    store.set_user_capacity(capacity)?;
    Ok(())
}

/// Activate an exam, replacing any currently active one.
pub fn set_exam<S: Datastore + ?Sized>(
    store: &S,
    name: &str,
    exam_date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    require_user(store)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyField { field: "name" }.into());
    }
    if exam_date < today {
        return Err(ValidationError::DateInPast {
            field: "exam_date",
            date: exam_date,
        }
        .into());
    }
    store.set_active_exam(name, exam_date)?;
    Ok(())
}

pub fn clear_exam<S: Datastore + ?Sized>(store: &S) -> Result<()> {
    require_user(store)?;
    store.clear_active_exam()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::{Datastore, MemoryStore};

    fn capacity() -> UserCapacity {
        UserCapacity {
            max_tasks_per_day: 5,
            max_daily_focus_minutes: 240,
            default_focus_minutes: 25,
            default_break_minutes: 5,
            recommended_sessions_per_day: 4,
        }
    }

    #[test]
    fn zero_limits_are_rejected() {
        let store = MemoryStore::new();
        let mut cap = capacity();
        cap.max_tasks_per_day = 0;
        assert!(matches!(
            set_capacity(&store, &cap).unwrap_err(),
            CoreError::Validation(ValidationError::InvalidValue { .. })
        ));
        assert!(store.user_capacity().unwrap().is_none());
    }

    #[test]
    fn zero_recommended_sessions_is_allowed() {
        let store = MemoryStore::new();
        let mut cap = capacity();
        cap.recommended_sessions_per_day = 0;
        set_capacity(&store, &cap).unwrap();
        assert!(store.user_capacity().unwrap().is_some());
    }

    #[test]
    fn past_exam_date_is_rejected() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
        assert!(set_exam(&store, "Finals", yesterday, today).is_err());
        assert!(store.active_exam().unwrap().is_none());
        set_exam(&store, "Finals", today, today).unwrap();
        assert_eq!(store.active_exam().unwrap().unwrap().name, "Finals");
    }
}
