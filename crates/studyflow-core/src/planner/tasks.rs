use chrono::{DateTime, NaiveDate, Utc};

use super::require_user;
use crate::error::{Result, ValidationError};
use crate::model::{NewTask, Task};
use crate::storage::Datastore;

/// Validate and insert a task.
///
/// Rejected before any write: blank titles and due dates earlier than
/// `today`.
pub fn create_task<S: Datastore + ?Sized>(
    store: &S,
    mut task: NewTask,
    today: NaiveDate,
) -> Result<Task> {
    require_user(store)?;
    task.title = task.title.trim().to_string();
    if task.title.is_empty() {
        return Err(ValidationError::EmptyField { field: "title" }.into());
    }
    if task.due_date < today {
        return Err(ValidationError::DateInPast {
            field: "due_date",
            date: task.due_date,
        }
        .into());
    }
    Ok(store.insert_task(task)?)
}

/// Mark a task completed, setting `completed_at` in the same update so the
/// completion invariant holds.
pub fn complete_task<S: Datastore + ?Sized>(
    store: &S,
    id: &str,
    at: DateTime<Utc>,
) -> Result<()> {
    require_user(store)?;
    store.mark_task_completed(id, at)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, DatastoreError};
    use crate::model::Priority;
    use crate::storage::{Datastore, MemoryStore};

    fn new_task(title: &str, due_days_from_today: i64) -> NewTask {
        NewTask {
            sub_topic_id: "st-1".into(),
            title: title.into(),
            priority: Priority::Medium,
            due_date: Utc::now().date_naive() + chrono::Duration::days(due_days_from_today),
        }
    }

    #[test]
    fn blank_title_is_rejected_without_writing() {
        let store = MemoryStore::new();
        let today = Utc::now().date_naive();
        let err = create_task(&store, new_task("   ", 1), today).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EmptyField { field: "title" })
        ));
        assert!(store.tasks_for_sub_topics(&["st-1".into()]).unwrap().is_empty());
    }

    #[test]
    fn past_due_date_is_rejected() {
        let store = MemoryStore::new();
        let today = Utc::now().date_naive();
        let err = create_task(&store, new_task("Read notes", -1), today).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DateInPast { field: "due_date", .. })
        ));
    }

    #[test]
    fn due_today_is_allowed() {
        let store = MemoryStore::new();
        let today = Utc::now().date_naive();
        let task = create_task(&store, new_task("Read notes", 0), today).unwrap();
        assert_eq!(task.title, "Read notes");
        assert!(!task.is_completed);
    }

    #[test]
    fn unauthenticated_write_fails_fast() {
        let store = MemoryStore::unauthenticated();
        let today = Utc::now().date_naive();
        let err = create_task(&store, new_task("Read notes", 1), today).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Datastore(DatastoreError::NotAuthenticated)
        ));
    }

    #[test]
    fn complete_task_sets_the_invariant_pair() {
        let store = MemoryStore::new();
        let today = Utc::now().date_naive();
        let task = create_task(&store, new_task("Read notes", 1), today).unwrap();
        complete_task(&store, &task.id, Utc::now()).unwrap();
        let tasks = store.tasks_for_sub_topics(&["st-1".into()]).unwrap();
        assert!(tasks[0].is_completed);
        assert!(tasks[0].completed_at.is_some());
    }
}
