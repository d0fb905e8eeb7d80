//! SQLite-backed datastore.
//!
//! Stands in for the hosted record store: study structure, tasks, sessions,
//! confidence ratings, revision history, capacity and exam mode, plus a
//! key-value table for small local flags and the CLI's persisted timer.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

use super::data_dir;
use super::datastore::Datastore;
use crate::error::DatastoreError;
use crate::model::{
    ConfidenceLevel, ConfidenceRating, Difficulty, ExamMode, FocusSession, NewFocusSession,
    NewTask, Priority, QualityRating, SessionType, SubTopic, Subject, Task, Topic, UserCapacity,
};
use crate::util::day_bounds;

const USER_ID_KEY: &str = "user_id";

/// SQLite datastore.
///
/// The connection sits behind a mutex so the store can be shared across
/// threads; every operation is a single short transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    user_id: Option<String>,
}

impl SqliteStore {
    /// Open the datastore at `~/.config/studyflow/studyflow.db`.
    ///
    /// Creates the file and schema if they don't exist, and resolves the
    /// local user id (generated and stored on first open).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatastoreError> {
        let path = data_dir()
            .map_err(|e| DatastoreError::QueryFailed(e.to_string()))?
            .join("studyflow.db");
        Self::open_at(&path)
    }

    /// Open the datastore at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, DatastoreError> {
        let conn = Connection::open(path).map_err(|source| DatastoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory datastore (tests, dry runs).
    pub fn open_memory() -> Result<Self, DatastoreError> {
        let conn = Connection::open_in_memory().map_err(|source| DatastoreError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatastoreError> {
        let mut store = Self {
            conn: Mutex::new(conn),
            user_id: None,
        };
        store.migrate()?;
        let user_id = match store.kv_get(USER_ID_KEY)? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                store.kv_set(USER_ID_KEY, &id)?;
                id
            }
        };
        store.user_id = Some(user_id);
        Ok(store)
    }

    fn migrate(&self) -> Result<(), DatastoreError> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS subjects (
                id   TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS topics (
                id         TEXT PRIMARY KEY,
                subject_id TEXT NOT NULL REFERENCES subjects(id),
                name       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sub_topics (
                id         TEXT PRIMARY KEY,
                topic_id   TEXT NOT NULL REFERENCES topics(id),
                name       TEXT NOT NULL,
                difficulty TEXT
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id           TEXT PRIMARY KEY,
                sub_topic_id TEXT NOT NULL REFERENCES sub_topics(id),
                title        TEXT NOT NULL,
                priority     TEXT NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                due_date     TEXT NOT NULL,
                completed_at TEXT,
                created_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id                      TEXT PRIMARY KEY,
                subject_id              TEXT,
                topic_id                TEXT,
                sub_topic_id            TEXT,
                task_id                 TEXT,
                duration_seconds        INTEGER NOT NULL,
                target_duration_seconds INTEGER,
                started_at              TEXT NOT NULL,
                ended_at                TEXT NOT NULL,
                session_type            TEXT NOT NULL,
                quality_rating          TEXT
            );

            CREATE TABLE IF NOT EXISTS confidence (
                sub_topic_id TEXT PRIMARY KEY,
                level        TEXT NOT NULL,
                rated_at     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS revision_history (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                sub_topic_id TEXT NOT NULL,
                reviewed_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS capacity (
                id                           INTEGER PRIMARY KEY CHECK (id = 1),
                max_tasks_per_day            INTEGER NOT NULL,
                max_daily_focus_minutes      INTEGER NOT NULL,
                default_focus_minutes        INTEGER NOT NULL,
                default_break_minutes        INTEGER NOT NULL,
                recommended_sessions_per_day INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS exam_mode (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                name      TEXT NOT NULL,
                exam_date TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Indexes for common query patterns
            CREATE INDEX IF NOT EXISTS idx_tasks_sub_topic ON tasks(sub_topic_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_task ON sessions(task_id);
            CREATE INDEX IF NOT EXISTS idx_revision_sub_topic ON revision_history(sub_topic_id, reviewed_at);",
        )
        .map_err(|e| DatastoreError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatastoreError> {
        self.conn.lock().map_err(|_| DatastoreError::Locked)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatastoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatastoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

// ── Row mapping ──────────────────────────────────────────────────────

fn parse_ts(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_date(idx: usize, s: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_enum<T>(idx: usize, s: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognized value '{s}'").into(),
        )
    })
}

fn priority_to_str(p: Priority) -> &'static str {
    match p {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn priority_from_str(s: &str) -> Option<Priority> {
    match s {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}

fn difficulty_to_str(d: Difficulty) -> &'static str {
    match d {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

fn difficulty_from_str(s: &str) -> Option<Difficulty> {
    match s {
        "easy" => Some(Difficulty::Easy),
        "medium" => Some(Difficulty::Medium),
        "hard" => Some(Difficulty::Hard),
        _ => None,
    }
}

fn session_type_to_str(t: SessionType) -> &'static str {
    match t {
        SessionType::Focus => "focus",
        SessionType::Rest => "rest",
    }
}

fn session_type_from_str(s: &str) -> Option<SessionType> {
    match s {
        "focus" => Some(SessionType::Focus),
        "rest" => Some(SessionType::Rest),
        _ => None,
    }
}

fn quality_to_str(q: QualityRating) -> &'static str {
    match q {
        QualityRating::Focused => "focused",
        QualityRating::Okay => "okay",
        QualityRating::Distracted => "distracted",
    }
}

fn quality_from_str(s: &str) -> Option<QualityRating> {
    match s {
        "focused" => Some(QualityRating::Focused),
        "okay" => Some(QualityRating::Okay),
        "distracted" => Some(QualityRating::Distracted),
        _ => None,
    }
}

fn confidence_to_str(c: ConfidenceLevel) -> &'static str {
    match c {
        ConfidenceLevel::Low => "low",
        ConfidenceLevel::Medium => "medium",
        ConfidenceLevel::High => "high",
    }
}

fn confidence_from_str(s: &str) -> Option<ConfidenceLevel> {
    match s {
        "low" => Some(ConfidenceLevel::Low),
        "medium" => Some(ConfidenceLevel::Medium),
        "high" => Some(ConfidenceLevel::High),
        _ => None,
    }
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get(3)?;
    let completed_at: Option<String> = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        sub_topic_id: row.get(1)?,
        title: row.get(2)?,
        priority: parse_enum(3, &priority, priority_from_str)?,
        is_completed: row.get(4)?,
        due_date: parse_date(5, row.get(5)?)?,
        completed_at: completed_at.map(|s| parse_ts(6, s)).transpose()?,
        created_at: parse_ts(7, row.get(7)?)?,
    })
}

const TASK_COLUMNS: &str =
    "id, sub_topic_id, title, priority, is_completed, due_date, completed_at, created_at";

fn session_from_row(row: &Row) -> rusqlite::Result<FocusSession> {
    let session_type: String = row.get(9)?;
    let quality: Option<String> = row.get(10)?;
    Ok(FocusSession {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        topic_id: row.get(2)?,
        sub_topic_id: row.get(3)?,
        task_id: row.get(4)?,
        duration_seconds: row.get(5)?,
        target_duration_seconds: row.get(6)?,
        started_at: parse_ts(7, row.get(7)?)?,
        ended_at: parse_ts(8, row.get(8)?)?,
        session_type: parse_enum(9, &session_type, session_type_from_str)?,
        quality_rating: quality
            .map(|s| parse_enum(10, &s, quality_from_str))
            .transpose()?,
    })
}

const SESSION_COLUMNS: &str = "id, subject_id, topic_id, sub_topic_id, task_id, duration_seconds, \
     target_duration_seconds, started_at, ended_at, session_type, quality_rating";

fn sub_topic_from_row(row: &Row) -> rusqlite::Result<SubTopic> {
    let difficulty: Option<String> = row.get(3)?;
    Ok(SubTopic {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        name: row.get(2)?,
        difficulty: difficulty
            .map(|s| parse_enum(3, &s, difficulty_from_str))
            .transpose()?,
    })
}

impl Datastore for SqliteStore {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn subjects(&self) -> Result<Vec<Subject>, DatastoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM subjects ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Subject {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn topics_for_subject(&self, subject_id: &str) -> Result<Vec<Topic>, DatastoreError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, subject_id, name FROM topics WHERE subject_id = ?1")?;
        let rows = stmt.query_map(params![subject_id], |row| {
            Ok(Topic {
                id: row.get(0)?,
                subject_id: row.get(1)?,
                name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn sub_topics_for_topics(&self, topic_ids: &[String]) -> Result<Vec<SubTopic>, DatastoreError> {
        if topic_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let placeholders = vec!["?"; topic_ids.len()].join(",");
        let sql = format!(
            "SELECT id, topic_id, name, difficulty FROM sub_topics WHERE topic_id IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(topic_ids.iter()), sub_topic_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn all_sub_topics(&self) -> Result<Vec<SubTopic>, DatastoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, topic_id, name, difficulty FROM sub_topics")?;
        let rows = stmt.query_map([], sub_topic_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn insert_subject(&self, name: &str) -> Result<Subject, DatastoreError> {
        let subject = Subject {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.conn()?.execute(
            "INSERT INTO subjects (id, name) VALUES (?1, ?2)",
            params![subject.id, subject.name],
        )?;
        Ok(subject)
    }

    fn insert_topic(&self, subject_id: &str, name: &str) -> Result<Topic, DatastoreError> {
        let topic = Topic {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            name: name.to_string(),
        };
        self.conn()?.execute(
            "INSERT INTO topics (id, subject_id, name) VALUES (?1, ?2, ?3)",
            params![topic.id, topic.subject_id, topic.name],
        )?;
        Ok(topic)
    }

    fn insert_sub_topic(
        &self,
        topic_id: &str,
        name: &str,
        difficulty: Option<Difficulty>,
    ) -> Result<SubTopic, DatastoreError> {
        let sub_topic = SubTopic {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            name: name.to_string(),
            difficulty,
        };
        self.conn()?.execute(
            "INSERT INTO sub_topics (id, topic_id, name, difficulty) VALUES (?1, ?2, ?3, ?4)",
            params![
                sub_topic.id,
                sub_topic.topic_id,
                sub_topic.name,
                difficulty.map(difficulty_to_str),
            ],
        )?;
        Ok(sub_topic)
    }

    fn tasks_for_sub_topics(&self, sub_topic_ids: &[String]) -> Result<Vec<Task>, DatastoreError> {
        if sub_topic_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let placeholders = vec!["?"; sub_topic_ids.len()].join(",");
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE sub_topic_id IN ({placeholders})");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(sub_topic_ids.iter()), task_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn count_tasks_created_on(&self, day: NaiveDate) -> Result<u32, DatastoreError> {
        let (start, end) = day_bounds(day);
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE created_at >= ?1 AND created_at < ?2",
            params![start.to_rfc3339(), end.to_rfc3339()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn count_tasks_completed_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u32, DatastoreError> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks
             WHERE is_completed = 1 AND completed_at >= ?1 AND completed_at < ?2",
            params![from.to_rfc3339(), to.to_rfc3339()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn insert_task(&self, task: NewTask) -> Result<Task, DatastoreError> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            sub_topic_id: task.sub_topic_id,
            title: task.title,
            priority: task.priority,
            is_completed: false,
            due_date: task.due_date,
            completed_at: None,
            created_at: Utc::now(),
        };
        self.conn()?.execute(
            "INSERT INTO tasks (id, sub_topic_id, title, priority, is_completed, due_date, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
            params![
                task.id,
                task.sub_topic_id,
                task.title,
                priority_to_str(task.priority),
                task.due_date.format("%Y-%m-%d").to_string(),
                task.created_at.to_rfc3339(),
            ],
        )?;
        Ok(task)
    }

    fn mark_task_completed(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatastoreError> {
        let updated = self.conn()?.execute(
            "UPDATE tasks SET is_completed = 1, completed_at = ?2 WHERE id = ?1",
            params![id, at.to_rfc3339()],
        )?;
        if updated == 0 {
            return Err(DatastoreError::NotFound {
                entity: "task",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn sessions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, DatastoreError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE started_at >= ?1 AND started_at < ?2
             ORDER BY started_at"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![from.to_rfc3339(), to.to_rfc3339()],
            session_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn sessions_for_tasks(&self, task_ids: &[String]) -> Result<Vec<FocusSession>, DatastoreError> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let placeholders = vec!["?"; task_ids.len()].join(",");
        let sql =
            format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE task_id IN ({placeholders})");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(task_ids.iter()), session_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn insert_session(&self, session: NewFocusSession) -> Result<FocusSession, DatastoreError> {
        let session = FocusSession {
            id: Uuid::new_v4().to_string(),
            subject_id: session.subject_id,
            topic_id: session.topic_id,
            sub_topic_id: session.sub_topic_id,
            task_id: session.task_id,
            duration_seconds: session.duration_seconds,
            target_duration_seconds: session.target_duration_seconds,
            started_at: session.started_at,
            ended_at: session.ended_at,
            session_type: session.session_type,
            quality_rating: None,
        };
        self.conn()?.execute(
            "INSERT INTO sessions (id, subject_id, topic_id, sub_topic_id, task_id, duration_seconds,
                                   target_duration_seconds, started_at, ended_at, session_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                session.id,
                session.subject_id,
                session.topic_id,
                session.sub_topic_id,
                session.task_id,
                session.duration_seconds,
                session.target_duration_seconds,
                session.started_at.to_rfc3339(),
                session.ended_at.to_rfc3339(),
                session_type_to_str(session.session_type),
            ],
        )?;
        Ok(session)
    }

    fn set_session_quality(&self, id: &str, rating: QualityRating) -> Result<(), DatastoreError> {
        let updated = self.conn()?.execute(
            "UPDATE sessions SET quality_rating = ?2 WHERE id = ?1",
            params![id, quality_to_str(rating)],
        )?;
        if updated == 0 {
            return Err(DatastoreError::NotFound {
                entity: "session",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn confidence_ratings(&self) -> Result<Vec<ConfidenceRating>, DatastoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT sub_topic_id, level, rated_at FROM confidence")?;
        let rows = stmt.query_map([], |row| {
            let level: String = row.get(1)?;
            Ok(ConfidenceRating {
                sub_topic_id: row.get(0)?,
                level: parse_enum(1, &level, confidence_from_str)?,
                rated_at: parse_ts(2, row.get(2)?)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn upsert_confidence(
        &self,
        sub_topic_id: &str,
        level: ConfidenceLevel,
        at: DateTime<Utc>,
    ) -> Result<(), DatastoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO confidence (sub_topic_id, level, rated_at) VALUES (?1, ?2, ?3)",
            params![sub_topic_id, confidence_to_str(level), at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn append_revision(&self, sub_topic_id: &str, at: DateTime<Utc>) -> Result<(), DatastoreError> {
        self.conn()?.execute(
            "INSERT INTO revision_history (sub_topic_id, reviewed_at) VALUES (?1, ?2)",
            params![sub_topic_id, at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn last_review_times(&self) -> Result<HashMap<String, DateTime<Utc>>, DatastoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT sub_topic_id, MAX(reviewed_at) FROM revision_history GROUP BY sub_topic_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, parse_ts(1, row.get(1)?)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn user_capacity(&self) -> Result<Option<UserCapacity>, DatastoreError> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT max_tasks_per_day, max_daily_focus_minutes, default_focus_minutes,
                    default_break_minutes, recommended_sessions_per_day
             FROM capacity WHERE id = 1",
            [],
            |row| {
                Ok(UserCapacity {
                    max_tasks_per_day: row.get(0)?,
                    max_daily_focus_minutes: row.get(1)?,
                    default_focus_minutes: row.get(2)?,
                    default_break_minutes: row.get(3)?,
                    recommended_sessions_per_day: row.get(4)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_user_capacity(&self, capacity: &UserCapacity) -> Result<(), DatastoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO capacity
             (id, max_tasks_per_day, max_daily_focus_minutes, default_focus_minutes,
              default_break_minutes, recommended_sessions_per_day)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)",
            params![
                capacity.max_tasks_per_day,
                capacity.max_daily_focus_minutes,
                capacity.default_focus_minutes,
                capacity.default_break_minutes,
                capacity.recommended_sessions_per_day,
            ],
        )?;
        Ok(())
    }

    fn active_exam(&self) -> Result<Option<ExamMode>, DatastoreError> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT name, exam_date FROM exam_mode WHERE is_active = 1 LIMIT 1",
            [],
            |row| {
                Ok(ExamMode {
                    name: row.get(0)?,
                    exam_date: parse_date(1, row.get(1)?)?,
                    is_active: true,
                })
            },
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_active_exam(&self, name: &str, exam_date: NaiveDate) -> Result<(), DatastoreError> {
        let conn = self.conn()?;
        conn.execute("UPDATE exam_mode SET is_active = 0", [])?;
        conn.execute(
            "INSERT INTO exam_mode (name, exam_date, is_active) VALUES (?1, ?2, 1)",
            params![name, exam_date.format("%Y-%m-%d").to_string()],
        )?;
        Ok(())
    }

    fn clear_active_exam(&self) -> Result<(), DatastoreError> {
        self.conn()?.execute("UPDATE exam_mode SET is_active = 0", [])?;
        Ok(())
    }
}
