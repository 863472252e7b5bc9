//! SQLite-backed session repository

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use vox_core::{Error, Result, Turn};

use crate::types::{Session, StoredMessage};
use crate::SessionRepository;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    ended_at    TEXT
);
CREATE TABLE IF NOT EXISTS messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id  TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    role        TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id);
";

pub struct SqliteSessionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSessionStore {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(map_sqlite)?;
        Self::with_connection(conn)
    }

    /// Private database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(map_sqlite)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(map_sqlite)?;
        conn.execute_batch(SCHEMA).map_err(map_sqlite)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn session_row(conn: &Connection, id: &str) -> Result<Option<Session>> {
        let row = conn
            .query_row(
                "SELECT id, created_at, ended_at,
                        (SELECT COUNT(*) FROM messages m WHERE m.session_id = s.id)
                 FROM sessions s WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(map_sqlite)?;
        row.map(|(id, created_at, ended_at, count)| {
            Ok(Session {
                id,
                created_at: parse_timestamp(&created_at)?,
                ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
                message_count: count as u64,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionStore {
    async fn create_session(&self) -> Result<Session> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sessions (id, created_at) VALUES (?1, ?2)",
            params![id, created_at.to_rfc3339()],
        )
        .map_err(map_sqlite)?;
        tracing::debug!(session = %id, "session created");
        Ok(Session {
            id,
            created_at,
            ended_at: None,
            message_count: 0,
        })
    }

    async fn get_session(&self, id: &str) -> Result<Session> {
        let conn = self.conn.lock();
        Self::session_row(&conn, id)?
            .ok_or_else(|| Error::NotFound(format!("session '{id}'")))
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, created_at, ended_at,
                        (SELECT COUNT(*) FROM messages m WHERE m.session_id = s.id)
                 FROM sessions s ORDER BY created_at DESC",
            )
            .map_err(map_sqlite)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(map_sqlite)?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, created_at, ended_at, count) = row.map_err(map_sqlite)?;
            sessions.push(Session {
                id,
                created_at: parse_timestamp(&created_at)?,
                ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
                message_count: count as u64,
            });
        }
        Ok(sessions)
    }

    async fn end_session(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn
            .execute(
                "UPDATE sessions SET ended_at = ?1 WHERE id = ?2 AND ended_at IS NULL",
                params![Utc::now().to_rfc3339(), id],
            )
            .map_err(map_sqlite)?;
        if updated == 0 && Self::session_row(&conn, id)?.is_none() {
            return Err(Error::NotFound(format!("session '{id}'")));
        }
        Ok(())
    }

    async fn append_message(&self, session_id: &str, turn: &Turn) -> Result<StoredMessage> {
        let conn = self.conn.lock();
        if Self::session_row(&conn, session_id)?.is_none() {
            return Err(Error::NotFound(format!("session '{session_id}'")));
        }
        conn.execute(
            "INSERT INTO messages (session_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                turn.role.as_str(),
                turn.content,
                turn.timestamp.to_rfc3339()
            ],
        )
        .map_err(map_sqlite)?;
        Ok(StoredMessage {
            id: conn.last_insert_rowid(),
            session_id: session_id.to_string(),
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
            created_at: turn.timestamp,
        })
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>> {
        let conn = self.conn.lock();
        if Self::session_row(&conn, session_id)?.is_none() {
            return Err(Error::NotFound(format!("session '{session_id}'")));
        }
        let mut stmt = conn
            .prepare(
                "SELECT id, role, content, created_at FROM messages
                 WHERE session_id = ?1 ORDER BY id",
            )
            .map_err(map_sqlite)?;
        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(map_sqlite)?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, role, content, created_at) = row.map_err(map_sqlite)?;
            messages.push(StoredMessage {
                id,
                session_id: session_id.to_string(),
                role,
                content,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(messages)
    }
}

fn map_sqlite(e: rusqlite::Error) -> Error {
    Error::Persistence(e.to_string())
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("bad timestamp '{s}': {e}")))
}
