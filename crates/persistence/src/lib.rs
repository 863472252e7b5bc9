//! Session and message persistence
//!
//! One trait, two backends: SQLite for durable deployments and an
//! in-memory mirror for tests and persistence-disabled mode. SQLite work
//! happens behind a mutex; statements are short enough that holding it
//! across a query is fine on a multi-threaded runtime.

mod memory;
mod sqlite;
mod types;

use async_trait::async_trait;

use vox_core::{Result, Turn};

pub use memory::InMemorySessionStore;
pub use sqlite::SqliteSessionStore;
pub use types::{Session, StoredMessage};

/// Durable record of sessions and their messages
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a session and return it
    async fn create_session(&self) -> Result<Session>;

    /// Fetch one session; NotFound if absent
    async fn get_session(&self, id: &str) -> Result<Session>;

    /// All sessions, newest first
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Mark a session ended; NotFound if absent
    async fn end_session(&self, id: &str) -> Result<()>;

    /// Append one turn to a session's history; NotFound if absent
    async fn append_message(&self, session_id: &str, turn: &Turn) -> Result<StoredMessage>;

    /// Messages for a session in insertion order; NotFound if absent
    async fn list_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>>;
}
