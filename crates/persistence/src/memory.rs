//! In-memory session repository
//!
//! Same contract as the SQLite store; used when persistence is disabled
//! and throughout the test suites.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use vox_core::{Error, Result, Turn};

use crate::types::{Session, StoredMessage};
use crate::SessionRepository;

#[derive(Default)]
struct Inner {
    sessions: Vec<Session>,
    messages: Vec<StoredMessage>,
}

#[derive(Default)]
pub struct InMemorySessionStore {
    inner: Mutex<Inner>,
    next_message_id: AtomicI64,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn create_session(&self) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            ended_at: None,
            message_count: 0,
        };
        self.inner.lock().sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Session> {
        let inner = self.inner.lock();
        let mut session = inner
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("session '{id}'")))?;
        session.message_count = inner
            .messages
            .iter()
            .filter(|m| m.session_id == id)
            .count() as u64;
        Ok(session)
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let inner = self.inner.lock();
        let mut sessions: Vec<Session> = inner
            .sessions
            .iter()
            .cloned()
            .map(|mut s| {
                s.message_count = inner
                    .messages
                    .iter()
                    .filter(|m| m.session_id == s.id)
                    .count() as u64;
                s
            })
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn end_session(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let session = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("session '{id}'")))?;
        if session.ended_at.is_none() {
            session.ended_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn append_message(&self, session_id: &str, turn: &Turn) -> Result<StoredMessage> {
        let mut inner = self.inner.lock();
        if !inner.sessions.iter().any(|s| s.id == session_id) {
            return Err(Error::NotFound(format!("session '{session_id}'")));
        }
        let message = StoredMessage {
            id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1,
            session_id: session_id.to_string(),
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
            created_at: turn.timestamp,
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>> {
        let inner = self.inner.lock();
        if !inner.sessions.iter().any(|s| s.id == session_id) {
            return Err(Error::NotFound(format!("session '{session_id}'")));
        }
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_contract_as_sqlite() {
        let store = InMemorySessionStore::new();
        let session = store.create_session().await.unwrap();

        store
            .append_message(&session.id, &Turn::user("hi"))
            .await
            .unwrap();
        let messages = store.list_messages(&session.id).await.unwrap();
        assert_eq!(messages.len(), 1);

        store.end_session(&session.id).await.unwrap();
        assert!(!store.get_session(&session.id).await.unwrap().is_active());

        assert!(store.get_session("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemorySessionStore::new();
        let first = store.create_session().await.unwrap();
        let second = store.create_session().await.unwrap();
        let listed = store.list_sessions().await.unwrap();
        assert_eq!(listed.len(), 2);
        // Equal timestamps sort stably; ids must both be present.
        assert!(listed.iter().any(|s| s.id == first.id));
        assert!(listed.iter().any(|s| s.id == second.id));
    }
}
