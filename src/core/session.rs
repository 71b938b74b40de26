//! # Session Store
//!
//! Owns the ordered list of analysis sessions and which one is active.
//!
//! ```text
//! SessionStore
//! ├── sessions: Vec<Arc<Session>>   // most recently created first
//! └── active: Option<SessionId>     // always present in `sessions` when set
//! ```
//!
//! Sessions are handed out as `Arc<Session>` snapshots. Appending a message
//! never edits a snapshot someone else holds: the stored value is replaced
//! with a new session carrying the longer message list, so a view that
//! cloned the `Arc` keeps reading a consistent (older) session.
//!
//! Operations on unknown ids are no-ops, except [`SessionStore::append_message`],
//! which reports [`StoreError::NotFound`] so the caller can decide what a
//! late append means.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::core::message::Message;

/// Title length (in chars) kept when a session is named after its first input.
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            title: title.into(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// "1 message" / "N messages".
    pub fn message_count_label(&self) -> String {
        match self.messages.len() {
            1 => "1 message".to_string(),
            n => format!("{n} messages"),
        }
    }
}

/// Derive a session title from the text that opened it.
/// Keeps the first 30 chars, adding "..." when something was cut.
pub fn derive_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(SessionId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "session not found: {id}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Arc<Session>>,
    active: Option<SessionId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an empty session, puts it at the head of the list and makes it active.
    pub fn create(&mut self, title: impl Into<String>) -> Arc<Session> {
        let session = Arc::new(Session::new(title));
        debug!("Session created: {} ({:?})", session.id, session.title);
        self.sessions.insert(0, Arc::clone(&session));
        self.active = Some(session.id);
        session
    }

    /// Makes `id` active. Unknown ids are ignored.
    pub fn select(&mut self, id: SessionId) {
        if self.contains(id) {
            self.active = Some(id);
        } else {
            debug!("Select ignored, unknown session {}", id);
        }
    }

    /// Removes `id`. If it was active, the new head of the list (or nothing)
    /// becomes active. Unknown ids are ignored.
    pub fn delete(&mut self, id: SessionId) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            debug!("Delete ignored, unknown session {}", id);
            return;
        }
        debug!("Session deleted: {}", id);

        if self.active == Some(id) {
            self.active = self.sessions.first().map(|s| s.id);
        }
    }

    /// Appends `message` to session `id` by replacing the stored session.
    pub fn append_message(&mut self, id: SessionId, message: Message) -> Result<(), StoreError> {
        let slot = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut next = Session::clone(&**slot);
        next.messages.push(message);
        *slot = Arc::new(next);
        Ok(())
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.iter().find(|s| s.id == id).cloned()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active(&self) -> Option<Arc<Session>> {
        self.active.and_then(|id| self.get(id))
    }

    /// Snapshot of the session list in display order.
    pub fn sessions(&self) -> &[Arc<Session>] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
