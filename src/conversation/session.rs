//! Chat sessions — one panel, one transcript, one conversation state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::engine::{Reply, ResponseEngine};
use super::rules::WELCOME_REPLY;
use super::state::ConversationState;
use crate::error::SessionError;

/// Who wrote a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Bot,
}

/// One line in a session's transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(speaker: Speaker, text: &str) -> Self {
        Self {
            speaker,
            text: text.to_string(),
            at: Utc::now(),
        }
    }
}

/// A single chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    state: ConversationState,
    transcript: Vec<TranscriptEntry>,
    visible: bool,
}

impl Session {
    /// A fresh session with the panel closed and nothing said yet.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: ConversationState::new(),
            transcript: Vec::new(),
            visible: false,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the panel. The welcome line is posted the first time the panel
    /// opens on an empty transcript, and returned so the caller can show it.
    pub fn open(&mut self) -> Option<&str> {
        self.visible = true;
        if !self.transcript.is_empty() {
            return None;
        }
        self.transcript
            .push(TranscriptEntry::new(Speaker::Bot, WELCOME_REPLY));
        debug!(session = %self.id, "Posted welcome message");
        Some(WELCOME_REPLY)
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Flip panel visibility. Returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
        self.visible
    }

    /// Record a user line and the engine's reply.
    ///
    /// Input is trimmed first; blank input is dropped without touching the
    /// transcript or the state.
    pub fn submit(&mut self, engine: &ResponseEngine, text: &str) -> Option<Reply> {
        let text = text.trim();
        if text.is_empty() {
            warn!(session = %self.id, "Ignoring blank message");
            return None;
        }

        self.transcript.push(TranscriptEntry::new(Speaker::User, text));
        let reply = engine.respond(text, &mut self.state);
        self.transcript
            .push(TranscriptEntry::new(Speaker::Bot, &reply.text));
        Some(reply)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Independent sessions sharing one engine.
///
/// Cloning the registry shares the underlying sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    engine: Arc<ResponseEngine>,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionRegistry {
    pub fn new(engine: Arc<ResponseEngine>) -> Self {
        Self {
            engine,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a session with its panel open. Returns the session id.
    pub async fn open(&self) -> Uuid {
        let mut session = Session::new();
        session.open();
        let id = session.id;
        self.sessions.write().await.insert(id, session);
        info!(session = %id, "Session opened");
        id
    }

    /// Send a message to a session. `Ok(None)` means the input was blank.
    pub async fn submit(&self, id: Uuid, text: &str) -> Result<Option<Reply>, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        Ok(session.submit(&self.engine, text))
    }

    /// Snapshot of a session's conversation state.
    pub async fn state(&self, id: Uuid) -> Result<ConversationState, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(|s| s.state().clone())
            .ok_or(SessionError::NotFound { id })
    }

    /// End a session, discarding its state. Returns the final session.
    pub async fn close(&self, id: Uuid) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(SessionError::NotFound { id })?;
        info!(
            session = %id,
            messages = session.transcript().len(),
            "Session closed"
        );
        Ok(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
