//! Assistant chat sessions — transcript, in-flight flag, and cancellation.
//!
//! A session allows one outstanding turn at a time. The store lock is held only
//! to mutate the transcript, never across the provider call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::assistant::prompts::{ASSISTANT_SYSTEM, GREETING};
use crate::errors::AppError;
use crate::llm_client::{ChatMessage, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only copy of a session returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub messages: Vec<ChatEntry>,
    pub in_flight: bool,
    pub created_at: DateTime<Utc>,
}

/// Everything the caller needs to run one turn outside the lock.
pub struct Turn {
    pub messages: Vec<ChatMessage>,
    pub cancel: CancellationToken,
}

pub struct ChatSession {
    id: Uuid,
    entries: Vec<ChatEntry>,
    /// Ids are never reused, even when a turn fails.
    next_id: u64,
    /// Present while a turn is outstanding.
    in_flight: Option<CancellationToken>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: Uuid::new_v4(),
            entries: Vec::new(),
            next_id: 1,
            in_flight: None,
            created_at: now,
            last_active: now,
        };
        session.push(Sender::Assistant, GREETING.to_string());
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Idle for longer than `ttl` with no turn outstanding.
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        !self.is_in_flight() && now - self.last_active > ttl
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.entries.push(ChatEntry {
            id: self.next_id,
            sender,
            text,
            created_at: Utc::now(),
        });
        self.next_id += 1;
        self.last_active = Utc::now();
    }

    /// Appends the user's message and marks the session in flight.
    /// Rejects blank text and overlapping turns.
    pub fn begin_turn(&mut self, text: &str) -> Result<Turn, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("message text cannot be empty".to_string()));
        }
        if self.is_in_flight() {
            return Err(AppError::Conflict(
                "A response is already being generated for this session".to_string(),
            ));
        }

        self.push(Sender::User, text.to_string());
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());

        Ok(Turn {
            messages: self.provider_messages(),
            cancel,
        })
    }

    /// Records the outcome of the outstanding turn and clears the in-flight flag.
    /// Failures become an assistant entry; the error text is returned.
    pub fn complete_turn(&mut self, result: Result<String, LlmError>) -> Option<String> {
        self.in_flight = None;
        match result {
            Ok(reply) => {
                self.push(Sender::Assistant, reply);
                None
            }
            Err(e) => {
                let message = e.to_string();
                self.push(
                    Sender::Assistant,
                    format!(
                        "Sorry, I encountered an error: {message}. Please check your Groq API key and try again."
                    ),
                );
                Some(message)
            }
        }
    }

    /// Cancels the outstanding turn, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        match &self.in_flight {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// System prompt followed by the whole transcript, greeting included.
    pub fn provider_messages(&self) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::system(ASSISTANT_SYSTEM))
            .chain(self.entries.iter().map(|e| match e.sender {
                Sender::User => ChatMessage::user(e.text.clone()),
                Sender::Assistant => ChatMessage::assistant(e.text.clone()),
            }))
            .collect()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            messages: self.entries.clone(),
            in_flight: self.is_in_flight(),
            created_at: self.created_at,
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_IDLE_TTL_MINUTES: i64 = 60;

/// In-memory sessions keyed by id. Nothing outlives the process.
///
/// Idle sessions expire after `idle_ttl`, and the store never holds more than
/// `max_sessions`. Both are enforced when a session is created.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, ChatSession>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS, Duration::minutes(DEFAULT_IDLE_TTL_MINUTES))
    }
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> SessionView {
        let session = ChatSession::new();
        let view = session.view();

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.idle_ttl));
        if sessions.len() < before {
            debug!("Expired {} idle chat sessions", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            // Prefer the least recently active idle session; fall back to any.
            let oldest = sessions
                .values()
                .min_by_key(|s| (s.is_in_flight(), s.last_active))
                .map(ChatSession::id);
            let Some(evicted) = oldest.and_then(|id| sessions.remove(&id)) else {
                break;
            };
            evicted.cancel();
            debug!("Evicted chat session {} to stay under the session cap", evicted.id());
        }

        sessions.insert(session.id(), session);
        view
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(ChatSession::view)
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.cancel();
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }

    pub async fn begin_turn(&self, id: Uuid, text: &str) -> Result<Turn, AppError> {
        self.sessions
            .write()
            .await
            .get_mut(&id)
            .ok_or_else(|| not_found(id))?
            .begin_turn(text)
    }

    pub async fn complete_turn(
        &self,
        id: Uuid,
        result: Result<String, LlmError>,
    ) -> Result<(SessionView, Option<String>), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        let error = session.complete_turn(result);
        Ok((session.view(), error))
    }

    pub async fn cancel(&self, id: Uuid) -> Result<bool, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(ChatSession::cancel)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Chat session {id} not found"))
}
