// libs/assistant-cell/src/services/session.rs
//! Bounded per-session conversation history.
//!
//! Sessions idle longer than the TTL are dropped on the next access. When a
//! new session would exceed capacity, the least recently used one is evicted.
//! Each history keeps at most `max_turns` entries and always starts at a
//! user-typed turn, so a tool result is never left without its call.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use shared_config::AppConfig;

use crate::models::Content;

struct Session {
    history: Vec<Content>,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
    max_sessions: usize,
    max_turns: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: usize, max_turns: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
            max_turns: max_turns.max(1),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::from_secs(config.chat_session_ttl_secs),
            config.chat_max_sessions,
            config.chat_max_turns,
        )
    }

    /// Append a turn and return the session's history including it.
    pub async fn append(&self, session_id: &str, content: Content) -> Vec<Content> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let ttl = self.ttl;
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < ttl);
        if sessions.len() < before {
            debug!("Expired {} idle chat sessions", before - sessions.len());
        }

        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!("Evicting least recently used chat session {}", oldest);
                sessions.remove(&oldest);
            }
        }

        let session = sessions.entry(session_id.to_string()).or_insert_with(|| Session {
            history: Vec::new(),
            last_seen: now,
        });
        session.history.push(content);
        session.last_seen = now;
        trim_history(&mut session.history, self.max_turns);

        session.history.clone()
    }

    pub async fn history(&self, session_id: &str) -> Option<Vec<Content>> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .filter(|session| Instant::now().duration_since(session.last_seen) < self.ttl)
            .map(|session| session.history.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn trim_history(history: &mut Vec<Content>, max_turns: usize) {
    if history.len() > max_turns {
        history.drain(..history.len() - max_turns);
    }
    while history.len() > 1 && !history[0].is_user_text() {
        history.remove(0);
    }
}
