//! Conversation session management
//!
//! A session is the provider-scoped conversation context: the NLU service
//! keys its own multi-turn state on the session id, so all the core keeps is
//! the identifiers plus enough bookkeeping to expire idle sessions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Identity of one user conversation, passed by reference on every turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: String,
    pub user_id: String,
    pub language_code: String,
}

impl ConversationSession {
    /// Create a session with a generated id
    pub fn new(user_id: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            language_code: language_code.into(),
        }
    }

    /// Create a session with a caller-chosen id
    pub fn with_id(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            language_code: language_code.into(),
        }
    }

    /// Provider-scoped composite key for the detect-intent call
    pub fn session_path(&self, project_id: &str) -> String {
        format!(
            "projects/{}/agent/sessions/{}",
            project_id, self.session_id
        )
    }
}

struct SessionEntry {
    session: ConversationSession,
    last_activity: Instant,
}

/// Tracks live sessions and expires the ones that went idle.
///
/// Owned by the calling application; the core never mutates session data
/// beyond the bookkeeping here. Capacity is bounded: when full, the
/// longest-idle session is evicted to make room.
pub struct SessionManager {
    sessions: HashMap<String, SessionEntry>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
            max_sessions,
        }
    }

    /// Create and register a new session for a user
    pub fn create(
        &mut self,
        user_id: impl Into<String>,
        language_code: impl Into<String>,
    ) -> ConversationSession {
        if self.sessions.len() >= self.max_sessions {
            self.evict_longest_idle();
        }

        let session = ConversationSession::new(user_id, language_code);
        self.sessions.insert(
            session.session_id.clone(),
            SessionEntry {
                session: session.clone(),
                last_activity: Instant::now(),
            },
        );
        session
    }

    /// Fetch a session and mark it active. Returns `None` for unknown ids
    /// and for sessions that have sat idle past the timeout.
    pub fn touch(&mut self, session_id: &str) -> Option<ConversationSession> {
        let idle_timeout = self.idle_timeout;
        let entry = self.sessions.get_mut(session_id)?;

        if entry.last_activity.elapsed() >= idle_timeout {
            self.sessions.remove(session_id);
            return None;
        }

        entry.last_activity = Instant::now();
        Some(entry.session.clone())
    }

    /// Drop every session idle past the timeout; returns how many were removed
    pub fn prune_idle(&mut self) -> usize {
        let idle_timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_activity.elapsed() < idle_timeout);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn evict_longest_idle(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .max_by_key(|(_, entry)| entry.last_activity.elapsed())
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            tracing::debug!(session = %id, "evicting longest-idle session");
            self.sessions.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_path() {
        let session = ConversationSession::with_id("abc-123", "user-9", "en");
        assert_eq!(
            session.session_path("my-project"),
            "projects/my-project/agent/sessions/abc-123"
        );
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ConversationSession::new("u", "en");
        let b = ConversationSession::new("u", "en");
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_touch_keeps_live_sessions() {
        let mut manager = SessionManager::new(Duration::from_secs(1800), 10);
        let session = manager.create("user-1", "en");

        let found = manager.touch(&session.session_id);
        assert!(found.is_some());
        assert_eq!(found.unwrap().user_id, "user-1");
    }

    #[test]
    fn test_idle_sessions_expire() {
        let mut manager = SessionManager::new(Duration::ZERO, 10);
        let session = manager.create("user-1", "en");

        assert!(manager.touch(&session.session_id).is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_prune_idle() {
        let mut manager = SessionManager::new(Duration::ZERO, 10);
        manager.create("user-1", "en");
        manager.create("user-2", "en");

        assert_eq!(manager.prune_idle(), 2);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_capacity_evicts_longest_idle() {
        let mut manager = SessionManager::new(Duration::from_secs(1800), 2);
        let first = manager.create("user-1", "en");
        std::thread::sleep(Duration::from_millis(5));
        let second = manager.create("user-2", "en");
        std::thread::sleep(Duration::from_millis(5));
        let third = manager.create("user-3", "en");

        assert_eq!(manager.len(), 2);
        assert!(manager.touch(&first.session_id).is_none());
        assert!(manager.touch(&second.session_id).is_some());
        assert!(manager.touch(&third.session_id).is_some());
    }
}
