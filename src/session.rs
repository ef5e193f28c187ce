use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as SessionLock;
use uuid::Uuid;

/// Value types a session entry can hold.
///
/// The login flow only ever stores the CSRF `state` (text) and one pending
/// flag per issued nonce, keyed by the nonce value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValue {
    Text(String),
    Flag(bool),
}

/// Narrow capability interface the login core needs from the surrounding
/// session layer: keyed get/set, scoped to one browser session.
pub trait SessionContext: Send {
    fn get(&self, key: &str) -> Option<SessionValue>;
    fn set(&mut self, key: &str, value: SessionValue);
}

/// HashMap-backed session, one per browser session cookie.
#[derive(Debug, Default)]
pub struct MemorySession {
    entries: HashMap<String, SessionValue>,
}

impl SessionContext for MemorySession {
    fn get(&self, key: &str) -> Option<SessionValue> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SessionValue) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Process-local session store keyed by the browser session cookie.
///
/// Each session sits behind its own async mutex; a handler holds the lock for
/// the whole request, so concurrent callbacks for one session (duplicate tabs)
/// are serialized across the token exchange.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Arc<SessionLock<MemorySession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating an empty one on first use.
    pub fn session(&self, id: Uuid) -> Arc<SessionLock<MemorySession>> {
        let mut sessions = self
            .sessions
            .lock()
            .expect("session store mutex poisoned");
        sessions.entry(id).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_session_round_trip() {
        let mut session = MemorySession::default();
        assert_eq!(session.get("state"), None);

        session.set("state", SessionValue::Text("s-1".to_string()));
        session.set("n-1", SessionValue::Flag(true));

        assert_eq!(
            session.get("state"),
            Some(SessionValue::Text("s-1".to_string()))
        );
        assert_eq!(session.get("n-1"), Some(SessionValue::Flag(true)));
        assert_eq!(session.get("n-2"), None);
    }

    #[tokio::test]
    async fn store_hands_out_the_same_session_for_an_id() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        {
            let session = store.session(id);
            let mut session = session.lock().await;
            session.set("state", SessionValue::Text("s-1".to_string()));
        }

        let session = store.session(id);
        let session = session.lock().await;
        assert_eq!(
            session.get("state"),
            Some(SessionValue::Text("s-1".to_string()))
        );
    }

    #[tokio::test]
    async fn store_isolates_sessions() {
        let store = SessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        {
            let session = store.session(a);
            let mut session = session.lock().await;
            session.set("state", SessionValue::Text("s-a".to_string()));
        }

        let session = store.session(b);
        let session = session.lock().await;
        assert_eq!(session.get("state"), None);
    }
}
