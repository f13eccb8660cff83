//! In-memory session store

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};

use super::{ConversationMemory, MemoryStrategy};

/// Memory handle for one session. Holding the lock makes the holder the session's only writer.
pub type SharedMemory = Arc<Mutex<ConversationMemory>>;

struct SessionEntry {
    memory: SharedMemory,
    last_used: Instant,
}

/// In-memory session store (lost on restart)
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    strategy: MemoryStrategy,
    max_sessions: usize,
}

impl SessionStore {
    /// Create a new store
    pub fn new(strategy: MemoryStrategy, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            strategy,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Get the session's memory, creating it on first use
    pub async fn session(&self, session_id: &str) -> SharedMemory {
        let mut sessions = self.sessions.write().await;

        if let Some(entry) = sessions.get_mut(session_id) {
            entry.last_used = Instant::now();
            return entry.memory.clone();
        }

        if sessions.len() >= self.max_sessions {
            Self::evict_idle(&mut sessions);
        }

        let memory = Arc::new(Mutex::new(ConversationMemory::new(self.strategy)));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                memory: memory.clone(),
                last_used: Instant::now(),
            },
        );
        tracing::debug!(session_id, "Created conversation memory");
        memory
    }

    /// Look up an existing session without creating it
    pub async fn get(&self, session_id: &str) -> Option<SharedMemory> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map(|e| e.memory.clone())
    }

    /// Clear a session's history. Returns false if the session never existed.
    pub async fn clear(&self, session_id: &str) -> bool {
        let memory = match self.get(session_id).await {
            Some(m) => m,
            None => return false,
        };
        memory.lock().await.clear();
        true
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop the least recently used session nobody is holding
    fn evict_idle(sessions: &mut HashMap<String, SessionEntry>) {
        let victim = sessions
            .iter()
            .filter(|(_, e)| Arc::strong_count(&e.memory) == 1)
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());

        match victim {
            Some(key) => {
                sessions.remove(&key);
                tracing::info!(session_id = %key, "Evicted idle session");
            }
            None => tracing::warn!("Session limit reached but every session is in use"),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(MemoryStrategy::default(), 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::domain::NewTurn;

    #[tokio::test]
    async fn test_session_created_once() {
        let store = SessionStore::default();
        let a = store.session("s1").await;
        let b = store.session("s1").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        store.session("a").await.lock().await.append(NewTurn::user("for a"));
        let b = store.session("b").await;
        assert!(b.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_unknown_session() {
        let store = SessionStore::default();
        assert!(!store.clear("missing").await);
        store.session("known").await.lock().await.append(NewTurn::user("x"));
        assert!(store.clear("known").await);
        assert!(store.clear("known").await);
        assert!(store.get("known").await.unwrap().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used_idle_session() {
        let store = SessionStore::new(MemoryStrategy::Full, 2);
        drop(store.session("first").await);
        let held = store.session("second").await;
        drop(store.session("third").await);

        assert_eq!(store.len().await, 2);
        assert!(store.get("first").await.is_none());
        assert!(store.get("second").await.is_some());
        drop(held);
    }

    #[tokio::test]
    async fn test_in_use_sessions_are_not_evicted() {
        let store = SessionStore::new(MemoryStrategy::Full, 1);
        let held = store.session("busy").await;
        let _other = store.session("new").await;
        // Both survive; the limit is soft while sessions are in use
        assert!(store.get("busy").await.is_some());
        drop(held);
    }
}
