//! Keyed map of running sessions.
//!
//! The registry replaces a process-wide battle singleton: each game code maps
//! to the handle of the worker that owns that battle. The lock is held only
//! to look up, insert or remove handles, never across a session command.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use battle_core::SessionId;
use tokio::sync::RwLock;

use super::{Result, RuntimeError, SessionHandle};

/// Shared registry of live session handles.
#[derive(Clone, Debug, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle, refusing to replace a running session.
    pub async fn insert(&self, handle: SessionHandle) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(handle.session_id().clone()) {
            Entry::Occupied(entry) => Err(RuntimeError::SessionAlreadyExists {
                session_id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(handle);
                Ok(())
            }
        }
    }

    /// Looks a session up by id.
    pub async fn get(&self, session_id: &SessionId) -> Result<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RuntimeError::SessionNotFound {
                session_id: session_id.clone(),
            })
    }

    pub async fn remove(&self, session_id: &SessionId) -> Option<SessionHandle> {
        self.sessions.write().await.remove(session_id)
    }

    pub async fn contains(&self, session_id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Ids of every registered session, sorted.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(id: &str) -> SessionHandle {
        let (tx, _rx) = mpsc::channel(1);
        SessionHandle::new(SessionId::new(id), tx, HashMap::new())
    }

    #[tokio::test]
    async fn refuses_duplicate_ids() {
        let registry = SessionRegistry::new();
        registry.insert(handle("ABCD")).await.unwrap();

        let err = registry.insert(handle("ABCD")).await.unwrap_err();
        assert!(matches!(err, RuntimeError::SessionAlreadyExists { .. }));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn lookup_after_removal_fails() {
        let registry = SessionRegistry::new();
        registry.insert(handle("ABCD")).await.unwrap();
        registry.insert(handle("WXYZ")).await.unwrap();

        assert!(registry.remove(&SessionId::new("ABCD")).await.is_some());
        assert!(matches!(
            registry.get(&SessionId::new("ABCD")).await,
            Err(RuntimeError::SessionNotFound { .. })
        ));
        assert_eq!(registry.session_ids().await, vec![SessionId::new("WXYZ")]);
    }
}
