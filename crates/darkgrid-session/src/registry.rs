//! Session registry: the process-wide map from game code to session.
//!
//! Owned explicitly by the embedding layer (created at process start,
//! typically behind one mutex), never a global. Entries are removed on
//! explicit shutdown or by the `purge_ended` sweep once a game reaches
//! `Ended`.

use std::collections::HashMap;

use darkgrid_protocol::GameCode;

use crate::actor::spawn_session;
use crate::{GameConfig, RegistryError, SessionHandle};

/// Default command channel size for session actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks every live session by its code.
///
/// Not thread-safe by itself on purpose — the embedding layer serializes
/// access at a higher level, the same way it owns the lock around
/// connection handling.
pub struct SessionRegistry {
    sessions: HashMap<GameCode, SessionHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Creates a session under a code.
    ///
    /// # Errors
    /// [`RegistryError::AlreadyExists`] if the code is taken.
    pub fn create(
        &mut self,
        code: GameCode,
        config: GameConfig,
    ) -> Result<SessionHandle, RegistryError> {
        if self.sessions.contains_key(&code) {
            return Err(RegistryError::AlreadyExists(code));
        }
        let handle =
            spawn_session(code.clone(), config, DEFAULT_CHANNEL_SIZE);
        self.sessions.insert(code.clone(), handle.clone());
        tracing::info!(%code, "session created");
        Ok(handle)
    }

    /// Looks up a session by code.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no session exists under the code.
    pub fn get(&self, code: &GameCode) -> Result<SessionHandle, RegistryError> {
        self.sessions
            .get(code)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(code.clone()))
    }

    /// Returns the session under a code, creating it on first reference.
    pub fn ensure(&mut self, code: &GameCode, config: &GameConfig) -> SessionHandle {
        if let Some(handle) = self.sessions.get(code) {
            return handle.clone();
        }
        let handle = spawn_session(
            code.clone(),
            config.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.sessions.insert(code.clone(), handle.clone());
        tracing::info!(%code, "session created on first reference");
        handle
    }

    /// Shuts a session down and drops it from the registry.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no session exists under the code.
    pub async fn remove(&mut self, code: &GameCode) -> Result<(), RegistryError> {
        let handle = self
            .sessions
            .remove(code)
            .ok_or_else(|| RegistryError::NotFound(code.clone()))?;
        let _ = handle.shutdown().await;
        tracing::info!(%code, "session removed");
        Ok(())
    }

    /// Sweeps out sessions that have reached `Ended` (or whose actor is
    /// gone), shutting their actors down. Returns the removed codes.
    ///
    /// Call periodically from the embedding layer's housekeeping timer.
    pub async fn purge_ended(&mut self) -> Vec<GameCode> {
        let mut purged = Vec::new();
        for (code, handle) in &self.sessions {
            match handle.status().await {
                Ok(phase) if phase.is_ended() => purged.push(code.clone()),
                Ok(_) => {}
                Err(_) => purged.push(code.clone()),
            }
        }
        for code in &purged {
            if let Some(handle) = self.sessions.remove(code) {
                let _ = handle.shutdown().await;
                tracing::info!(%code, "ended session purged");
            }
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// All live game codes.
    pub fn codes(&self) -> Vec<GameCode> {
        self.sessions.keys().cloned().collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
