//! The engine entry point: inbound events in, routed payloads out.
//!
//! The transport layer (outside this workspace) delivers inbound events
//! as `(game code, player identity, Event)` tuples and fans the returned
//! `(Scope, Outbound)` pairs out to connected sockets. The engine never
//! addresses a raw connection — only scopes.

use darkgrid_protocol::{Event, GameCode, Outbound, Scope};
use darkgrid_session::{Batch, GameConfig, SessionHandle, SessionRegistry};
use tokio::sync::Mutex;

use crate::DarkgridError;

/// The process-wide engine: one session registry plus the configuration
/// applied to sessions it creates.
///
/// Cheap to share behind an `Arc`; the registry lock is held only long
/// enough to resolve a handle, so sessions stay independent of each
/// other.
pub struct Engine {
    registry: Mutex<SessionRegistry>,
    config: GameConfig,
}

impl Engine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            registry: Mutex::new(SessionRegistry::new()),
            config: config.validated(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(GameConfig::default())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Explicitly creates a session under a code.
    ///
    /// # Errors
    /// [`RegistryError::AlreadyExists`](darkgrid_session::RegistryError)
    /// if the code is taken.
    pub async fn create(&self, code: &GameCode) -> Result<(), DarkgridError> {
        let mut registry = self.registry.lock().await;
        registry.create(code.clone(), self.config.clone())?;
        Ok(())
    }

    /// Dispatches one inbound event into its session.
    ///
    /// Recoverable violations (wrong phase, bad target, duplicate name,
    /// parse failures) never surface as errors here: they come back as a
    /// unicast [`Outbound::Notice`] to the causing player, matching the
    /// product rule that illegitimate attempts get an in-band explanation
    /// rather than a protocol error.
    pub async fn handle(
        &self,
        code: &GameCode,
        player: &str,
        event: Event,
    ) -> Batch {
        let result = self.dispatch(code, player, event).await;
        match result {
            Ok(batch) => batch,
            Err(e) => {
                tracing::debug!(%code, player, error = %e, "event refused");
                vec![(Scope::player(player), Outbound::notice(e.to_string()))]
            }
        }
    }

    async fn dispatch(
        &self,
        code: &GameCode,
        player: &str,
        event: Event,
    ) -> Result<Batch, DarkgridError> {
        match event {
            Event::Join { alias } => {
                // Joining a code that doesn't exist yet creates the
                // session on first reference.
                let handle = {
                    let mut registry = self.registry.lock().await;
                    registry.ensure(code, &self.config)
                };
                Ok(handle.join(player, &alias).await?)
            }
            Event::Start => {
                let handle = self.session(code).await?;
                Ok(handle.start().await?)
            }
            Event::Action { kind, target } => {
                let handle = self.session(code).await?;
                Ok(handle.submit_action(player, kind, &target).await?)
            }
            Event::Chat { text } => {
                let handle = self.session(code).await?;
                Ok(handle.chat(player, &text).await?)
            }
            Event::Snapshot => {
                let handle = self.session(code).await?;
                let view = handle.snapshot(player).await?;
                Ok(vec![(
                    Scope::player(player),
                    Outbound::Snapshot { view },
                )])
            }
        }
    }

    /// Moves a session one step along the round cycle. Called by the
    /// external phase timer.
    ///
    /// # Errors
    /// Registry lookup failures and `InvalidTransition` (e.g. the game
    /// ended between timer ticks) — callers log and drop these.
    pub async fn advance(
        &self,
        code: &GameCode,
    ) -> Result<Batch, DarkgridError> {
        let handle = self.session(code).await?;
        Ok(handle.advance().await?)
    }

    /// Marks a player offline after their connection dropped. Their role
    /// and pending actions are retained.
    pub async fn disconnect(
        &self,
        code: &GameCode,
        player: &str,
    ) -> Result<Batch, DarkgridError> {
        let handle = self.session(code).await?;
        Ok(handle.disconnect(player).await?)
    }

    /// Sweeps ended sessions out of the registry. Returns removed codes.
    pub async fn purge_ended(&self) -> Vec<GameCode> {
        let mut registry = self.registry.lock().await;
        registry.purge_ended().await
    }

    async fn session(
        &self,
        code: &GameCode,
    ) -> Result<SessionHandle, DarkgridError> {
        let registry = self.registry.lock().await;
        Ok(registry.get(code)?)
    }
}
