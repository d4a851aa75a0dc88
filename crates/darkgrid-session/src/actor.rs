//! Session actor: an isolated Tokio task that owns one game session.
//!
//! Each session runs in its own task, communicating with connection
//! handlers through an mpsc channel. This is what serializes all mutation
//! of a session — phase transitions, action recording, and resolution are
//! linearizable per session, while different sessions run fully in
//! parallel.

use darkgrid_protocol::{ActionKind, GameCode, Phase, SessionView};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use crate::{Batch, GameConfig, GameSession, SessionError};

/// Commands sent to a session actor through its channel.
///
/// Each variant carries a `oneshot` reply channel; the caller awaits the
/// routed outbound batch (or the error) on it.
pub(crate) enum SessionCommand {
    Join {
        name: String,
        alias: String,
        reply: oneshot::Sender<Result<Batch, SessionError>>,
    },
    Start {
        reply: oneshot::Sender<Result<Batch, SessionError>>,
    },
    Action {
        name: String,
        kind: ActionKind,
        target: String,
        reply: oneshot::Sender<Result<Batch, SessionError>>,
    },
    Chat {
        name: String,
        text: String,
        reply: oneshot::Sender<Result<Batch, SessionError>>,
    },
    Advance {
        reply: oneshot::Sender<Result<Batch, SessionError>>,
    },
    Disconnect {
        name: String,
        reply: oneshot::Sender<Result<Batch, SessionError>>,
    },
    Snapshot {
        viewer: String,
        reply: oneshot::Sender<Result<SessionView, SessionError>>,
    },
    Status {
        reply: oneshot::Sender<Phase>,
    },
    Shutdown,
}

/// Handle to a running session actor. Cheap to clone — it wraps an
/// `mpsc::Sender`. The `SessionRegistry` holds one per game code.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    code: GameCode,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub async fn join(
        &self,
        name: &str,
        alias: &str,
    ) -> Result<Batch, SessionError> {
        self.request(|reply| SessionCommand::Join {
            name: name.to_string(),
            alias: alias.to_string(),
            reply,
        })
        .await
    }

    pub async fn start(&self) -> Result<Batch, SessionError> {
        self.request(|reply| SessionCommand::Start { reply }).await
    }

    pub async fn submit_action(
        &self,
        name: &str,
        kind: ActionKind,
        target: &str,
    ) -> Result<Batch, SessionError> {
        self.request(|reply| SessionCommand::Action {
            name: name.to_string(),
            kind,
            target: target.to_string(),
            reply,
        })
        .await
    }

    pub async fn chat(
        &self,
        name: &str,
        text: &str,
    ) -> Result<Batch, SessionError> {
        self.request(|reply| SessionCommand::Chat {
            name: name.to_string(),
            text: text.to_string(),
            reply,
        })
        .await
    }

    /// Moves the session one step along the round cycle. Called by the
    /// external phase timer, never from inside the core.
    pub async fn advance(&self) -> Result<Batch, SessionError> {
        self.request(|reply| SessionCommand::Advance { reply })
            .await
    }

    pub async fn disconnect(&self, name: &str) -> Result<Batch, SessionError> {
        self.request(|reply| SessionCommand::Disconnect {
            name: name.to_string(),
            reply,
        })
        .await
    }

    pub async fn snapshot(
        &self,
        viewer: &str,
    ) -> Result<SessionView, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot {
                viewer: viewer.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))?
    }

    /// The session's current phase.
    pub async fn status(&self) -> Result<Phase, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Status { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))
    }

    /// Tells the session actor to stop.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))
    }

    async fn request(
        &self,
        make: impl FnOnce(
            oneshot::Sender<Result<Batch, SessionError>>,
        ) -> SessionCommand,
    ) -> Result<Batch, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.code.clone()))?
    }
}

/// The actor task state: the session plus its role-deck RNG.
struct SessionActor {
    game: GameSession,
    rng: StdRng,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!(code = %self.game.code(), "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Join { name, alias, reply } => {
                    let _ = reply.send(self.game.join(&name, &alias));
                }
                SessionCommand::Start { reply } => {
                    let _ = reply.send(self.game.start(&mut self.rng));
                }
                SessionCommand::Action {
                    name,
                    kind,
                    target,
                    reply,
                } => {
                    let _ =
                        reply.send(self.game.submit_action(&name, kind, &target));
                }
                SessionCommand::Chat { name, text, reply } => {
                    let _ = reply.send(self.game.chat(&name, &text));
                }
                SessionCommand::Advance { reply } => {
                    let _ = reply.send(self.game.advance());
                }
                SessionCommand::Disconnect { name, reply } => {
                    let _ = reply.send(self.game.disconnect(&name));
                }
                SessionCommand::Snapshot { viewer, reply } => {
                    let _ = reply.send(self.game.snapshot(&viewer));
                }
                SessionCommand::Status { reply } => {
                    let _ = reply.send(self.game.phase());
                }
                SessionCommand::Shutdown => {
                    tracing::info!(
                        code = %self.game.code(),
                        "session shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!(code = %self.game.code(), "session actor stopped");
    }
}

/// Spawns a session actor task and returns a handle to it.
///
/// `channel_size` bounds the command channel — senders wait when it
/// fills, which backpressures a flooding connection without blocking
/// other sessions.
pub(crate) fn spawn_session(
    code: GameCode,
    config: GameConfig,
    channel_size: usize,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = SessionActor {
        game: GameSession::new(code.clone(), config),
        rng: StdRng::from_os_rng(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle { code, sender: tx }
}
