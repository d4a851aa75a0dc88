//! Error types for the session layer.

use darkgrid_protocol::{GameCode, Phase};

/// Errors from operations on a single game session.
///
/// Every variant is recoverable: it leaves session state untouched and is
/// surfaced as a discrete message to the actor who caused it, never
/// broadcast and never fatal to the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The phase machine was asked for a transition it does not allow
    /// (e.g. starting a game that already started).
    #[error("invalid transition: game is {phase}")]
    InvalidTransition { phase: Phase },

    /// The player's role (or status) does not permit this action.
    #[error("your role does not permit this action")]
    NotAuthorized,

    /// The action is valid for this player but not in the current step.
    #[error("this action cannot be submitted right now")]
    WrongPhase,

    /// The action target is the issuer, offline, or not in the session.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A player with this identity already joined.
    #[error("the name {0} is already taken in this game")]
    DuplicateIdentity(String),

    /// The session reached its configured player limit.
    #[error("game {0} is full")]
    SessionFull(GameCode),

    /// Not enough players joined to deal the configured roles.
    #[error("need at least {need} players to start, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    /// The issuing identity is not a member of this session.
    #[error("no player named {0} in this game")]
    UnknownPlayer(String),

    /// The session actor's channel is gone (shut down or crashed).
    #[error("game {0} is unavailable")]
    Unavailable(GameCode),
}

/// Errors from the process-wide session registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No session exists under this code.
    #[error("no game with code {0}")]
    NotFound(GameCode),

    /// A session already exists under this code.
    #[error("a game with code {0} already exists")]
    AlreadyExists(GameCode),
}
