//! Shared types for the darkgrid game engine.
//!
//! This crate defines the "language" the engine speaks with its
//! collaborators: identity and role types, the phase state machine, typed
//! routing scopes, inbound events, outbound payloads, and chat-command
//! parsing. It has no runtime dependencies beyond serde — the transport
//! and timer layers live outside the workspace entirely.

mod command;
mod error;
mod event;
mod types;

pub use command::{Command, COMMAND_MARKER, is_command, parse_command};
pub use error::ProtocolError;
pub use event::{Event, Outbound, PlayerView, SessionView};
pub use types::{
    ActionKind, ActionOutcome, Faction, GameCode, Phase, PlayerStatus, Role,
    Scope, Step, Threat,
};
