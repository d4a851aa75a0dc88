//! Game session engine for darkgrid.
//!
//! One [`GameSession`] is one isolated game: its players, its phase state
//! machine, and the current round's pending actions. Each session runs as
//! an isolated Tokio task (actor model) addressed through a
//! [`SessionHandle`]; the [`SessionRegistry`] maps game codes to handles.
//!
//! # Key types
//!
//! - [`GameSession`] — the session state machine (synchronous core)
//! - [`SessionHandle`] / [`SessionRegistry`] — actor handle and registry
//! - [`GameConfig`] — player limits, role ratios, phase timing
//! - [`resolve`](resolve::resolve) — the pure night-resolution rules
//! - [`router`] — scope computation for outbound payloads

mod actor;
mod config;
mod error;
mod game;
mod player;
mod registry;
pub mod resolve;
pub mod router;

pub use actor::SessionHandle;
pub use config::{GameConfig, RoleCounts};
pub use error::{RegistryError, SessionError};
pub use game::{Batch, GameSession};
pub use player::Player;
pub use registry::SessionRegistry;
