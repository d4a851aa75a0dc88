//! # darkgrid
//!
//! A social-deduction game session engine. Players join a code-identified
//! game, receive hidden roles, and play through timed night/day rounds in
//! which role actions (target, protect, scan) are resolved
//! deterministically and chat visibility follows role and phase.
//!
//! The engine is transport-agnostic: a page/session layer and a realtime
//! transport layer live outside this workspace and talk to [`Engine`]
//! through `(game code, player, Event)` tuples in and `(Scope, Outbound)`
//! pairs out.
//!
//! ```rust,no_run
//! use darkgrid::prelude::*;
//!
//! # async fn demo() {
//! let engine = Engine::with_defaults();
//! let code = GameCode::from("g1");
//! let out = engine
//!     .handle(&code, "alice", Event::Join { alias: "al1ce".into() })
//!     .await;
//! for (scope, payload) in out {
//!     // hand each payload to the transport layer's fan-out for `scope`
//!     let _ = (scope, payload);
//! }
//! # }
//! ```

mod engine;
mod error;

pub use engine::Engine;
pub use error::DarkgridError;

/// Common imports for embedding the engine.
pub mod prelude {
    pub use crate::{DarkgridError, Engine};
    pub use darkgrid_protocol::{
        ActionKind, ActionOutcome, Event, Faction, GameCode, Outbound, Phase,
        PlayerStatus, Role, Scope, SessionView, Step, Threat,
    };
    pub use darkgrid_session::{Batch, GameConfig};
}
