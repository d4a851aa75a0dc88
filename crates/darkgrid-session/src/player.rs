//! Per-participant state within one session.

use std::collections::HashMap;

use darkgrid_protocol::{ActionOutcome, PlayerView, PlayerStatus, Role, Threat};

/// One participant's record, owned exclusively by its session.
///
/// `name` is the identity — unique within the session. `alias` is what
/// other players see and need not be unique. Records are never deleted:
/// elimination and disconnection both flip `status` to `Offline` so that
/// resolution can keep referring to the player.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub alias: String,
    /// Unset until the game starts and roles are dealt.
    pub role: Option<Role>,
    pub status: PlayerStatus,
    /// What resolution last decided about this player (as a target).
    pub last_outcome: Option<ActionOutcome>,
    /// Coarse readings this player's own scans have revealed, keyed by
    /// target identity. Only ever populated for analysts.
    pub intel: HashMap<String, Threat>,
}

impl Player {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            role: None,
            status: PlayerStatus::Online,
            last_outcome: None,
            intel: HashMap::new(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == PlayerStatus::Online
    }

    /// Projects this record for a viewer.
    ///
    /// The owner sees their role; everyone else sees public fields only,
    /// plus whatever coarse threat reading the viewer's scans produced.
    pub fn view_for(&self, viewer: &Player) -> PlayerView {
        let own = viewer.name == self.name;
        PlayerView {
            name: self.name.clone(),
            alias: self.alias.clone(),
            status: self.status,
            role: if own { self.role } else { None },
            threat: if own {
                None
            } else {
                viewer.intel.get(&self.name).copied()
            },
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
