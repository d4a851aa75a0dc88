//! Inbound events and outbound payloads.
//!
//! The transport layer delivers `(game code, player, Event)` tuples into
//! the engine and fans `(Scope, Outbound)` pairs back out to sockets. Both
//! enums are internally tagged so the JSON reads
//! `{ "type": "chat", "text": "..." }` on the client side.

use serde::{Deserialize, Serialize};

use crate::{
    ActionKind, ActionOutcome, Faction, GameCode, Phase, PlayerStatus, Role,
    Step, Threat,
};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A client-originated event, already tagged with its game code and the
/// issuing player's identity by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Join the session under a display alias.
    Join { alias: String },
    /// Start the game (assign roles, open round 1).
    Start,
    /// Submit a night action against a player identity.
    Action { kind: ActionKind, target: String },
    /// Send a chat line (or a `/command`).
    Chat { text: String },
    /// Request the caller's view of session state.
    Snapshot,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A server-originated payload, paired with a [`Scope`](crate::Scope) that
/// tells the transport layer who receives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// A player chat line. `sender` is an alias during the day and a
    /// fixed anonymized label at night.
    Chat { sender: String, text: String },
    /// An in-band system notice (authorization failures, offline notices,
    /// command errors). Always unicast to the actor who caused it.
    Notice { text: String },
    /// The resolved outcome of a submitted action, unicast to its issuer.
    ActionResult {
        kind: ActionKind,
        target: String,
        outcome: ActionOutcome,
    },
    /// The immediate answer to a scan, unicast to the analyst.
    ScanResult { target: String, threat: Threat },
    /// Unicast to each player when roles are dealt.
    RoleAssigned { role: Role },
    /// The game left the waiting phase.
    GameStarted,
    /// The session moved to a new round step.
    PhaseChanged { round: u32, step: Step },
    /// A player was taken offline during resolution.
    Eliminated { name: String, alias: String },
    /// A win condition was met.
    GameEnded { winner: Faction },
    /// A read-only projection of session state for one viewer.
    Snapshot { view: SessionView },
}

impl Outbound {
    /// Shorthand for a system notice.
    pub fn notice(text: impl Into<String>) -> Self {
        Outbound::Notice { text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Snapshot views
// ---------------------------------------------------------------------------

/// One viewer's projection of a session.
///
/// The viewer's own record is complete; everyone else is redacted to
/// public fields, plus any coarse threat reading the viewer's own scans
/// revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub code: GameCode,
    pub phase: Phase,
    /// Players in join order.
    pub players: Vec<PlayerView>,
}

/// One player as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub alias: String,
    pub status: PlayerStatus,
    /// Present only on the viewer's own entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Present when the viewer scanned this player.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat: Option<Threat>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_action_json_shape() {
        let event = Event::Action {
            kind: ActionKind::Target,
            target: "bob".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["kind"], "target");
        assert_eq!(json["target"], "bob");
    }

    #[test]
    fn test_event_roundtrips_through_json() {
        let event = Event::Join {
            alias: "sussybaka".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_outbound_chat_json_shape() {
        let payload = Outbound::Chat {
            sender: "Anonymous".into(),
            text: "who do we hit".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "chat");
        assert_eq!(json["sender"], "Anonymous");
    }

    #[test]
    fn test_outbound_scan_result_reports_coarse_category_only() {
        let payload = Outbound::ScanResult {
            target: "alice".into(),
            threat: Threat::Suspicious,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("suspicious"));
        // The exact role never appears in a scan result.
        assert!(!json.contains("hacker"));
    }

    #[test]
    fn test_player_view_omits_absent_role_and_threat() {
        let view = PlayerView {
            name: "bob".into(),
            alias: "b0b".into(),
            status: PlayerStatus::Online,
            role: None,
            threat: None,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();
        assert!(json.get("role").is_none());
        assert!(json.get("threat").is_none());
    }
}
