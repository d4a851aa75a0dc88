//! Core shared types: game codes, roles, phases, and routing scopes.
//!
//! Everything here crosses a crate boundary — either between the engine
//! layers or over the wire to a transport adapter — so these types carry
//! serde derives and pinned JSON shapes (see the tests at the bottom).

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The code identifying one game session.
///
/// Players share a code out of band ("join game `oriontest`") and every
/// inbound event is tagged with it. Newtype over `String` so a code can't
/// be confused with a player name or an alias in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCode(pub String);

impl GameCode {
    /// Returns the code as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GameCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

// ---------------------------------------------------------------------------
// Roles and role-derived categories
// ---------------------------------------------------------------------------

/// The hidden role assigned to a player when the game starts.
///
/// Closed set — every phase gate and resolution step matches exhaustively,
/// so adding a role is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary participant. No night action.
    User,
    /// Attacker: takes users offline at night.
    Hacker,
    /// Protector: shields one player per night.
    Whitehat,
    /// Investigator: scans a player for a coarse threat reading.
    Analyst,
}

impl Role {
    /// The night action this role is entitled to submit, if any.
    pub fn action(self) -> Option<ActionKind> {
        match self {
            Role::User => None,
            Role::Hacker => Some(ActionKind::Target),
            Role::Whitehat => Some(ActionKind::Protect),
            Role::Analyst => Some(ActionKind::Scan),
        }
    }

    /// The faction this role wins with.
    pub fn faction(self) -> Faction {
        match self {
            Role::Hacker => Faction::Hackers,
            Role::User | Role::Whitehat | Role::Analyst => Faction::Users,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Hacker => "hacker",
            Role::Whitehat => "whitehat",
            Role::Analyst => "analyst",
        };
        write!(f, "{name}")
    }
}

/// The coarse category a scan reveals instead of the exact role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threat {
    Suspicious,
    Clear,
}

impl Threat {
    /// Maps a role to what a scan reports about it.
    pub fn of(role: Role) -> Self {
        match role {
            Role::Hacker => Threat::Suspicious,
            Role::User | Role::Whitehat | Role::Analyst => Threat::Clear,
        }
    }
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threat::Suspicious => write!(f, "suspicious"),
            Threat::Clear => write!(f, "clear"),
        }
    }
}

/// A faction that can win the game.
///
/// `Ord` is derived only so [`Phase`] can derive its monotonic ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Hackers,
    Users,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Hackers => write!(f, "hackers"),
            Faction::Users => write!(f, "users"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The kinds of night action a role can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Hacker attack.
    Target,
    /// Whitehat protection.
    Protect,
    /// Analyst investigation.
    Scan,
}

impl ActionKind {
    /// The role entitled to submit this action kind.
    pub fn role(self) -> Role {
        match self {
            ActionKind::Target => Role::Hacker,
            ActionKind::Protect => Role::Whitehat,
            ActionKind::Scan => Role::Analyst,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Target => write!(f, "target"),
            ActionKind::Protect => write!(f, "protect"),
            ActionKind::Scan => write!(f, "scan"),
        }
    }
}

/// What resolution decided for one submitted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The target was taken offline.
    Eliminated,
    /// The target was shielded; the attack was neutralized.
    Protected,
    /// An earlier attack already resolved this target this round.
    AlreadyResolved,
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Eliminated => write!(f, "eliminated"),
            ActionOutcome::Protected => write!(f, "protected"),
            ActionOutcome::AlreadyResolved => write!(f, "target already resolved"),
        }
    }
}

/// Whether a player is still in the game.
///
/// Players are never removed from a session — elimination and
/// disconnection both mark them `Offline` so resolution history stays
/// intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Online,
    Offline,
}

// ---------------------------------------------------------------------------
// Phase state machine
// ---------------------------------------------------------------------------

/// The step within one active round.
///
/// Steps cycle per round:
///
/// ```text
/// NightAction → Resolution → Day → NightAction (next round)
/// ```
///
/// - **NightAction**: role-private chat, night actions accepted.
/// - **Resolution**: actions resolved; only system messages go out.
/// - **Day**: public chat, no actions.
///
/// Variant order matters — the derived `Ord` is the within-round ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    NightAction,
    Resolution,
    Day,
}

impl Step {
    /// The next step within the same round, or `None` when the round is
    /// over and the cycle restarts at `NightAction` of round N+1.
    pub fn next_in_round(self) -> Option<Step> {
        match self {
            Step::NightAction => Some(Step::Resolution),
            Step::Resolution => Some(Step::Day),
            Step::Day => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::NightAction => write!(f, "night"),
            Step::Resolution => write!(f, "resolution"),
            Step::Day => write!(f, "day"),
        }
    }
}

/// The lifecycle phase of a game session.
///
/// ```text
/// Waiting → Active { round 1.. , step } → Ended { winner }
/// ```
///
/// The derived `Ord` gives the monotonic ordering the engine promises:
/// `Waiting < Active(r, s) < Ended`, with `Active` ordered by round first,
/// then step. No operation ever moves a session backwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Session exists, players may join, game not started.
    Waiting,
    /// A round is in progress.
    Active { round: u32, step: Step },
    /// A win condition was met. Terminal.
    Ended { winner: Faction },
}

impl Phase {
    /// Returns `true` while players may still join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Phase::Waiting)
    }

    /// Returns `true` once a win condition has been reached.
    pub fn is_ended(&self) -> bool {
        matches!(self, Phase::Ended { .. })
    }

    /// Returns `true` if night actions are currently accepted.
    pub fn accepts_actions(&self) -> bool {
        matches!(
            self,
            Phase::Active {
                step: Step::NightAction,
                ..
            }
        )
    }

    /// Returns `true` if player-originated chat is currently accepted.
    ///
    /// During `Resolution` (and outside active rounds) only
    /// system-originated messages go out.
    pub fn allows_player_chat(&self) -> bool {
        matches!(
            self,
            Phase::Active {
                step: Step::NightAction | Step::Day,
                ..
            }
        )
    }

    /// The current round number, if a round is active.
    pub fn round(&self) -> Option<u32> {
        match self {
            Phase::Active { round, .. } => Some(*round),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Waiting => write!(f, "waiting"),
            Phase::Active { round, step } => write!(f, "{step} (round {round})"),
            Phase::Ended { winner } => write!(f, "ended ({winner} win)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scope — where an outbound payload is delivered
// ---------------------------------------------------------------------------

/// The routing destination for an outbound payload.
///
/// The transport layer fans a `(Scope, Outbound)` pair out to the sockets
/// subscribed to that scope. Typed rather than a concatenated room-name
/// string, so code/role pairs cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    /// Unicast to one player's connection.
    Player { name: String },
    /// Broadcast to every member of one role within a session.
    Role { code: GameCode, role: Role },
    /// Broadcast to the whole session.
    Session { code: GameCode },
}

impl Scope {
    pub fn player(name: impl Into<String>) -> Self {
        Scope::Player { name: name.into() }
    }

    pub fn role(code: GameCode, role: Role) -> Self {
        Scope::Role { code, role }
    }

    pub fn session(code: GameCode) -> Self {
        Scope::Session { code }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Player { name } => write!(f, "player:{name}"),
            Scope::Role { code, role } => write!(f, "role:{code}/{role}"),
            Scope::Session { code } => write!(f, "session:{code}"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&GameCode::from("g1")).unwrap();
        assert_eq!(json, "\"g1\"");
    }

    #[test]
    fn test_role_action_mapping_is_inverse_of_kind_role() {
        for kind in [ActionKind::Target, ActionKind::Protect, ActionKind::Scan] {
            assert_eq!(kind.role().action(), Some(kind));
        }
        assert_eq!(Role::User.action(), None);
    }

    #[test]
    fn test_threat_of_hides_exact_role() {
        assert_eq!(Threat::of(Role::Hacker), Threat::Suspicious);
        assert_eq!(Threat::of(Role::User), Threat::Clear);
        assert_eq!(Threat::of(Role::Whitehat), Threat::Clear);
        assert_eq!(Threat::of(Role::Analyst), Threat::Clear);
    }

    #[test]
    fn test_step_cycle_within_round() {
        assert_eq!(Step::NightAction.next_in_round(), Some(Step::Resolution));
        assert_eq!(Step::Resolution.next_in_round(), Some(Step::Day));
        assert_eq!(Step::Day.next_in_round(), None);
    }

    #[test]
    fn test_phase_ordering_is_monotonic() {
        let night1 = Phase::Active {
            round: 1,
            step: Step::NightAction,
        };
        let day1 = Phase::Active {
            round: 1,
            step: Step::Day,
        };
        let night2 = Phase::Active {
            round: 2,
            step: Step::NightAction,
        };
        let ended = Phase::Ended {
            winner: Faction::Users,
        };

        assert!(Phase::Waiting < night1);
        assert!(night1 < day1);
        assert!(day1 < night2);
        assert!(night2 < ended);
    }

    #[test]
    fn test_phase_gates() {
        let night = Phase::Active {
            round: 1,
            step: Step::NightAction,
        };
        let resolution = Phase::Active {
            round: 1,
            step: Step::Resolution,
        };
        let day = Phase::Active {
            round: 1,
            step: Step::Day,
        };

        assert!(night.accepts_actions());
        assert!(!resolution.accepts_actions());
        assert!(!day.accepts_actions());

        assert!(night.allows_player_chat());
        assert!(!resolution.allows_player_chat());
        assert!(day.allows_player_chat());

        assert!(Phase::Waiting.is_joinable());
        assert!(!night.is_joinable());
        assert!(!Phase::Waiting.allows_player_chat());
        assert!(
            !Phase::Ended {
                winner: Faction::Hackers
            }
            .allows_player_chat()
        );
    }

    #[test]
    fn test_phase_json_shape() {
        let phase = Phase::Active {
            round: 2,
            step: Step::Day,
        };
        let json: serde_json::Value = serde_json::to_value(phase).unwrap();
        assert_eq!(json["phase"], "active");
        assert_eq!(json["round"], 2);
        assert_eq!(json["step"], "day");
    }

    #[test]
    fn test_scope_display_matches_routing_labels() {
        assert_eq!(Scope::player("alice").to_string(), "player:alice");
        assert_eq!(
            Scope::role(GameCode::from("g1"), Role::Hacker).to_string(),
            "role:g1/hacker"
        );
        assert_eq!(
            Scope::session(GameCode::from("g1")).to_string(),
            "session:g1"
        );
    }

    #[test]
    fn test_scope_json_is_internally_tagged() {
        let scope = Scope::role(GameCode::from("g1"), Role::Analyst);
        let json: serde_json::Value = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["scope"], "role");
        assert_eq!(json["code"], "g1");
        assert_eq!(json["role"], "analyst");
    }
}
