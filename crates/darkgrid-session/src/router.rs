//! Message routing: which scope an outbound payload is delivered to.
//!
//! The router never touches session state — it maps (phase, sender) to a
//! destination scope and a sender label. Night chat stays inside the
//! sender's role group under a fixed anonymized label; day chat goes to
//! the whole session under the sender's alias.

use darkgrid_protocol::{GameCode, Phase, Role, Scope, Step};

use crate::Player;

/// The sender label shown on role-private night chat.
pub const ANONYMOUS_LABEL: &str = "Anonymous";

/// Where a player chat line goes, and under what sender label.
///
/// Returns `None` when the phase does not permit player chat (waiting,
/// resolution, ended) — the caller turns that into an in-band notice.
/// Requires the sender's role to be assigned during active rounds.
pub fn chat_route(
    phase: &Phase,
    code: &GameCode,
    sender: &Player,
) -> Option<(Scope, String)> {
    match phase {
        Phase::Active {
            step: Step::NightAction,
            ..
        } => {
            let role = sender.role?;
            Some((
                Scope::role(code.clone(), role),
                ANONYMOUS_LABEL.to_string(),
            ))
        }
        Phase::Active {
            step: Step::Day, ..
        } => Some((Scope::session(code.clone()), sender.alias.clone())),
        _ => None,
    }
}

/// The unicast scope for command outcomes and system notices: always the
/// issuing player only.
pub fn reply_to(player: &str) -> Scope {
    Scope::player(player)
}

/// The scope for system-originated announcements (phase changes,
/// eliminations, game end): the whole session.
pub fn announce_to(code: &GameCode) -> Scope {
    Scope::session(code.clone())
}

/// The role-private scope for one role group of a session.
pub fn role_group(code: &GameCode, role: Role) -> Scope {
    Scope::role(code.clone(), role)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use darkgrid_protocol::Faction;

    fn sender(role: Option<Role>) -> Player {
        let mut p = Player::new("alice", "al1ce");
        p.role = role;
        p
    }

    fn code() -> GameCode {
        GameCode::from("g1")
    }

    #[test]
    fn test_chat_route_night_is_role_private_and_anonymous() {
        let phase = Phase::Active {
            round: 1,
            step: Step::NightAction,
        };
        let (scope, label) =
            chat_route(&phase, &code(), &sender(Some(Role::User))).unwrap();
        assert_eq!(scope, Scope::role(code(), Role::User));
        assert_eq!(label, ANONYMOUS_LABEL);
    }

    #[test]
    fn test_chat_route_day_is_public_under_alias() {
        let phase = Phase::Active {
            round: 1,
            step: Step::Day,
        };
        let (scope, label) =
            chat_route(&phase, &code(), &sender(Some(Role::Hacker))).unwrap();
        assert_eq!(scope, Scope::session(code()));
        assert_eq!(label, "al1ce");
    }

    #[test]
    fn test_chat_route_refused_outside_chat_steps() {
        let player = sender(Some(Role::User));
        for phase in [
            Phase::Waiting,
            Phase::Active {
                round: 1,
                step: Step::Resolution,
            },
            Phase::Ended {
                winner: Faction::Users,
            },
        ] {
            assert!(chat_route(&phase, &code(), &player).is_none());
        }
    }

    #[test]
    fn test_reply_to_is_unicast() {
        assert_eq!(reply_to("alice"), Scope::player("alice"));
    }
}
