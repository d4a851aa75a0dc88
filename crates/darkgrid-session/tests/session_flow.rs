//! Integration tests for the session actor and registry.
//!
//! Roles are dealt randomly at this level, so the tests discover who got
//! which role through per-player snapshots — the same way a client would.

use darkgrid_protocol::{
    ActionKind, Faction, GameCode, Outbound, Phase, Role, Scope, Step,
};
use darkgrid_session::{
    GameConfig, RegistryError, SessionError, SessionHandle, SessionRegistry,
};

fn code(s: &str) -> GameCode {
    GameCode::from(s)
}

/// Small config so two players can start a game.
fn config() -> GameConfig {
    GameConfig {
        min_players: 2,
        max_players: 4,
        ..GameConfig::default()
    }
}

/// Finds the first joined player holding `role` via their own snapshot.
async fn player_with_role(
    handle: &SessionHandle,
    names: &[&str],
    role: Role,
) -> Option<String> {
    for name in names {
        let view = handle.snapshot(name).await.unwrap();
        let me = view.players.iter().find(|p| p.name == *name).unwrap();
        if me.role == Some(role) {
            return Some(name.to_string());
        }
    }
    None
}

// =========================================================================
// Registry
// =========================================================================

#[tokio::test]
async fn test_create_rejects_duplicate_code() {
    let mut registry = SessionRegistry::new();
    registry.create(code("g1"), config()).unwrap();
    assert_eq!(
        registry.create(code("g1"), config()).unwrap_err(),
        RegistryError::AlreadyExists(code("g1"))
    );
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_get_unknown_code_fails() {
    let registry = SessionRegistry::new();
    assert_eq!(
        registry.get(&code("nope")).unwrap_err(),
        RegistryError::NotFound(code("nope"))
    );
}

#[tokio::test]
async fn test_ensure_creates_on_first_reference() {
    let mut registry = SessionRegistry::new();
    let first = registry.ensure(&code("g1"), &config());
    let second = registry.ensure(&code("g1"), &config());
    assert_eq!(first.code(), second.code());
    assert_eq!(registry.len(), 1);

    // Both handles address the same actor.
    first.join("alice", "al1ce").await.unwrap();
    let err = second.join("alice", "other").await.unwrap_err();
    assert_eq!(err, SessionError::DuplicateIdentity("alice".into()));
}

#[tokio::test]
async fn test_remove_shuts_the_actor_down() {
    let mut registry = SessionRegistry::new();
    let handle = registry.create(code("g1"), config()).unwrap();
    registry.remove(&code("g1")).await.unwrap();
    assert!(registry.is_empty());

    // The handle eventually reports the session unavailable.
    let mut gone = false;
    for _ in 0..50 {
        if handle.status().await.is_err() {
            gone = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert!(gone, "actor should stop after remove");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let mut registry = SessionRegistry::new();
    let g1 = registry.create(code("g1"), config()).unwrap();
    let g2 = registry.create(code("g2"), config()).unwrap();

    // The same identity can exist in different sessions.
    g1.join("alice", "al1ce").await.unwrap();
    g2.join("alice", "al1ce").await.unwrap();
    g1.join("bob", "b0b").await.unwrap();
    g1.start().await.unwrap();

    // g2 is untouched by g1's start.
    assert_eq!(g2.status().await.unwrap(), Phase::Waiting);
    g2.join("bob", "b0b").await.unwrap();
}

// =========================================================================
// End-to-end game over the actor
// =========================================================================

#[tokio::test]
async fn test_two_player_game_runs_to_hacker_win() {
    // Full game through registry + actor: the hacker eliminates the
    // only user and the game ends.
    let mut registry = SessionRegistry::new();
    let handle = registry.create(code("g1"), config()).unwrap();
    handle.join("alice", "al1ce").await.unwrap();
    handle.join("bob", "b0b").await.unwrap();

    let batch = handle.start().await.unwrap();
    assert!(
        batch
            .iter()
            .any(|(_, p)| matches!(p, Outbound::GameStarted))
    );

    let names = ["alice", "bob"];
    let hacker = player_with_role(&handle, &names, Role::Hacker)
        .await
        .expect("a two-player game deals one hacker");
    let victim = names
        .iter()
        .find(|n| **n != hacker)
        .unwrap()
        .to_string();

    handle
        .submit_action(&hacker, ActionKind::Target, &victim)
        .await
        .unwrap();

    let batch = handle.advance().await.unwrap();
    assert!(batch.iter().any(|(scope, p)| {
        *scope == Scope::session(code("g1"))
            && matches!(p, Outbound::Eliminated { name, .. } if *name == victim)
    }));

    let batch = handle.advance().await.unwrap();
    assert!(batch.iter().any(|(_, p)| matches!(
        p,
        Outbound::GameEnded {
            winner: Faction::Hackers
        }
    )));
    assert_eq!(
        handle.status().await.unwrap(),
        Phase::Ended {
            winner: Faction::Hackers
        }
    );

    // Housekeeping sweeps the finished game out.
    let purged = registry.purge_ended().await;
    assert_eq!(purged, vec![code("g1")]);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_night_chat_stays_in_role_group() {
    // Night chat over the actor: a user's message lands in the
    // user role group, anonymized, never the public session scope.
    let mut registry = SessionRegistry::new();
    let handle = registry.create(code("g1"), config()).unwrap();
    for (name, alias) in [("a", "ay"), ("b", "bee"), ("c", "see")] {
        handle.join(name, alias).await.unwrap();
    }
    handle.start().await.unwrap();

    let user = player_with_role(&handle, &["a", "b", "c"], Role::User)
        .await
        .expect("a three-player game has at least one user");

    let batch = handle.chat(&user, "trust no one").await.unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].0, Scope::role(code("g1"), Role::User));
    assert!(
        matches!(&batch[0].1, Outbound::Chat { sender, .. } if sender == "Anonymous")
    );
}

#[tokio::test]
async fn test_join_after_start_is_rejected_over_the_handle() {
    let mut registry = SessionRegistry::new();
    let handle = registry.create(code("g1"), config()).unwrap();
    handle.join("a", "a").await.unwrap();
    handle.join("b", "b").await.unwrap();
    handle.start().await.unwrap();

    let err = handle.join("late", "late").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_disconnect_marks_offline_but_game_continues() {
    let mut registry = SessionRegistry::new();
    let handle = registry.create(code("g1"), config()).unwrap();
    for name in ["a", "b", "c"] {
        handle.join(name, name).await.unwrap();
    }
    handle.start().await.unwrap();

    handle.disconnect("c").await.unwrap();
    let view = handle.snapshot("a").await.unwrap();
    let gone = view.players.iter().find(|p| p.name == "c").unwrap();
    assert_eq!(gone.status, darkgrid_protocol::PlayerStatus::Offline);

    // The session still accepts operations.
    assert_eq!(
        handle.status().await.unwrap(),
        Phase::Active {
            round: 1,
            step: Step::NightAction
        }
    );
}
