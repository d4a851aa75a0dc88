//! Scripted single-process game: six players join, roles are dealt, and
//! the rounds are driven to a win while every routed payload is printed.
//!
//! Run with `RUST_LOG=darkgrid_session=debug cargo run -p sim` to see the
//! engine's own logs interleaved with the traffic.

use darkgrid::prelude::*;

const PLAYERS: [(&str, &str); 6] = [
    ("alice", "ghost"),
    ("bob", "mole"),
    ("carol", "fox"),
    ("dave", "wasp"),
    ("erin", "lynx"),
    ("frank", "crow"),
];

fn print_batch(label: &str, batch: &Batch) {
    for (scope, payload) in batch {
        let json = serde_json::to_string(payload)
            .unwrap_or_else(|e| format!("<unserializable: {e}>"));
        println!("[{label}] {scope} <- {json}");
    }
}

/// Finds one player holding `role`, via each player's own redacted view.
async fn player_with_role(
    engine: &Engine,
    code: &GameCode,
    role: Role,
) -> Option<(String, String)> {
    for (name, alias) in PLAYERS {
        let batch = engine.handle(code, name, Event::Snapshot).await;
        let Some((_, Outbound::Snapshot { view })) = batch.first() else {
            continue;
        };
        let holds = view
            .players
            .iter()
            .any(|p| p.name == name && p.role == Some(role));
        if holds {
            return Some((name.to_string(), alias.to_string()));
        }
    }
    None
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let engine = Engine::new(GameConfig {
        // Six players: one hacker, one whitehat, one analyst.
        hackers_per: 6,
        whitehats_per: 6,
        analysts_per: 6,
        ..GameConfig::default()
    });
    let code = GameCode::from("sim");

    for (name, alias) in PLAYERS {
        let batch = engine
            .handle(&code, name, Event::Join { alias: alias.into() })
            .await;
        print_batch("join", &batch);
    }

    let batch = engine.handle(&code, "alice", Event::Start).await;
    print_batch("start", &batch);

    // The deal is random, so look up who got what before scripting moves.
    let (hacker, _) = player_with_role(&engine, &code, Role::Hacker)
        .await
        .expect("one hacker is always dealt");
    let (whitehat, _) = player_with_role(&engine, &code, Role::Whitehat)
        .await
        .expect("config deals one whitehat");
    let (analyst, _) = player_with_role(&engine, &code, Role::Analyst)
        .await
        .expect("config deals one analyst");
    let (_, hacker_alias) = PLAYERS
        .iter()
        .find(|(n, _)| *n == hacker)
        .map(|(n, a)| (n.to_string(), a.to_string()))
        .unwrap();
    let victim = PLAYERS
        .iter()
        .map(|(n, _)| n.to_string())
        .find(|n| *n != hacker && *n != whitehat && *n != analyst)
        .expect("six players leave at least one ordinary user");
    tracing::info!(%hacker, %whitehat, %analyst, %victim, "roles discovered");

    // Round 1 night: the hacker whispers to their (single-member) role
    // room, the analyst scans, the whitehat shields the analyst, and the
    // hacker strikes an ordinary user.
    let batch = engine
        .handle(&code, &hacker, Event::Chat {
            text: "going after the loudest one".into(),
        })
        .await;
    print_batch("night-chat", &batch);

    let batch = engine
        .handle(&code, &analyst, Event::Chat {
            text: format!("/scan {hacker_alias}"),
        })
        .await;
    print_batch("scan", &batch);

    let batch = engine
        .handle(&code, &whitehat, Event::Action {
            kind: ActionKind::Protect,
            target: analyst.clone(),
        })
        .await;
    print_batch("protect", &batch);

    let batch = engine
        .handle(&code, &hacker, Event::Action {
            kind: ActionKind::Target,
            target: victim.clone(),
        })
        .await;
    print_batch("target", &batch);

    // Timer fires: resolve the night, then open the day.
    let batch = engine.advance(&code).await.expect("resolution");
    print_batch("resolve", &batch);
    let batch = engine.advance(&code).await.expect("day");
    print_batch("day", &batch);

    let batch = engine
        .handle(&code, &analyst, Event::Chat {
            text: format!("{hacker_alias} came back suspicious"),
        })
        .await;
    print_batch("day-chat", &batch);

    // Keep cycling rounds, hacker eliminating one player a night, until
    // one faction wins.
    'rounds: for _ in 0..PLAYERS.len() {
        let batch = engine.advance(&code).await.expect("next night");
        print_batch("night", &batch);

        let snapshot = engine.handle(&code, &hacker, Event::Snapshot).await;
        let Some((_, Outbound::Snapshot { view })) = snapshot.first() else {
            break;
        };
        let Some(next) = view
            .players
            .iter()
            .find(|p| {
                p.status == PlayerStatus::Online
                    && p.name != hacker
                    && p.name != whitehat
            })
            .map(|p| p.name.clone())
        else {
            break;
        };

        let batch = engine
            .handle(&code, &hacker, Event::Action {
                kind: ActionKind::Target,
                target: next,
            })
            .await;
        print_batch("target", &batch);

        let batch = engine.advance(&code).await.expect("resolution");
        print_batch("resolve", &batch);

        // Leaving resolution either opens the day or ends the game.
        let batch = engine.advance(&code).await.expect("day or game over");
        print_batch("day", &batch);
        if batch
            .iter()
            .any(|(_, p)| matches!(p, Outbound::GameEnded { .. }))
        {
            break 'rounds;
        }
    }

    let purged = engine.purge_ended().await;
    tracing::info!(?purged, "swept ended sessions");
}
