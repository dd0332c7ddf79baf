//! Integration tests for the sync server and replica client over TCP.

use std::time::Duration;

use skullsync::encoder::state::{BoardState, KillTrack, PlayerState, SquareState, WeaponCard};
use skullsync::encoder::updates;
use skullsync::prelude::*;
use skullsync::protocol::{PlayerColor, SkullRemoved};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn board() -> BoardState {
    BoardState {
        map_id: 1,
        squares: vec![
            SquareState::spawn(SquareId(2), vec![WeaponCard::new("ZX2", true)]),
            SquareState::ammo(SquareId(7), None),
        ],
        players: vec![
            PlayerState::new(PlayerId(1), PlayerColor::Green, "ann").at(SquareId(2)),
            PlayerState::new(PlayerId(3), PlayerColor::Grey, "cid").at(SquareId(2)),
        ],
        current_player: PlayerId(1),
        kill_track: KillTrack::new(5),
        weapon_cards_left: 18,
        power_up_cards_left: 20,
    }
}

struct Harness {
    decisions: mpsc::UnboundedReceiver<Decision>,
    link: PlayerLink,
    client: ReplicaClient,
}

/// Starts a server on a random port and connects one client to it.
async fn start() -> Harness {
    let (decisions_tx, decisions) = mpsc::unbounded_channel();
    let (arrivals_tx, mut arrivals) = mpsc::channel(4);

    let server = SyncServer::builder()
        .bind("127.0.0.1:0")
        .build(decisions_tx)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run(arrivals_tx));

    let client = ReplicaClient::connect(addr).await.unwrap();
    let link = tokio::time::timeout(Duration::from_secs(5), arrivals.recv())
        .await
        .expect("no arrival")
        .expect("server stopped");

    Harness {
        decisions,
        link,
        client,
    }
}

async fn next_event(client: &mut ReplicaClient) -> ClientEvent {
    tokio::time::timeout(Duration::from_secs(5), client.next_event())
        .await
        .expect("no event")
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_snapshot_then_incremental_updates_reach_replica() {
    let mut h = start().await;
    let board = board();

    h.link.handle.announce(model_update(&board, &board.players[0])).await.unwrap();
    assert_eq!(
        next_event(&mut h.client).await,
        ClientEvent::Updated { kind: "model", applied: Applied::Replaced }
    );
    assert_eq!(h.client.replica().players.len(), 2);
    assert_eq!(h.client.replica().player_id, PlayerId(1));

    let cid = &board.players[1];
    h.link
        .handle
        .announce(updates::move_to(cid, &board.squares[1]))
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut h.client).await,
        ClientEvent::Updated { kind: "move", applied: Applied::Patched }
    );

    let replica = h.client.replica();
    assert_eq!(replica.find_player(PlayerId(3)).position, Some(SquareId(7)));
    assert_eq!(replica.find_player(PlayerId(1)).position, Some(SquareId(2)));
}

#[tokio::test]
async fn test_offer_answer_arrives_as_decision() {
    let mut h = start().await;

    h.link
        .handle
        .offer_choices("Move where?", &["north".to_string(), "south".to_string()])
        .await
        .unwrap();
    match next_event(&mut h.client).await {
        ClientEvent::Choose { text, options } => {
            assert_eq!(text, "Move where?");
            assert_eq!(options, vec!["north", "south"]);
        }
        other => panic!("expected a choice, got {other:?}"),
    }
    h.client.choose(1).await.unwrap();

    let decision = tokio::time::timeout(Duration::from_secs(5), h.decisions.recv())
        .await
        .expect("no decision")
        .unwrap();
    assert_eq!(decision.connection, h.link.id);
    assert_eq!(decision.selection().unwrap(), 1);
}

#[tokio::test]
async fn test_prompt_text_over_tcp() {
    let Harness { link, mut client, .. } = start().await;
    let mut handle = link.handle.clone();

    let asking = tokio::spawn(async move { handle.prompt_text("Your name?", 8).await });

    assert_eq!(
        next_event(&mut client).await,
        ClientEvent::Input { text: "Your name?".into(), length: 8 }
    );
    client.answer("annabelle").await.unwrap();

    assert_eq!(asking.await.unwrap().unwrap(), "annabell");
}

#[tokio::test]
async fn test_notifier_updates_are_delivered() {
    let mut h = start().await;
    let board = board();
    h.link.handle.announce(model_update(&board, &board.players[0])).await.unwrap();
    next_event(&mut h.client).await;

    h.link
        .notifier
        .notify(Update::SkullRemoved(SkullRemoved {
            skull_number: 2,
            killer: PlayerId(1),
            overkill: true,
        }))
        .unwrap();

    assert_eq!(
        next_event(&mut h.client).await,
        ClientEvent::Updated { kind: "skullRemoved", applied: Applied::Patched }
    );
    assert_eq!(h.client.replica().skulls_left, 3);
    assert_eq!(h.client.replica().kill_track, vec![PlayerId(1)]);
}

#[tokio::test]
async fn test_render_and_message_events() {
    let mut h = start().await;

    h.link.handle.announce(Update::Render).await.unwrap();
    h.link.handle.display("ann killed cid").await.unwrap();

    assert_eq!(next_event(&mut h.client).await, ClientEvent::Render);
    assert_eq!(
        next_event(&mut h.client).await,
        ClientEvent::Message { text: "ann killed cid".into() }
    );
}

#[tokio::test]
async fn test_shutdown_reaches_client() {
    let mut h = start().await;

    h.link.handle.shutdown().await;

    assert_eq!(next_event(&mut h.client).await, ClientEvent::Shutdown);
    assert_eq!(next_event(&mut h.client).await, ClientEvent::Closed);
    assert!(h.link.handle.is_suspended());
}

#[tokio::test]
async fn test_client_disconnect_suspends_endpoint() {
    let Harness { link, client, .. } = start().await;

    drop(client);

    tokio::time::timeout(Duration::from_secs(5), link.handle.suspended())
        .await
        .expect("endpoint never suspended");
    assert!(link.notifier.notify(Update::Render).is_err());
}
