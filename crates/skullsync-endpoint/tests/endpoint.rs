//! Endpoint behavior over an in-memory line pipe.

use std::time::Duration;

use skullsync_endpoint::{
    Decision, Endpoint, EndpointConfig, EndpointError, EndpointState, Polled, TransportEndpoint,
    spawn_endpoint,
};
use skullsync_protocol::{Codec, DeckRegen, Frame, JsonCodec, Update};
use skullsync_transport::{LineConnection, MemoryConnection, memory_pair};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn setup() -> (
    TransportEndpoint<MemoryConnection>,
    MemoryConnection,
    mpsc::UnboundedReceiver<Decision>,
) {
    let (server, peer) = memory_pair();
    let (decisions_tx, decisions_rx) = mpsc::unbounded_channel();
    (TransportEndpoint::new(server, decisions_tx), peer, decisions_rx)
}

fn options(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

async fn next_frame(peer: &MemoryConnection) -> Frame {
    let line = peer.recv_line().await.unwrap().expect("peer closed");
    JsonCodec.decode_line(&line).unwrap()
}

/// Answers the next prompt the peer receives with `answer`.
fn answer_next(peer: MemoryConnection, answer: &'static str) -> tokio::task::JoinHandle<(MemoryConnection, Frame)> {
    tokio::spawn(async move {
        let prompt = next_frame(&peer).await;
        peer.send_line(answer).await.unwrap();
        (peer, prompt)
    })
}

// =========================================================================
// Sending
// =========================================================================

#[tokio::test]
async fn test_announce_sends_update_frame() {
    let (mut endpoint, peer, _decisions) = setup();

    endpoint.announce(Update::Render).await.unwrap();

    assert_eq!(next_frame(&peer).await, Frame::Update(Update::Render));
    assert_eq!(endpoint.state(), EndpointState::Active);
}

#[tokio::test]
async fn test_display_does_not_mark_busy() {
    let (mut endpoint, peer, _decisions) = setup();

    endpoint.display("your turn").await.unwrap();

    assert_eq!(
        next_frame(&peer).await,
        Frame::Message { text: "your turn".into() }
    );
    assert!(!endpoint.flags().is_busy());
}

#[tokio::test]
async fn test_offer_choices_while_busy_sends_nothing() {
    let (mut endpoint, peer, _decisions) = setup();

    endpoint.offer_choices("move?", &options(&["north", "south"])).await.unwrap();
    endpoint.offer_choices("shoot?", &options(&["yes", "no"])).await.unwrap();
    endpoint.display("marker").await.unwrap();

    assert_eq!(next_frame(&peer).await, Frame::options("move?", &["north", "south"]));
    // The second offer never went out.
    assert_eq!(next_frame(&peer).await, Frame::Message { text: "marker".into() });
    assert_eq!(endpoint.state(), EndpointState::Busy);
}

// =========================================================================
// Polling
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_poll_idle_without_input() {
    let (mut endpoint, _peer, _decisions) = setup();
    assert_eq!(endpoint.poll().await, Polled::Idle);
}

#[tokio::test]
async fn test_poll_delivers_answer_as_decision() {
    let (mut endpoint, peer, mut decisions) = setup();
    endpoint.offer_choices("move?", &options(&["north", "south"])).await.unwrap();
    next_frame(&peer).await;

    peer.send_line("1").await.unwrap();

    assert_eq!(endpoint.poll().await, Polled::Delivered);
    let decision = decisions.try_recv().unwrap();
    assert_eq!(decision.connection, endpoint.id());
    assert_eq!(decision.selection().unwrap(), 1);
    assert_eq!(endpoint.state(), EndpointState::Active);
}

#[tokio::test]
async fn test_offer_after_answer_consumed_goes_out() {
    let (mut endpoint, peer, _decisions) = setup();
    endpoint.offer_choices("first", &options(&["a"])).await.unwrap();
    next_frame(&peer).await;
    peer.send_line("0").await.unwrap();
    endpoint.poll().await;

    endpoint.offer_choices("second", &options(&["b"])).await.unwrap();

    assert_eq!(next_frame(&peer).await, Frame::options("second", &["b"]));
}

#[tokio::test]
async fn test_poll_drops_unrequested_input() {
    let (mut endpoint, peer, mut decisions) = setup();

    peer.send_line("3").await.unwrap();

    assert_eq!(endpoint.poll().await, Polled::Stray);
    assert!(decisions.try_recv().is_err());
    assert!(!endpoint.is_suspended());
}

#[tokio::test(start_paused = true)]
async fn test_poll_drops_answer_after_deadline() {
    let (mut endpoint, peer, mut decisions) = setup();
    endpoint
        .offer_choices_with_deadline("quick!", &options(&["a", "b"]), Duration::from_secs(1))
        .await
        .unwrap();
    next_frame(&peer).await;

    tokio::time::sleep(Duration::from_secs(2)).await;
    peer.send_line("0").await.unwrap();

    assert_eq!(endpoint.poll().await, Polled::Late);
    assert!(decisions.try_recv().is_err());
    assert!(endpoint.flags().deadline().is_none());
    assert_eq!(endpoint.state(), EndpointState::Active);
}

#[tokio::test(start_paused = true)]
async fn test_offer_after_unanswered_deadline_goes_out() {
    let (mut endpoint, peer, _decisions) = setup();
    endpoint
        .offer_choices_with_deadline("quick!", &options(&["a", "b"]), Duration::from_secs(1))
        .await
        .unwrap();
    next_frame(&peer).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(endpoint.state(), EndpointState::Busy);

    endpoint.offer_choices("move?", &options(&["north"])).await.unwrap();

    assert_eq!(next_frame(&peer).await, Frame::options("move?", &["north"]));
    assert_eq!(endpoint.state(), EndpointState::Busy);
    assert!(endpoint.flags().deadline().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_ask_blocking_after_unanswered_deadline_is_not_busy() {
    let (mut endpoint, peer, _decisions) = setup();
    endpoint
        .offer_choices_with_deadline("quick!", &options(&["a", "b"]), Duration::from_secs(1))
        .await
        .unwrap();
    next_frame(&peer).await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let remote = answer_next(peer, "0");
    let choice = endpoint.ask_blocking("weapon?", &options(&["zx2"])).await.unwrap();

    assert_eq!(choice, 0);
    let (_peer, prompt) = remote.await.unwrap();
    assert_eq!(prompt, Frame::options("weapon?", &["zx2"]));
    assert_eq!(endpoint.state(), EndpointState::Active);
}

#[tokio::test(start_paused = true)]
async fn test_poll_delivers_answer_before_deadline() {
    let (mut endpoint, peer, mut decisions) = setup();
    endpoint
        .offer_choices_with_deadline("quick!", &options(&["a", "b"]), Duration::from_secs(1))
        .await
        .unwrap();
    next_frame(&peer).await;

    peer.send_line("0").await.unwrap();

    assert_eq!(endpoint.poll().await, Polled::Delivered);
    assert_eq!(decisions.try_recv().unwrap().answer, "0");
}

#[tokio::test]
async fn test_poll_peer_close_suspends() {
    let (mut endpoint, peer, _decisions) = setup();

    drop(peer);

    assert_eq!(endpoint.poll().await, Polled::Suspended);
    assert!(endpoint.is_suspended());
    assert!(matches!(
        endpoint.announce(Update::Render).await,
        Err(EndpointError::Suspended)
    ));
}

// =========================================================================
// Blocking prompts
// =========================================================================

#[tokio::test]
async fn test_ask_blocking_returns_selection() {
    let (mut endpoint, peer, mut decisions) = setup();
    let remote = answer_next(peer, "2");

    let choice = endpoint
        .ask_blocking("weapon?", &options(&["zx2", "whisper", "railgun"]))
        .await
        .unwrap();

    assert_eq!(choice, 2);
    let (_peer, prompt) = remote.await.unwrap();
    assert_eq!(prompt, Frame::options("weapon?", &["zx2", "whisper", "railgun"]));
    // Blocking answers are returned, not delivered as decisions.
    assert!(decisions.try_recv().is_err());
    assert_eq!(endpoint.state(), EndpointState::Active);
}

#[tokio::test]
async fn test_ask_blocking_invalid_selection_keeps_connection() {
    let (mut endpoint, peer, _decisions) = setup();
    let remote = answer_next(peer, "railgun");

    let result = endpoint.ask_blocking("weapon?", &options(&["zx2"])).await;

    assert!(matches!(result, Err(EndpointError::InvalidSelection(a)) if a == "railgun"));
    assert!(!endpoint.is_suspended());
    assert_eq!(endpoint.state(), EndpointState::Active);

    // The caller can re-prompt.
    let (peer, _) = remote.await.unwrap();
    let remote = answer_next(peer, "0");
    assert_eq!(endpoint.ask_blocking("weapon?", &options(&["zx2"])).await.unwrap(), 0);
    remote.await.unwrap();
}

#[tokio::test]
async fn test_ask_blocking_while_offer_outstanding_is_busy() {
    let (mut endpoint, _peer, _decisions) = setup();
    endpoint.offer_choices("move?", &options(&["north"])).await.unwrap();

    let result = endpoint.ask_blocking("shoot?", &options(&["yes"])).await;

    assert!(matches!(result, Err(EndpointError::Busy)));
}

#[tokio::test]
async fn test_ask_blocking_peer_close_is_suspended() {
    let (mut endpoint, peer, _decisions) = setup();
    let remote = tokio::spawn(async move {
        next_frame(&peer).await;
        drop(peer);
    });

    let result = endpoint.ask_blocking("weapon?", &options(&["zx2"])).await;

    assert!(matches!(result, Err(EndpointError::Suspended)));
    assert!(endpoint.is_suspended());
    remote.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_ask_blocking_answer_timeout() {
    let (server, _peer) = memory_pair();
    let (decisions_tx, _decisions_rx) = mpsc::unbounded_channel();
    let config = EndpointConfig {
        answer_timeout: Some(Duration::from_secs(1)),
        ..Default::default()
    };
    let mut endpoint = TransportEndpoint::with_codec(server, JsonCodec, config, decisions_tx);

    let result = endpoint.ask_blocking("weapon?", &options(&["zx2"])).await;

    assert!(matches!(result, Err(EndpointError::AnswerTimeout)));
    assert_eq!(endpoint.state(), EndpointState::Active);
}

#[tokio::test]
async fn test_prompt_text_truncates_answer() {
    let (mut endpoint, peer, _decisions) = setup();
    let remote = answer_next(peer, "bartholomew");

    let name = endpoint.prompt_text("username?", 5).await.unwrap();

    assert_eq!(name, "barth");
    let (_peer, prompt) = remote.await.unwrap();
    assert_eq!(
        prompt,
        Frame::Request { text: "username?".into(), length: 5 }
    );
}

// =========================================================================
// Notifications and shutdown
// =========================================================================

#[tokio::test]
async fn test_notifications_flush_before_direct_send() {
    let (mut endpoint, peer, _decisions) = setup();
    let notifier = endpoint.notifier();

    notifier.notify(Update::PowerUpDeckRegen(DeckRegen { card_number: 9 })).unwrap();
    notifier.notify(Update::Render).unwrap();
    endpoint.display("after").await.unwrap();

    assert_eq!(
        next_frame(&peer).await,
        Frame::Update(Update::PowerUpDeckRegen(DeckRegen { card_number: 9 }))
    );
    assert_eq!(next_frame(&peer).await, Frame::Update(Update::Render));
    assert_eq!(next_frame(&peer).await, Frame::Message { text: "after".into() });
}

#[tokio::test(start_paused = true)]
async fn test_poll_flushes_notifications() {
    let (mut endpoint, peer, _decisions) = setup();
    endpoint.notifier().notify(Update::Render).unwrap();

    assert_eq!(endpoint.poll().await, Polled::Idle);

    assert_eq!(next_frame(&peer).await, Frame::Update(Update::Render));
}

#[tokio::test]
async fn test_shutdown_sends_kill_and_closes() {
    let (mut endpoint, peer, _decisions) = setup();
    let notifier = endpoint.notifier();

    endpoint.shutdown().await;

    assert_eq!(next_frame(&peer).await, Frame::Shutdown);
    assert_eq!(peer.recv_line().await.unwrap(), None);
    assert!(endpoint.is_suspended());
    assert!(notifier.notify(Update::Render).is_err());
}

// =========================================================================
// Worker
// =========================================================================

#[tokio::test]
async fn test_handle_ask_blocking_round_trip() {
    let (endpoint, peer, _decisions) = setup();
    let mut handle = spawn_endpoint(endpoint);
    let remote = answer_next(peer, "1");

    let choice = handle.ask_blocking("target?", &options(&["ann", "bob"])).await.unwrap();

    assert_eq!(choice, 1);
    remote.await.unwrap();
}

#[tokio::test]
async fn test_worker_delivers_offer_answers() {
    let (endpoint, peer, mut decisions) = setup();
    let mut handle = spawn_endpoint(endpoint);

    handle.offer_choices("move?", &options(&["north", "south"])).await.unwrap();
    next_frame(&peer).await;
    peer.send_line("0").await.unwrap();

    let decision = decisions.recv().await.unwrap();
    assert_eq!(decision.connection, handle.id());
    assert_eq!(decision.selection().unwrap(), 0);
}

#[tokio::test]
async fn test_handle_reports_suspension_on_peer_close() {
    let (endpoint, peer, _decisions) = setup();
    let mut handle = spawn_endpoint(endpoint);

    drop(peer);
    handle.suspended().await;

    assert!(handle.is_suspended());
    assert!(matches!(
        handle.announce(Update::Render).await,
        Err(EndpointError::Suspended)
    ));
}

#[tokio::test]
async fn test_dropping_all_handles_shuts_endpoint_down() {
    let (endpoint, peer, _decisions) = setup();
    let mut handle = spawn_endpoint(endpoint);
    handle.announce(Update::Render).await.unwrap();

    drop(handle);

    assert_eq!(next_frame(&peer).await, Frame::Update(Update::Render));
    assert_eq!(next_frame(&peer).await, Frame::Shutdown);
    assert_eq!(peer.recv_line().await.unwrap(), None);
}
