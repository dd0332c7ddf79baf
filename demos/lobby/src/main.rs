use std::net::SocketAddr;

use skullsync::encoder::state::{BoardState, KillTrack, PlayerState, SquareState, WeaponCard};
use skullsync::encoder::{AmmoTile, updates};
use skullsync::prelude::*;
use skullsync::protocol::{AmmoPack, PlayerColor};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const SEATS: usize = 2;
const ROUNDS: usize = 3;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn table() -> BoardState {
    BoardState {
        map_id: 1,
        squares: vec![
            SquareState::spawn(
                SquareId(0),
                vec![WeaponCard::new("Lock Rifle", true), WeaponCard::new("Zx-2", true)],
            ),
            SquareState::ammo(
                SquareId(1),
                Some(AmmoTile {
                    ammo: AmmoPack::new(1, 1, 0),
                    power_up: true,
                }),
            ),
            SquareState::ammo(SquareId(2), None),
        ],
        players: vec![
            PlayerState::new(PlayerId(1), PlayerColor::Green, "ann").at(SquareId(0)),
            PlayerState::new(PlayerId(2), PlayerColor::Purple, "bo").at(SquareId(0)),
        ],
        current_player: PlayerId(1),
        kill_track: KillTrack::new(5),
        weapon_cards_left: 19,
        power_up_cards_left: 24,
    }
}

struct Seat {
    player: PlayerId,
    link: PlayerLink,
}

async fn run_table(
    mut board: BoardState,
    mut arrivals: mpsc::Receiver<PlayerLink>,
    mut decisions: mpsc::UnboundedReceiver<Decision>,
) -> Result<(), SkullsyncError> {
    let mut seats = Vec::with_capacity(SEATS);
    while seats.len() < SEATS {
        let Some(link) = arrivals.recv().await else {
            return Ok(());
        };
        let player = board.players[seats.len()].id;
        tracing::info!(conn_id = %link.id, %player, "seat taken");
        seats.push(Seat { player, link });
    }
    // The server stops accepting once no one listens for arrivals.
    drop(arrivals);

    for seat in &mut seats {
        let Some(viewer) = board.player(seat.player) else {
            continue;
        };
        seat.link.handle.announce(model_update(&board, viewer)).await?;
    }

    let options: Vec<String> = board.squares.iter().map(|s| s.id.to_string()).collect();
    for round in 0..ROUNDS {
        let turn = round % seats.len();
        let player = seats[turn].player;
        board.current_player = player;
        seats[turn]
            .link
            .handle
            .offer_choices(&format!("Round {}: move where?", round + 1), &options)
            .await?;

        let Some(decision) = decisions.recv().await else {
            break;
        };
        let target = match decision.selection() {
            Ok(index) if index < board.squares.len() => board.squares[index].id,
            Ok(index) => {
                tracing::warn!(index, "selection out of range, staying put");
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "unreadable selection, staying put");
                continue;
            }
        };

        if let Some(moving) = board.player_mut(player) {
            moving.position = Some(target);
        }
        let (Some(moving), Some(square)) = (board.player(player), board.square(target)) else {
            continue;
        };
        let update = updates::move_to(moving, square);
        for seat in &seats {
            if let Err(e) = seat.link.notifier.notify(update.clone()) {
                tracing::debug!(conn_id = %seat.link.id, error = %e, "notify dropped");
            }
        }
        let line = format!("{} moved to {target}", moving.username);
        for seat in &mut seats {
            seat.link.handle.display(&line).await?;
            seat.link.handle.announce(updates::render()).await?;
        }
    }

    for seat in &mut seats {
        seat.link.handle.shutdown().await;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

/// A player that always picks the last option.
async fn bot(name: &'static str, addr: SocketAddr) -> Result<(), SkullsyncError> {
    let mut client = ReplicaClient::connect(addr).await?;
    loop {
        match client.next_event().await? {
            ClientEvent::Choose { text, options } => {
                tracing::info!(bot = name, %text, "choosing");
                client.choose(options.len().saturating_sub(1)).await?;
            }
            ClientEvent::Input { length, .. } => {
                let answer: String = name.chars().take(length).collect();
                client.answer(&answer).await?;
            }
            ClientEvent::Message { text } => tracing::info!(bot = name, %text, "message"),
            ClientEvent::Render => {
                let replica = client.replica();
                let me = replica.viewer();
                tracing::info!(
                    bot = name,
                    position = ?me.position,
                    current = %replica.current_player().username,
                    "render"
                );
            }
            ClientEvent::Updated { kind, applied } => {
                tracing::debug!(bot = name, kind, ?applied, "update");
            }
            ClientEvent::Shutdown | ClientEvent::Closed => break,
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bind = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:9000".to_string());
    let (decisions_tx, decisions) = mpsc::unbounded_channel();
    let (arrivals_tx, arrivals) = mpsc::channel(SEATS);

    let server = SyncServer::builder().bind(&bind).build(decisions_tx).await?;
    let addr = server.local_addr()?;
    tracing::info!(%addr, "lobby open");
    let server = tokio::spawn(server.run(arrivals_tx));

    let bots = [
        tokio::spawn(bot("ann", addr)),
        tokio::spawn(bot("bo", addr)),
    ];

    run_table(table(), arrivals, decisions).await?;
    for bot in bots {
        bot.await??;
    }
    server.await??;
    Ok(())
}
