//! Snapshot and update flow from an encoder-built frame to a replica,
//! through the JSON codec.

use skullsync_encoder::state::{
    BoardState, KillTrack, PlayerState, PowerUpCard, SquareKind, SquareState, WeaponCard,
};
use skullsync_encoder::{AmmoTile, PlayerView, model_update, updates};
use skullsync_protocol::{
    AmmoColor, AmmoPack, Codec, Frame, JsonCodec, PlayerColor, PlayerId, SquareId, Update,
};
use skullsync_replica::{
    Applied, ClientReplica, PlayerReplica, PowerUpReplica, SquareReplica, WeaponReplica,
};

fn server_state() -> BoardState {
    let mut ann = PlayerState::new(PlayerId(1), PlayerColor::Green, "ann").at(SquareId(2));
    ann.power_ups = vec![PowerUpCard::new("NEWTON", AmmoColor::Red)];
    ann.weapons = vec![WeaponCard::new("LOCK_RIFLE", false)];
    ann.damages = vec![PlayerId(3)];
    ann.points = 6;

    let mut bob = PlayerState::new(PlayerId(2), PlayerColor::Yellow, "bob").at(SquareId(7));
    bob.marks = vec![PlayerId(1), PlayerId(1)];
    bob.deaths = 1;
    bob.points_to_give = 6;

    let cid = PlayerState::new(PlayerId(3), PlayerColor::Purple, "cid").at(SquareId(2));

    BoardState {
        map_id: 3,
        squares: vec![
            SquareState::spawn(SquareId(2), vec![WeaponCard::new("ZX2", true)]),
            SquareState::ammo(
                SquareId(7),
                Some(AmmoTile {
                    ammo: AmmoPack::new(0, 2, 0),
                    power_up: true,
                }),
            ),
        ],
        players: vec![ann, bob, cid],
        current_player: PlayerId(3),
        kill_track: KillTrack {
            skulls_left: 5,
            killers: vec![PlayerId(2)],
        },
        weapon_cards_left: 12,
        power_up_cards_left: 15,
    }
}

/// The replica `viewer` should hold, built straight from server state.
fn reference_replica(board: &BoardState, viewer: &PlayerState) -> ClientReplica {
    let weapons = |cards: &[WeaponCard]| -> Vec<WeaponReplica> {
        cards
            .iter()
            .map(|w| WeaponReplica { name: w.name.clone(), loaded: w.loaded })
            .collect()
    };
    ClientReplica {
        squares: board
            .squares
            .iter()
            .map(|s| match &s.kind {
                SquareKind::Spawn(cards) => SquareReplica::Spawn { id: s.id, weapons: weapons(cards) },
                SquareKind::Ammo(tile) => SquareReplica::Ammo {
                    id: s.id,
                    ammo: tile.map(|t| t.ammo).unwrap_or_default(),
                    power_up: tile.is_some_and(|t| t.power_up),
                },
            })
            .collect(),
        players: board
            .players
            .iter()
            .map(|p| PlayerReplica {
                id: p.id,
                color: p.color,
                username: p.username.clone(),
                card_number: p.power_ups.len() as u32,
                damage: p.damages.clone(),
                marks: p.marks.clone(),
                weapons: weapons(&p.weapons),
                position: p.position,
                ammo: p.ammo,
                in_game: p.position.is_some(),
                flipped: p.flipped,
                points: p.points,
                deaths: p.deaths,
                next_death_awards: p.points_to_give,
                status: p.status,
            })
            .collect(),
        current_player_id: board.current_player,
        kill_track: board.kill_track.killers.clone(),
        skulls_left: board.kill_track.skulls_left,
        weapon_cards_left: board.weapon_cards_left as u32,
        power_up_cards_left: board.power_up_cards_left as u32,
        map_id: board.map_id,
        player_id: viewer.id(),
        points: viewer.points,
        power_up_hand: viewer
            .power_ups
            .iter()
            .map(|c| PowerUpReplica { name: c.name.clone(), color: c.color })
            .collect(),
    }
}

/// Sends `update` through the JSON wire form and back.
fn over_the_wire(update: Update) -> Update {
    let line = JsonCodec.encode_line(&Frame::from(update)).unwrap();
    match JsonCodec.decode_line::<Frame>(&line).unwrap() {
        Frame::Update(update) => update,
        other => panic!("expected an update frame, got {other:?}"),
    }
}

#[test]
fn test_replace_full_matches_reference_replica() {
    let board = server_state();
    for viewer in &board.players {
        let update = over_the_wire(model_update(&board, viewer));

        let mut replica = ClientReplica::default();
        assert_eq!(replica.apply_incremental(&update), Applied::Replaced);

        assert_eq!(replica, reference_replica(&board, viewer));
    }
}

#[test]
fn test_incremental_move_after_snapshot() {
    let mut board = server_state();
    let viewer = board.players[0].clone();
    let mut replica = ClientReplica::default();
    replica.apply_incremental(&over_the_wire(model_update(&board, &viewer)));

    // Server side: cid walks from square 2 to square 7.
    let update = {
        let cid = board.player(PlayerId(3)).unwrap();
        updates::move_to(cid, board.square(SquareId(7)).unwrap())
    };
    if let Some(cid) = board.player_mut(PlayerId(3)) {
        cid.position = Some(SquareId(7));
    }

    assert_eq!(replica.apply_incremental(&over_the_wire(update)), Applied::Patched);
    assert_eq!(replica, reference_replica(&board, &viewer));
    assert_eq!(replica.position_of(replica.find_player(PlayerId(3))).map(SquareReplica::id), Some(SquareId(7)));
}

#[test]
fn test_kill_track_players_resolve_after_replacement() {
    let board = server_state();
    let replica = ClientReplica::from_snapshot(skullsync_encoder::build_snapshot(&board, &board.players[1]));

    let killers = replica.kill_track_players();
    assert_eq!(killers.len(), 1);
    assert_eq!(killers[0].username, "bob");
    assert_eq!(replica.current_player().username, "cid");
    assert_eq!(replica.viewer().username, "bob");
}
