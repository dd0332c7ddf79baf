//! Full-state snapshot construction.

use skullsync_protocol::{
    AmmoPack, ModelSnapshot, PlayerId, PlayerRecord, PowerUpRecord, SquareId,
    SquareRecord, Update, WeaponRecord,
};

use crate::domain::{
    BoardView, PlayerView, PowerUpView, SquareContents, SquareView, WeaponView,
};
use crate::updates::saturating_u32;

/// Builds the snapshot `viewer` should see of `board`.
///
/// Squares and players keep the board's order. A player who is not on
/// the board (or whose square the board doesn't list) is still emitted,
/// with `position: None` and `in_game: false`.
///
/// Never fails: if the kill-shot track cannot report its killers or its
/// skull count, an empty track or a zero count is substituted and a
/// warning is logged.
pub fn build_snapshot<B: BoardView>(board: &B, viewer: &B::Player) -> ModelSnapshot {
    let squares: Vec<SquareRecord> =
        board.squares().iter().map(square_record).collect();

    let players: Vec<PlayerRecord> = board
        .players()
        .iter()
        .map(|p| player_record(p, &squares))
        .collect();

    let kill_shot_track = match board.killers() {
        Ok(killers) => resolve_killers(killers, &players),
        Err(e) => {
            tracing::warn!(error = %e, "kill-shot track unavailable, sending it empty");
            Vec::new()
        }
    };

    let skulls_left = board.skulls_left().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "skull count unavailable, sending zero");
        0
    });

    ModelSnapshot {
        squares,
        players,
        current_player_id: board.current_player(),
        kill_shot_track,
        skulls_left,
        weapon_cards_left: saturating_u32(board.weapon_cards_left()),
        power_up_cards_left: saturating_u32(board.power_up_cards_left()),
        map_id: board.map_id(),
        player_id: viewer.id(),
        points: viewer.points(),
        power_up_in_hand: viewer
            .power_ups()
            .iter()
            .map(|p| PowerUpRecord {
                name: p.name().to_owned(),
                color: p.color(),
            })
            .collect(),
    }
}

/// Wraps [`build_snapshot`] in a `model` update.
pub fn model_update<B: BoardView>(board: &B, viewer: &B::Player) -> Update {
    Update::Model {
        model: Box::new(build_snapshot(board, viewer)),
    }
}

fn weapon_record(weapon: &impl WeaponView) -> WeaponRecord {
    WeaponRecord {
        name: weapon.name().to_owned(),
        loaded: weapon.is_loaded(),
    }
}

fn square_record<S: SquareView>(square: &S) -> SquareRecord {
    let id = square.id();
    match square.contents() {
        SquareContents::Spawn(weapons) => SquareRecord::Spawn {
            id,
            weapons: weapons.iter().map(weapon_record).collect(),
        },
        SquareContents::Ammo(Some(tile)) => SquareRecord::Ammo {
            id,
            ammo: tile.ammo,
            power_up: tile.power_up,
        },
        SquareContents::Ammo(None) => SquareRecord::Ammo {
            id,
            ammo: AmmoPack::default(),
            power_up: false,
        },
    }
}

fn player_record<P: PlayerView>(player: &P, squares: &[SquareRecord]) -> PlayerRecord {
    let position = player.position().filter(|id| on_board(*id, squares));
    if position.is_none() {
        tracing::debug!(player = %player.id(), "player not on the board");
    }

    PlayerRecord {
        id: player.id(),
        color: player.color(),
        username: player.username().to_owned(),
        card_number: saturating_u32(player.power_ups().len()),
        damage: player.damages().to_vec(),
        marks: player.marks().to_vec(),
        weapons: player.weapons().iter().map(weapon_record).collect(),
        position,
        ammo: player.ammo(),
        in_game: position.is_some(),
        flipped: player.is_flipped(),
        points: player.points(),
        deaths: player.deaths(),
        next_death_awards: player.points_to_give(),
        status: player.status(),
    }
}

fn on_board(id: SquareId, squares: &[SquareRecord]) -> bool {
    squares.iter().any(|s| s.id() == id)
}

/// Maps killers through the just-built player list, dropping identities
/// the list doesn't know.
fn resolve_killers(killers: Vec<PlayerId>, players: &[PlayerRecord]) -> Vec<PlayerId> {
    killers
        .into_iter()
        .filter(|killer| {
            let known = players.iter().any(|p| p.id == *killer);
            if !known {
                tracing::debug!(%killer, "killer not among players, skipped");
            }
            known
        })
        .collect()
}
