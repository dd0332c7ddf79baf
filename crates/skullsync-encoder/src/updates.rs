//! One builder per incremental update kind.
//!
//! Every function here is total: given valid domain objects it returns an
//! [`Update`] and has no other effect. Callers wrap the result in
//! [`Frame::Update`](skullsync_protocol::Frame::Update) (or hand it to an
//! endpoint's `announce`, which does that for them).

use skullsync_protocol::{
    AmmoChange, AmmoPack, DeckRegen, Death, InGameChange, Move, PlayerId,
    PlayerListChange, PowerUpChange, Reload, SkullRemoved, SquareRef,
    SquareWeaponChange, StatusChange, Update, WeaponChange,
};

use crate::domain::{PlayerView, PowerUpView, SquareView, WeaponView};

/// `weapon` became loaded or unloaded.
pub fn reload(weapon: &impl WeaponView, loaded: bool) -> Update {
    Update::Reload(Reload {
        weapon: weapon.name().to_owned(),
        loaded,
    })
}

/// The power-up deck was rebuilt with `cards` drawable cards.
pub fn power_up_deck_regen(cards: usize) -> Update {
    Update::PowerUpDeckRegen(DeckRegen {
        card_number: saturating_u32(cards),
    })
}

/// `skulls` skulls were taken off the track by `killer`.
pub fn skull_removed(skulls: u32, killer: &impl PlayerView, overkill: bool) -> Update {
    Update::SkullRemoved(SkullRemoved {
        skull_number: skulls,
        killer: killer.id(),
        overkill,
    })
}

/// `player` drew `power_up`.
pub fn draw_power_up(player: &impl PlayerView, power_up: &impl PowerUpView) -> Update {
    Update::DrawPowerUp(power_up_change(player, power_up))
}

/// `player` discarded (or used) `power_up`.
pub fn discard_power_up(player: &impl PlayerView, power_up: &impl PowerUpView) -> Update {
    Update::DiscardPowerUp(power_up_change(player, power_up))
}

/// `player` bought `weapon` from the spawn square they stand on.
pub fn pickup_weapon(player: &impl PlayerView, weapon: &impl WeaponView) -> Update {
    Update::PickupWeapon(weapon_change(player, weapon))
}

/// `player` dropped `weapon` onto the spawn square they stand on.
pub fn discard_weapon(player: &impl PlayerView, weapon: &impl WeaponView) -> Update {
    Update::DiscardWeapon(weapon_change(player, weapon))
}

/// `player` paid `ammo`.
pub fn use_ammo(player: &impl PlayerView, ammo: AmmoPack) -> Update {
    Update::UseAmmo(AmmoChange::new(player.id(), ammo))
}

/// `player` collected `ammo`.
pub fn add_ammo(player: &impl PlayerView, ammo: AmmoPack) -> Update {
    Update::AddAmmo(AmmoChange::new(player.id(), ammo))
}

/// `player` now stands on `square`.
pub fn move_to(player: &impl PlayerView, square: &impl SquareView) -> Update {
    Update::Move(Move {
        player: player.id(),
        square: square.id(),
    })
}

/// `player`'s current status tier and board side.
pub fn status(player: &impl PlayerView) -> Update {
    Update::Status(StatusChange {
        player: player.id(),
        status: player.status(),
        flipped: player.is_flipped(),
    })
}

/// `player` died; their next death awards `points`.
pub fn add_death(player: &impl PlayerView, points: u32) -> Update {
    Update::AddDeath(Death {
        player: player.id(),
        points,
    })
}

/// `shooters` is now the complete damage list of `player`.
pub fn damage(player: &impl PlayerView, shooters: &[PlayerId]) -> Update {
    Update::Damage(player_list(player, shooters))
}

/// `markers` is now the complete mark list of `player`.
pub fn mark(player: &impl PlayerView, markers: &[PlayerId]) -> Update {
    Update::Mark(player_list(player, markers))
}

/// Marks on `player` were converted or cleared; `remaining` is what's left.
pub fn remove_marks(player: &impl PlayerView, remaining: &[PlayerId]) -> Update {
    Update::RemoveMarks(player_list(player, remaining))
}

/// `weapon` was put on sale on `square`.
pub fn add_weapon(square: &impl SquareView, weapon: &impl WeaponView) -> Update {
    Update::AddWeapon(square_weapon(square, weapon))
}

/// `weapon` is no longer on sale on `square`.
pub fn remove_weapon(square: &impl SquareView, weapon: &impl WeaponView) -> Update {
    Update::RemoveWeapon(square_weapon(square, weapon))
}

/// `player` left (`false`) or rejoined (`true`) the match.
pub fn set_in_game(player: &impl PlayerView, in_game: bool) -> Update {
    Update::SetInGame(InGameChange {
        player: player.id(),
        in_game,
    })
}

/// The ammo tile on `square` was picked up.
pub fn remove_ammo_tile(square: &impl SquareView) -> Update {
    Update::RemoveAmmoTile(SquareRef { square: square.id() })
}

/// Asks the remote side to redraw from its current replica.
pub fn render() -> Update {
    Update::Render
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn power_up_change(player: &impl PlayerView, power_up: &impl PowerUpView) -> PowerUpChange {
    PowerUpChange {
        player: player.id(),
        power_up_name: power_up.name().to_owned(),
        power_up_color: power_up.color(),
    }
}

fn weapon_change(player: &impl PlayerView, weapon: &impl WeaponView) -> WeaponChange {
    WeaponChange {
        player: player.id(),
        weapon: weapon.name().to_owned(),
    }
}

fn player_list(player: &impl PlayerView, ids: &[PlayerId]) -> PlayerListChange {
    PlayerListChange {
        player: player.id(),
        player_list: ids.to_vec(),
    }
}

fn square_weapon(square: &impl SquareView, weapon: &impl WeaponView) -> SquareWeaponChange {
    SquareWeaponChange {
        square: square.id(),
        weapon: weapon.name().to_owned(),
    }
}

pub(crate) fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
