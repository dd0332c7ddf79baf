//! The full-state snapshot document carried by a `model` update.
//!
//! This is a reduced copy of server truth: only what a player is allowed
//! to see. Square and player lists keep the server's order, and a
//! player's position is a square *id*, never an embedded copy of the
//! square, so a receiver can re-point it without duplicating data.

use serde::{Deserialize, Serialize};

use crate::{AmmoColor, AmmoPack, PlayerColor, PlayerId, PlayerStatus, SquareId};

/// A weapon as displayed on a square or in a player's hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRecord {
    pub name: String,
    pub loaded: bool,
}

/// A power-up card of the viewer's own hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpRecord {
    pub name: String,
    pub color: AmmoColor,
}

/// A board square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SquareRecord {
    /// A spawn point selling weapons.
    Spawn {
        id: SquareId,
        weapons: Vec<WeaponRecord>,
    },
    /// A square holding an ammo tile (or an empty slot for one).
    #[serde(rename_all = "camelCase")]
    Ammo {
        id: SquareId,
        ammo: AmmoPack,
        power_up: bool,
    },
}

impl SquareRecord {
    pub fn id(&self) -> SquareId {
        match self {
            Self::Spawn { id, .. } | Self::Ammo { id, .. } => *id,
        }
    }
}

/// A player as every participant sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub color: PlayerColor,
    pub username: String,
    /// How many power-ups are in this player's hand.
    pub card_number: u32,
    /// Who damaged this player, one entry per damage token, in order.
    pub damage: Vec<PlayerId>,
    /// Who marked this player, one entry per mark, in order.
    pub marks: Vec<PlayerId>,
    pub weapons: Vec<WeaponRecord>,
    /// `None` while the player has not spawned on the board.
    pub position: Option<SquareId>,
    pub ammo: AmmoPack,
    pub in_game: bool,
    pub flipped: bool,
    pub points: u32,
    pub deaths: u32,
    pub next_death_awards: u32,
    pub status: PlayerStatus,
}

/// Everything needed to rebuild a replica from scratch, from the point
/// of view of one player (`player_id`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
    pub squares: Vec<SquareRecord>,
    pub players: Vec<PlayerRecord>,
    pub current_player_id: PlayerId,
    /// Killers in the order their skulls were taken.
    pub kill_shot_track: Vec<PlayerId>,
    pub skulls_left: u32,
    pub weapon_cards_left: u32,
    pub power_up_cards_left: u32,
    pub map_id: u32,
    /// The viewer's own id and score.
    pub player_id: PlayerId,
    pub points: u32,
    /// The viewer's own power-ups; other hands are only counted.
    pub power_up_in_hand: Vec<PowerUpRecord>,
}
