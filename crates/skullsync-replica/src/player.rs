//! Player and power-up replicas.

use std::sync::LazyLock;

use skullsync_protocol::{
    AmmoColor, AmmoPack, PlayerColor, PlayerId, PlayerRecord, PlayerStatus, PowerUpRecord,
    SquareId,
};

use crate::square::WeaponReplica;

/// A power-up card in the viewer's own hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUpReplica {
    pub name: String,
    pub color: AmmoColor,
}

impl From<PowerUpRecord> for PowerUpReplica {
    fn from(record: PowerUpRecord) -> Self {
        Self {
            name: record.name,
            color: record.color,
        }
    }
}

/// A player as the client last saw them.
///
/// `damage`, `marks`, and `position` hold ids only; resolve them through
/// the owning [`ClientReplica`](crate::ClientReplica).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerReplica {
    pub id: PlayerId,
    pub color: PlayerColor,
    pub username: String,
    /// Power-ups in this player's hand.
    pub card_number: u32,
    pub damage: Vec<PlayerId>,
    pub marks: Vec<PlayerId>,
    pub weapons: Vec<WeaponReplica>,
    pub position: Option<SquareId>,
    pub ammo: AmmoPack,
    pub in_game: bool,
    pub flipped: bool,
    pub points: u32,
    pub deaths: u32,
    pub next_death_awards: u32,
    pub status: PlayerStatus,
}

/// Returned by lookups on a replica with no players.
pub(crate) static PLACEHOLDER_PLAYER: LazyLock<PlayerReplica> = LazyLock::new(|| PlayerReplica {
    id: PlayerId(0),
    color: PlayerColor::Blue,
    username: "default".to_owned(),
    card_number: 0,
    damage: Vec::new(),
    marks: Vec::new(),
    weapons: Vec::new(),
    position: None,
    ammo: AmmoPack::default(),
    in_game: false,
    flipped: false,
    points: 0,
    deaths: 0,
    next_death_awards: 0,
    status: PlayerStatus::Basic,
});

impl PlayerReplica {
    pub fn weapon(&self, name: &str) -> Option<&WeaponReplica> {
        self.weapons.iter().find(|w| w.name == name)
    }

    pub(crate) fn weapon_mut(&mut self, name: &str) -> Option<&mut WeaponReplica> {
        self.weapons.iter_mut().find(|w| w.name == name)
    }

    pub(crate) fn take_weapon(&mut self, name: &str) -> Option<WeaponReplica> {
        let index = self.weapons.iter().position(|w| w.name == name)?;
        Some(self.weapons.remove(index))
    }
}

impl From<PlayerRecord> for PlayerReplica {
    fn from(record: PlayerRecord) -> Self {
        Self {
            id: record.id,
            color: record.color,
            username: record.username,
            card_number: record.card_number,
            damage: record.damage,
            marks: record.marks,
            weapons: record.weapons.into_iter().map(WeaponReplica::from).collect(),
            position: record.position,
            ammo: record.ammo,
            in_game: record.in_game,
            flipped: record.flipped,
            points: record.points,
            deaths: record.deaths,
            next_death_awards: record.next_death_awards,
            status: record.status,
        }
    }
}
