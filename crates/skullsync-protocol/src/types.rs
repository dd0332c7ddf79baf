//! Identity and value types shared by frames, snapshots, and replicas.

use serde::{Deserialize, Serialize};
use std::{fmt, ops};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The game-assigned identifier of a player.
///
/// `#[serde(transparent)]` keeps it a plain number on the wire, so
/// `PlayerId(3)` is just `3` inside a `playerList` array.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The board-assigned identifier of a square.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SquareId(pub u32);

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Colors and status
// ---------------------------------------------------------------------------

/// A player's token color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Green,
    Yellow,
    Grey,
    Purple,
    #[default]
    Blue,
}

/// The color of an ammo cube or power-up card.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AmmoColor {
    Red,
    Blue,
    Yellow,
}

impl fmt::Display for AmmoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

/// The action tier a player is in, driven by how much damage they took
/// and whether final frenzy has started.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    #[default]
    Basic,
    #[serde(rename = "ADRENALINE_1")]
    Adrenaline1,
    #[serde(rename = "ADRENALINE_2")]
    Adrenaline2,
    #[serde(rename = "FRENZY_1")]
    Frenzy1,
    #[serde(rename = "FRENZY_2")]
    Frenzy2,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "BASIC",
            Self::Adrenaline1 => "ADRENALINE_1",
            Self::Adrenaline2 => "ADRENALINE_2",
            Self::Frenzy1 => "FRENZY_1",
            Self::Frenzy2 => "FRENZY_2",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// AmmoPack
// ---------------------------------------------------------------------------

/// A red/blue/yellow ammo count.
///
/// Counts are signed because the replica applies them as deltas; a
/// replica that missed an `addAmmo` may briefly dip below zero until the
/// next full snapshot corrects it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct AmmoPack {
    pub red: i32,
    pub blue: i32,
    pub yellow: i32,
}

impl AmmoPack {
    pub fn new(red: i32, blue: i32, yellow: i32) -> Self {
        Self { red, blue, yellow }
    }

    /// Returns `true` if every count is zero.
    pub fn is_empty(&self) -> bool {
        self.red == 0 && self.blue == 0 && self.yellow == 0
    }
}

impl ops::AddAssign for AmmoPack {
    fn add_assign(&mut self, rhs: Self) {
        self.red = self.red.saturating_add(rhs.red);
        self.blue = self.blue.saturating_add(rhs.blue);
        self.yellow = self.yellow.saturating_add(rhs.yellow);
    }
}

impl ops::SubAssign for AmmoPack {
    fn sub_assign(&mut self, rhs: Self) {
        self.red = self.red.saturating_sub(rhs.red);
        self.blue = self.blue.saturating_sub(rhs.blue);
        self.yellow = self.yellow.saturating_sub(rhs.yellow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(SquareId(2).to_string(), "S-2");
    }

    #[test]
    fn test_colors_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlayerColor::Purple).unwrap(),
            "\"purple\""
        );
        assert_eq!(
            serde_json::to_string(&AmmoColor::Yellow).unwrap(),
            "\"yellow\""
        );
    }

    #[test]
    fn test_status_uses_numbered_tags() {
        assert_eq!(
            serde_json::to_string(&PlayerStatus::Adrenaline2).unwrap(),
            "\"ADRENALINE_2\""
        );
        let status: PlayerStatus = serde_json::from_str("\"FRENZY_1\"").unwrap();
        assert_eq!(status, PlayerStatus::Frenzy1);
        assert_eq!(PlayerStatus::Basic.to_string(), "BASIC");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<PlayerStatus, _> = serde_json::from_str("\"ASLEEP\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_ammo_pack_is_empty() {
        assert!(AmmoPack::default().is_empty());
        assert!(!AmmoPack::new(0, 1, 0).is_empty());
    }

    #[test]
    fn test_ammo_pack_deltas_apply_per_color() {
        let mut ammo = AmmoPack::new(1, 1, 1);
        ammo += AmmoPack::new(2, 0, 1);
        assert_eq!(ammo, AmmoPack::new(3, 1, 2));
        ammo -= AmmoPack::new(1, 2, 0);
        assert_eq!(ammo, AmmoPack::new(2, -1, 2));
    }
}
