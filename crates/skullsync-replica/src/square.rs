//! Square and weapon replicas.

use skullsync_protocol::{AmmoPack, SquareId, SquareRecord, WeaponRecord};

/// A weapon as the client last saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponReplica {
    pub name: String,
    pub loaded: bool,
}

impl From<WeaponRecord> for WeaponReplica {
    fn from(record: WeaponRecord) -> Self {
        Self {
            name: record.name,
            loaded: record.loaded,
        }
    }
}

/// A board square as the client last saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareReplica {
    Spawn {
        id: SquareId,
        weapons: Vec<WeaponReplica>,
    },
    Ammo {
        id: SquareId,
        ammo: AmmoPack,
        power_up: bool,
    },
}

/// Returned by lookups on a board with no squares.
pub(crate) static PLACEHOLDER_SQUARE: SquareReplica = SquareReplica::Ammo {
    id: SquareId(0),
    ammo: AmmoPack {
        red: 0,
        blue: 0,
        yellow: 0,
    },
    power_up: false,
};

impl SquareReplica {
    pub fn id(&self) -> SquareId {
        match self {
            Self::Spawn { id, .. } | Self::Ammo { id, .. } => *id,
        }
    }

    /// Weapons for sale; empty for ammo squares.
    pub fn weapons(&self) -> &[WeaponReplica] {
        match self {
            Self::Spawn { weapons, .. } => weapons,
            Self::Ammo { .. } => &[],
        }
    }

    /// Takes the first weapon called `name` off a spawn square.
    pub(crate) fn take_weapon(&mut self, name: &str) -> Option<WeaponReplica> {
        let Self::Spawn { weapons, .. } = self else {
            return None;
        };
        let index = weapons.iter().position(|w| w.name == name)?;
        Some(weapons.remove(index))
    }

    /// Puts a weapon on sale. Returns it back if this is not a spawn square.
    pub(crate) fn put_weapon(&mut self, weapon: WeaponReplica) -> Result<(), WeaponReplica> {
        match self {
            Self::Spawn { weapons, .. } => {
                weapons.push(weapon);
                Ok(())
            }
            Self::Ammo { .. } => Err(weapon),
        }
    }

    /// Empties an ammo square's tile. Returns `false` for spawn squares.
    pub(crate) fn clear_tile(&mut self) -> bool {
        match self {
            Self::Ammo { ammo, power_up, .. } => {
                *ammo = AmmoPack::default();
                *power_up = false;
                true
            }
            Self::Spawn { .. } => false,
        }
    }
}

impl From<SquareRecord> for SquareReplica {
    fn from(record: SquareRecord) -> Self {
        match record {
            SquareRecord::Spawn { id, weapons } => Self::Spawn {
                id,
                weapons: weapons.into_iter().map(WeaponReplica::from).collect(),
            },
            SquareRecord::Ammo { id, ammo, power_up } => Self::Ammo { id, ammo, power_up },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> SquareReplica {
        SquareReplica::Spawn {
            id: SquareId(1),
            weapons: vec![
                WeaponReplica { name: "ZX2".into(), loaded: true },
                WeaponReplica { name: "WHISPER".into(), loaded: true },
            ],
        }
    }

    #[test]
    fn test_take_weapon_by_name() {
        let mut square = spawn();
        let taken = square.take_weapon("WHISPER").unwrap();
        assert_eq!(taken.name, "WHISPER");
        assert_eq!(square.weapons().len(), 1);
    }

    #[test]
    fn test_take_weapon_missing_name_leaves_square_unchanged() {
        let mut square = spawn();
        assert!(square.take_weapon("RAILGUN").is_none());
        assert_eq!(square, spawn());
    }

    #[test]
    fn test_put_weapon_on_ammo_square_is_refused() {
        let mut square = PLACEHOLDER_SQUARE.clone();
        let weapon = WeaponReplica { name: "ZX2".into(), loaded: false };
        assert_eq!(square.put_weapon(weapon.clone()), Err(weapon));
    }

    #[test]
    fn test_clear_tile_zeroes_ammo_and_power_up() {
        let mut square = SquareReplica::Ammo {
            id: SquareId(4),
            ammo: AmmoPack::new(0, 2, 1),
            power_up: true,
        };
        assert!(square.clear_tile());
        assert_eq!(
            square,
            SquareReplica::Ammo {
                id: SquareId(4),
                ammo: AmmoPack::default(),
                power_up: false,
            }
        );
        assert!(!spawn().clear_tile());
    }
}
