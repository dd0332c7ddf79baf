//! Frames: every message that travels on the wire.
//!
//! A frame is one flat JSON object on one line. The `head` field picks
//! the frame class; update frames carry a second tag, `type`, naming the
//! update kind, and the remaining fields are that kind's payload:
//!
//! ```text
//! {"head":"UPD","type":"move","player":3,"square":7}
//! {"head":"OPT","text":"Pick a weapon","options":["ZX2","THOR"]}
//! {"head":"KILL"}
//! ```
//!
//! Both tags are serde *internal* tags, so the nested [`Update`] enum
//! flattens into the same object as its `head`.

use serde::{Deserialize, Serialize};

use crate::{AmmoColor, AmmoPack, ModelSnapshot, PlayerId, PlayerStatus, SquareId};

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One self-contained wire message.
///
/// Replies from a player are *not* frames: they are a single raw line
/// (an option index or free text) interpreted against whatever the
/// endpoint last asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "head")]
pub enum Frame {
    /// State changed; apply to the replica.
    #[serde(rename = "UPD")]
    Update(Update),

    /// Choose one of `options`; reply with its index.
    #[serde(rename = "OPT")]
    Options { text: String, options: Vec<String> },

    /// Informational text, no reply expected.
    #[serde(rename = "MSG")]
    Message { text: String },

    /// Type free text of at most `length` characters.
    #[serde(rename = "REQ")]
    Request { text: String, length: usize },

    /// The session is ending.
    #[serde(rename = "KILL")]
    Shutdown,
}

impl Frame {
    /// Builds an options-request frame from anything displayable.
    pub fn options<T: ToString>(text: impl Into<String>, options: &[T]) -> Self {
        Self::Options {
            text: text.into(),
            options: options.iter().map(ToString::to_string).collect(),
        }
    }

    /// Returns the `head` tag, for logging.
    pub fn head(&self) -> &'static str {
        match self {
            Self::Update(_) => "UPD",
            Self::Options { .. } => "OPT",
            Self::Message { .. } => "MSG",
            Self::Request { .. } => "REQ",
            Self::Shutdown => "KILL",
        }
    }
}

impl From<Update> for Frame {
    fn from(update: Update) -> Self {
        Self::Update(update)
    }
}

// ---------------------------------------------------------------------------
// Update payloads
// ---------------------------------------------------------------------------

/// A held weapon became loaded or unloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reload {
    pub weapon: String,
    pub loaded: bool,
}

/// The power-up deck was reshuffled from the discard pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRegen {
    pub card_number: u32,
}

/// Skulls were taken off the kill-shot track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkullRemoved {
    pub skull_number: u32,
    pub killer: PlayerId,
    pub overkill: bool,
}

/// A player drew or discarded a power-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpChange {
    pub player: PlayerId,
    pub power_up_name: String,
    pub power_up_color: AmmoColor,
}

/// A player picked up or dropped a weapon on their square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponChange {
    pub player: PlayerId,
    pub weapon: String,
}

/// A player spent or gained ammo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmoChange {
    pub player: PlayerId,
    pub red_ammo: i32,
    pub blue_ammo: i32,
    pub yellow_ammo: i32,
}

impl AmmoChange {
    pub fn new(player: PlayerId, ammo: AmmoPack) -> Self {
        Self {
            player,
            red_ammo: ammo.red,
            blue_ammo: ammo.blue,
            yellow_ammo: ammo.yellow,
        }
    }

    pub fn ammo(&self) -> AmmoPack {
        AmmoPack::new(self.red_ammo, self.blue_ammo, self.yellow_ammo)
    }
}

/// A player moved to a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: PlayerId,
    pub square: SquareId,
}

/// A player's status tier or board side changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub player: PlayerId,
    pub status: PlayerStatus,
    #[serde(rename = "boolean")]
    pub flipped: bool,
}

/// A player died; `points` is what their next death will award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub player: PlayerId,
    pub points: u32,
}

/// The full, ordered list of players who damaged or marked `player`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListChange {
    pub player: PlayerId,
    pub player_list: Vec<PlayerId>,
}

/// A weapon appeared on or left a spawn square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareWeaponChange {
    pub square: SquareId,
    pub weapon: String,
}

/// A player left or rejoined the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InGameChange {
    pub player: PlayerId,
    #[serde(rename = "boolean")]
    pub in_game: bool,
}

/// Names a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareRef {
    pub square: SquareId,
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Every kind of replicated state change, keyed on the wire by `type`.
///
/// `rename_all = "camelCase"` turns `PowerUpDeckRegen` into
/// `"powerUpDeckRegen"`, `RemoveAmmoTile` into `"removeAmmoTile"`, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Update {
    Reload(Reload),
    PowerUpDeckRegen(DeckRegen),
    SkullRemoved(SkullRemoved),
    DrawPowerUp(PowerUpChange),
    DiscardPowerUp(PowerUpChange),
    PickupWeapon(WeaponChange),
    DiscardWeapon(WeaponChange),
    UseAmmo(AmmoChange),
    AddAmmo(AmmoChange),
    Move(Move),
    Status(StatusChange),
    AddDeath(Death),
    Damage(PlayerListChange),
    Mark(PlayerListChange),
    RemoveMarks(PlayerListChange),
    AddWeapon(SquareWeaponChange),
    RemoveWeapon(SquareWeaponChange),
    SetInGame(InGameChange),
    RemoveAmmoTile(SquareRef),
    /// Full resynchronization: replace the whole replica.
    Model { model: Box<ModelSnapshot> },
    /// No state change; redraw from the current replica.
    Render,
}

impl Update {
    /// Returns the wire `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reload(_) => "reload",
            Self::PowerUpDeckRegen(_) => "powerUpDeckRegen",
            Self::SkullRemoved(_) => "skullRemoved",
            Self::DrawPowerUp(_) => "drawPowerUp",
            Self::DiscardPowerUp(_) => "discardPowerUp",
            Self::PickupWeapon(_) => "pickupWeapon",
            Self::DiscardWeapon(_) => "discardWeapon",
            Self::UseAmmo(_) => "useAmmo",
            Self::AddAmmo(_) => "addAmmo",
            Self::Move(_) => "move",
            Self::Status(_) => "status",
            Self::AddDeath(_) => "addDeath",
            Self::Damage(_) => "damage",
            Self::Mark(_) => "mark",
            Self::RemoveMarks(_) => "removeMarks",
            Self::AddWeapon(_) => "addWeapon",
            Self::RemoveWeapon(_) => "removeWeapon",
            Self::SetInGame(_) => "setInGame",
            Self::RemoveAmmoTile(_) => "removeAmmoTile",
            Self::Model { .. } => "model",
            Self::Render => "render",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
