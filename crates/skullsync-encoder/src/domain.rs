//! Read-only views of authoritative game state.
//!
//! These traits are the seam between the game engine and the encoder.
//! The engine implements them for its own board, player, and card types;
//! the encoder only ever reads through them, so encoding can never
//! mutate the game.
//!
//! Associated types (rather than trait objects) keep weapon and power-up
//! slices borrowable straight out of the engine's own collections.

use skullsync_protocol::{AmmoColor, AmmoPack, PlayerColor, PlayerId, PlayerStatus, SquareId};

/// A domain query that cannot currently answer.
///
/// The kill-shot track, for instance, refuses to report skulls once all
/// of them are gone. Snapshot building recovers from this locally.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0} is not available")]
pub struct NotAvailable(pub &'static str);

/// A weapon card.
pub trait WeaponView {
    /// The card's name as shown to players, e.g. `"LOCK_RIFLE"`.
    fn name(&self) -> &str;
    fn is_loaded(&self) -> bool;
}

/// A power-up card.
pub trait PowerUpView {
    fn name(&self) -> &str;
    fn color(&self) -> AmmoColor;
}

/// The ammo tile lying on an ammo square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmmoTile {
    pub ammo: AmmoPack,
    /// Whether picking the tile up also draws a power-up.
    pub power_up: bool,
}

/// What a square holds, by square kind.
#[derive(Debug)]
pub enum SquareContents<'a, W> {
    /// A spawn point and the weapons currently for sale on it.
    Spawn(&'a [W]),
    /// An ammo square; `None` once its tile was picked up.
    Ammo(Option<AmmoTile>),
}

/// A board square.
pub trait SquareView {
    type Weapon: WeaponView;

    fn id(&self) -> SquareId;
    fn contents(&self) -> SquareContents<'_, Self::Weapon>;
}

/// A player, as far as other participants may observe.
pub trait PlayerView {
    type Weapon: WeaponView;
    type PowerUp: PowerUpView;

    fn id(&self) -> PlayerId;
    fn color(&self) -> PlayerColor;
    fn username(&self) -> &str;
    fn power_ups(&self) -> &[Self::PowerUp];
    /// One entry per damage token, oldest first.
    fn damages(&self) -> &[PlayerId];
    /// One entry per mark, oldest first.
    fn marks(&self) -> &[PlayerId];
    fn weapons(&self) -> &[Self::Weapon];
    /// The square the player stands on, `None` before their first spawn.
    fn position(&self) -> Option<SquareId>;
    fn ammo(&self) -> AmmoPack;
    fn is_flipped(&self) -> bool;
    fn points(&self) -> u32;
    fn deaths(&self) -> u32;
    /// Points the player will award on their next death.
    fn points_to_give(&self) -> u32;
    fn status(&self) -> PlayerStatus;
}

/// The whole board: map, players, decks, and kill-shot track.
pub trait BoardView {
    type Square: SquareView;
    type Player: PlayerView;

    fn map_id(&self) -> u32;
    /// Squares in a stable order; snapshots preserve it.
    fn squares(&self) -> &[Self::Square];
    /// Players in turn order; snapshots preserve it.
    fn players(&self) -> &[Self::Player];
    fn current_player(&self) -> PlayerId;
    /// Killers in the order their skulls were taken.
    fn killers(&self) -> Result<Vec<PlayerId>, NotAvailable>;
    fn skulls_left(&self) -> Result<u32, NotAvailable>;
    fn weapon_cards_left(&self) -> usize;
    fn power_up_cards_left(&self) -> usize;
}
