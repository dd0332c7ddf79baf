//! Wire protocol for Skullsync.
//!
//! This crate defines the "language" that the game server and each
//! player's client speak:
//!
//! - **Types** ([`PlayerId`], [`SquareId`], [`AmmoPack`], colors and
//!   statuses) shared by every layer.
//! - **Frames** ([`Frame`], [`Update`]): one self-contained line per
//!   message, tagged by `head` and, for updates, by `type`.
//! - **Snapshot** ([`ModelSnapshot`]): the full replicable state nested
//!   inside a `model` update.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how frames become lines.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (lines) → Protocol (Frame) → Endpoint / Replica
//! ```
//!
//! A frame never depends on an earlier frame to be *decoded*; it only
//! depends on the receiver's replica to be *interpreted*.

mod codec;
mod error;
mod frame;
mod snapshot;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use frame::{
    AmmoChange, DeckRegen, Death, Frame, InGameChange, Move,
    PlayerListChange, PowerUpChange, Reload, SkullRemoved, SquareRef,
    SquareWeaponChange, StatusChange, Update, WeaponChange,
};
pub use snapshot::{ModelSnapshot, PlayerRecord, PowerUpRecord, SquareRecord, WeaponRecord};
pub use types::{AmmoColor, AmmoPack, PlayerColor, PlayerId, PlayerStatus, SquareId};
