//! Update encoder for Skullsync.
//!
//! The game engine decides *when* something changes; this crate decides
//! *how that change looks on the wire*. It is a family of pure functions:
//! each takes the minimal operands of one event and returns an [`Update`],
//! plus [`build_snapshot`] for full resynchronization.
//!
//! The encoder never owns game state. It reads it through the view traits
//! in [`domain`] ([`BoardView`], [`PlayerView`], [`SquareView`],
//! [`WeaponView`], [`PowerUpView`]), which the engine implements for its
//! own types. [`state`] provides plain owned implementations of those
//! traits for embedders and tests that have no engine of their own.
//!
//! [`Update`]: skullsync_protocol::Update

pub mod domain;
mod snapshot;
pub mod state;
pub mod updates;

pub use domain::{
    AmmoTile, BoardView, NotAvailable, PlayerView, PowerUpView, SquareContents,
    SquareView, WeaponView,
};
pub use snapshot::{build_snapshot, model_update};
