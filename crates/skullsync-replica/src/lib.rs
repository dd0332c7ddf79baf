//! Client-side replica of Skullsync game state.
//!
//! A [`ClientReplica`] mirrors everything a player may see of the match.
//! It is advisory only, never authoritative: it is rebuilt wholesale from
//! a [`ModelSnapshot`](skullsync_protocol::ModelSnapshot) at every turn
//! start and patched by incremental [`Update`](skullsync_protocol::Update)s
//! in between.
//!
//! ```rust
//! use skullsync_protocol::{ModelSnapshot, Update};
//! use skullsync_replica::{Applied, ClientReplica};
//!
//! let mut replica = ClientReplica::from_snapshot(ModelSnapshot::default());
//! assert_eq!(replica.apply_incremental(&Update::Render), Applied::Redraw);
//! ```

mod apply;
mod player;
mod replica;
mod square;

pub use apply::Applied;
pub use player::{PlayerReplica, PowerUpReplica};
pub use replica::ClientReplica;
pub use square::{SquareReplica, WeaponReplica};
