//! # Skullsync
//!
//! Client/server state synchronization for turn-based board games.
//!
//! The game engine stays authoritative. Skullsync carries its observable
//! state changes to every player's reduced replica, and carries player
//! decisions back:
//!
//! ```text
//! engine → encoder → Update → endpoint → line → ReplicaClient → ClientReplica
//!   ↑                                                               │
//!   └──────────────── Decision ← endpoint ← answer line ────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skullsync::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn demo() -> Result<(), SkullsyncError> {
//! let (decisions_tx, mut decisions) = mpsc::unbounded_channel();
//! let (arrivals_tx, mut arrivals) = mpsc::channel(8);
//!
//! let server = SyncServer::builder().bind("127.0.0.1:9000").build(decisions_tx).await?;
//! tokio::spawn(server.run(arrivals_tx));
//!
//! let mut player = arrivals.recv().await.expect("server stopped");
//! player.handle.offer_choices("Move where?", &["north".into(), "south".into()]).await?;
//! let decision = decisions.recv().await.expect("server stopped");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod server;

pub use client::{ClientEvent, ReplicaClient};
pub use error::SkullsyncError;
pub use server::{PlayerLink, SyncServer, SyncServerBuilder};

pub use skullsync_encoder as encoder;
pub use skullsync_endpoint as endpoint;
pub use skullsync_protocol as protocol;
pub use skullsync_replica as replica;
pub use skullsync_transport as transport;

pub mod prelude {
    pub use crate::{ClientEvent, PlayerLink, ReplicaClient, SkullsyncError, SyncServer};
    pub use skullsync_encoder::{BoardView, PlayerView, SquareView, build_snapshot, model_update};
    pub use skullsync_endpoint::{Decision, Endpoint, EndpointConfig, EndpointHandle, Notifier};
    pub use skullsync_protocol::{Frame, PlayerId, SquareId, Update};
    pub use skullsync_replica::{Applied, ClientReplica};
}
