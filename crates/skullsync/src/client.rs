//! The remote side of a connection: a replica kept in sync by frames.

use skullsync_protocol::{Codec, Frame, JsonCodec};
use skullsync_replica::{Applied, ClientReplica};
use skullsync_transport::{LineConnection, TcpConnection};
use tokio::net::ToSocketAddrs;

use crate::SkullsyncError;

/// Something the player-side view should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// An update was applied to the replica (or ignored, see `applied`).
    Updated {
        kind: &'static str,
        applied: Applied,
    },
    /// The server asked for a redraw from the current replica.
    Render,
    /// Pick one of `options`; answer with its index.
    Choose { text: String, options: Vec<String> },
    /// Informational text.
    Message { text: String },
    /// Type free text of at most `length` characters.
    Input { text: String, length: usize },
    /// The server ended the session.
    Shutdown,
    /// The connection closed without a shutdown frame.
    Closed,
}

/// Reads frames from one connection into a [`ClientReplica`].
pub struct ReplicaClient<C: LineConnection = TcpConnection, K: Codec = JsonCodec> {
    conn: C,
    codec: K,
    replica: ClientReplica,
}

impl ReplicaClient {
    /// Connects to a sync server over TCP.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, SkullsyncError> {
        let conn = TcpConnection::connect(addr).await?;
        Ok(Self::new(conn))
    }
}

impl<C: LineConnection> ReplicaClient<C> {
    pub fn new(conn: C) -> Self {
        Self::with_codec(conn, JsonCodec)
    }
}

impl<C: LineConnection, K: Codec> ReplicaClient<C, K> {
    pub fn with_codec(conn: C, codec: K) -> Self {
        Self {
            conn,
            codec,
            replica: ClientReplica::default(),
        }
    }

    pub fn replica(&self) -> &ClientReplica {
        &self.replica
    }

    /// Waits for the next frame, applying it to the replica if it is an
    /// update.
    ///
    /// Lines that don't decode as a frame are logged and skipped.
    pub async fn next_event(&mut self) -> Result<ClientEvent, SkullsyncError> {
        loop {
            let Some(line) = self.conn.recv_line().await? else {
                return Ok(ClientEvent::Closed);
            };
            let frame: Frame = match self.codec.decode_line(&line) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::debug!(error = %e, "undecodable frame skipped");
                    continue;
                }
            };
            tracing::trace!(head = frame.head(), "frame received");

            return Ok(match frame {
                Frame::Update(update) => match self.replica.apply_incremental(&update) {
                    Applied::Redraw => ClientEvent::Render,
                    applied => ClientEvent::Updated {
                        kind: update.kind(),
                        applied,
                    },
                },
                Frame::Options { text, options } => ClientEvent::Choose { text, options },
                Frame::Message { text } => ClientEvent::Message { text },
                Frame::Request { text, length } => ClientEvent::Input { text, length },
                Frame::Shutdown => ClientEvent::Shutdown,
            });
        }
    }

    /// Sends a raw reply line: an option index or free text.
    pub async fn answer(&self, text: &str) -> Result<(), SkullsyncError> {
        self.conn.send_line(text).await?;
        Ok(())
    }

    /// Sends the index of the chosen option.
    pub async fn choose(&self, index: usize) -> Result<(), SkullsyncError> {
        self.answer(&index.to_string()).await
    }

    pub async fn close(&self) -> Result<(), SkullsyncError> {
        self.conn.close().await?;
        Ok(())
    }
}
