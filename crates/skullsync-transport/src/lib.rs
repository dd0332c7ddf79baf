//! Transport abstraction layer for Skullsync.
//!
//! Every frame on the wire is one line of text. This crate provides the
//! [`LineConnection`] trait for a single peer and the [`Transport`] trait
//! for a listener, plus three realizations:
//!
//! - [`TcpTransport`] / [`TcpConnection`]: newline-delimited text over TCP
//! - [`memory_pair`]: two connected in-memory endpoints for tests
//! - [`WebSocketTransport`] / [`WebSocketConnection`]: one text message
//!   per line (feature `websocket`)
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
mod stream;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use stream::{
    memory_pair, MemoryConnection, StreamConnection, TcpConnection,
    TcpTransport,
};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique connection IDs across all transports.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next process-wide unique id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: LineConnection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Gracefully shuts down the transport, stopping new connections.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// A single ordered, half-duplex stream of text lines.
///
/// Lines never contain the `\n` terminator: `send_line` appends it and
/// `recv_line` strips it. The returned futures are `Send` so a connection
/// can be driven from a spawned worker task without knowing its concrete
/// type.
///
/// Implementations must make `recv_line` cancellation safe: a read that is
/// abandoned by a timeout must not lose a partially received line.
pub trait LineConnection: Send + Sync + 'static {
    /// Sends one line to the remote peer.
    fn send_line(
        &self,
        line: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next line from the remote peer.
    ///
    /// Returns `Ok(None)` when the peer closed the stream.
    fn recv_line(
        &self,
    ) -> impl Future<Output = Result<Option<String>, TransportError>> + Send;

    /// Closes the connection. Closing twice is not an error.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_next_is_unique() {
        let a = ConnectionId::next();
        let b = ConnectionId::next();
        assert_ne!(a, b);
        assert!(b.into_inner() > a.into_inner());
    }

    #[test]
    fn test_transport_error_accept_is_not_terminal() {
        let accept = TransportError::AcceptFailed(std::io::Error::other("x"));
        assert!(!accept.is_terminal());
        assert!(TransportError::ConnectionClosed("eof".into()).is_terminal());
    }
}
