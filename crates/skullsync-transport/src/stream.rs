//! Newline-delimited text over any byte stream.
//!
//! [`StreamConnection`] wraps a reader/writer pair. The same type backs
//! TCP sockets ([`TcpConnection`]) and in-memory duplex pipes
//! ([`MemoryConnection`]), so protocol logic runs unchanged in tests.

use std::net::SocketAddr;

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
    DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

use crate::{ConnectionId, LineConnection, Transport, TransportError};

/// Buffer size of each direction of an in-memory pipe.
const MEMORY_PIPE_CAPACITY: usize = 64 * 1024;

/// A line connection over a split byte stream.
///
/// Reader and writer sit behind separate locks so a pending read never
/// holds up a send.
pub struct StreamConnection<R, W> {
    id: ConnectionId,
    reader: Mutex<Lines<BufReader<R>>>,
    writer: Mutex<W>,
}

/// A line connection over a TCP socket.
pub type TcpConnection = StreamConnection<OwnedReadHalf, OwnedWriteHalf>;

/// One end of an in-memory pipe created by [`memory_pair`].
pub type MemoryConnection =
    StreamConnection<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

impl<R, W> StreamConnection<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Wraps an already-split stream, allocating a fresh connection id.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            id: ConnectionId::next(),
            reader: Mutex::new(BufReader::new(reader).lines()),
            writer: Mutex::new(writer),
        }
    }
}

impl TcpConnection {
    /// Dials a remote line server.
    pub async fn connect(
        addr: impl ToSocketAddrs,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        Ok(Self::from_stream(stream))
    }

    /// Wraps an established TCP stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "could not disable Nagle");
        }
        let (reader, writer) = stream.into_split();
        Self::new(reader, writer)
    }
}

impl<R, W> LineConnection for StreamConnection<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send_line(&self, line: &str) -> Result<(), TransportError> {
        if line.contains('\n') {
            return Err(TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "line contains a newline",
            )));
        }

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)?;
        tracing::trace!(id = %self.id, len = line.len(), "line sent");
        Ok(())
    }

    async fn recv_line(&self) -> Result<Option<String>, TransportError> {
        // `Lines::next_line` keeps partial input in its own buffer, so
        // dropping this future on a timeout loses nothing.
        self.reader
            .lock()
            .await
            .next_line()
            .await
            .map_err(TransportError::ReceiveFailed)
    }

    async fn close(&self) -> Result<(), TransportError> {
        match self.writer.lock().await.shutdown().await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(TransportError::SendFailed(e)),
        }
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Creates two connected in-memory endpoints.
///
/// Whatever one side sends, the other receives. Closing one side makes
/// the other's `recv_line` return `Ok(None)` once buffered lines are read.
pub fn memory_pair() -> (MemoryConnection, MemoryConnection) {
    let (a, b) = tokio::io::duplex(MEMORY_PIPE_CAPACITY);
    let (a_read, a_write) = tokio::io::split(a);
    let (b_read, b_write) = tokio::io::split(b);
    (
        StreamConnection::new(a_read, a_write),
        StreamConnection::new(b_read, b_write),
    )
}

// ---------------------------------------------------------------------------
// TcpTransport
// ---------------------------------------------------------------------------

/// A TCP [`Transport`] that listens for incoming line connections.
pub struct TcpTransport {
    listener: TcpListener,
}

impl TcpTransport {
    /// Binds a new TCP transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP transport listening");
        Ok(Self { listener })
    }

    /// Returns the address the listener is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let conn = TcpConnection::from_stream(stream);
        tracing::debug!(id = %conn.id(), %addr, "accepted TCP connection");
        Ok(conn)
    }

    async fn shutdown(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
