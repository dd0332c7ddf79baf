//! `SyncServer` builder and accept loop.
//!
//! The server ties the layers together: every accepted line connection
//! becomes a [`TransportEndpoint`] running in its own worker task, and
//! the domain engine receives a [`PlayerLink`] to drive it.

use skullsync_endpoint::{
    Decision, Endpoint, EndpointConfig, EndpointHandle, Notifier, TransportEndpoint,
    spawn_endpoint,
};
use skullsync_protocol::JsonCodec;
use skullsync_transport::{ConnectionId, TcpTransport, Transport};
use tokio::sync::mpsc;

use crate::SkullsyncError;

/// Everything the domain engine needs to talk to one connected player.
pub struct PlayerLink {
    pub id: ConnectionId,
    /// Prompts and direct updates.
    pub handle: EndpointHandle,
    /// Updates queued from outside the player's own interaction flow.
    pub notifier: Notifier,
}

/// Builder for configuring and starting a sync server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), skullsync::SkullsyncError> {
/// use skullsync::prelude::*;
/// use tokio::sync::mpsc;
///
/// let (decisions_tx, _decisions) = mpsc::unbounded_channel();
/// let (arrivals_tx, _arrivals) = mpsc::channel(8);
///
/// let server = SyncServer::builder()
///     .bind("0.0.0.0:9000")
///     .build(decisions_tx)
///     .await?;
/// server.run(arrivals_tx).await
/// # }
/// ```
pub struct SyncServerBuilder {
    bind_addr: String,
    endpoint_config: EndpointConfig,
}

impl SyncServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            endpoint_config: EndpointConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every endpoint is created with.
    pub fn endpoint_config(mut self, config: EndpointConfig) -> Self {
        self.endpoint_config = config;
        self
    }

    /// Binds a TCP listener. Every player's answers to asynchronous
    /// offers will arrive on `decisions`.
    pub async fn build(
        self,
        decisions: mpsc::UnboundedSender<Decision>,
    ) -> Result<SyncServer, SkullsyncError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;
        Ok(SyncServer::with_transport(
            transport,
            self.endpoint_config,
            decisions,
        ))
    }
}

impl Default for SyncServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound sync server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct SyncServer<T: Transport = TcpTransport> {
    transport: T,
    endpoint_config: EndpointConfig,
    decisions: mpsc::UnboundedSender<Decision>,
}

impl SyncServer {
    /// Creates a new builder.
    pub fn builder() -> SyncServerBuilder {
        SyncServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }
}

impl<T: Transport> SyncServer<T> {
    /// Serves an already bound transport, e.g. a
    /// `WebSocketTransport`.
    pub fn with_transport(
        transport: T,
        endpoint_config: EndpointConfig,
        decisions: mpsc::UnboundedSender<Decision>,
    ) -> Self {
        Self {
            transport,
            endpoint_config,
            decisions,
        }
    }

    /// Runs the accept loop.
    ///
    /// Each accepted connection gets an endpoint worker, and its
    /// [`PlayerLink`] is sent on `arrivals`. Accept failures are logged
    /// and skipped. Returns once `arrivals` is closed.
    pub async fn run(mut self, arrivals: mpsc::Sender<PlayerLink>) -> Result<(), SkullsyncError> {
        tracing::info!("sync server running");

        loop {
            let conn = tokio::select! {
                accepted = self.transport.accept() => accepted,
                () = arrivals.closed() => break,
            };
            match conn {
                Ok(conn) => {
                    let endpoint = TransportEndpoint::with_codec(
                        conn,
                        JsonCodec,
                        self.endpoint_config.clone(),
                        self.decisions.clone(),
                    );
                    let notifier = endpoint.notifier();
                    let handle = spawn_endpoint(endpoint);
                    let id = handle.id();
                    tracing::info!(conn_id = %id, "player connected");

                    let link = PlayerLink {
                        id,
                        handle,
                        notifier,
                    };
                    if arrivals.send(link).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }

        tracing::info!("no one is taking new players, server stopping");
        if let Err(e) = self.transport.shutdown().await {
            tracing::debug!(error = %e, "transport shutdown failed");
        }
        Ok(())
    }
}
