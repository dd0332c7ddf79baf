//! Unified error type for Skullsync.

use skullsync_endpoint::EndpointError;
use skullsync_protocol::ProtocolError;
use skullsync_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert layer errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum SkullsyncError {
    /// A transport-level error (bind, connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An endpoint-level error (suspended, busy, bad selection).
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let err: SkullsyncError = err.into();
        assert!(matches!(err, SkullsyncError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let err: SkullsyncError = err.into();
        assert!(matches!(err, SkullsyncError::Protocol(_)));
    }

    #[test]
    fn test_from_endpoint_error() {
        let err: SkullsyncError = EndpointError::InvalidSelection("x".into()).into();
        assert!(matches!(err, SkullsyncError::Endpoint(_)));
        assert!(err.to_string().contains("invalid selection"));
    }
}
