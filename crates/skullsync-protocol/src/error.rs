//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in turning frames into
//! lines or lines into frames, never in networking or game state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a frame into a line).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning a line into a frame).
    ///
    /// Common causes: malformed JSON, an unknown `head` or `type` tag,
    /// missing payload fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The line is invalid at the protocol level, e.g. it is empty.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
