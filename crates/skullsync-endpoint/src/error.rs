//! Error types for the endpoint layer.

use skullsync_protocol::ProtocolError;

/// Errors surfaced to whoever drives an endpoint.
///
/// Stray, duplicated, and late input is never an error; it is dropped
/// inside the polling loop.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The answer to a blocking prompt was not a valid option index.
    #[error("invalid selection: {0:?}")]
    InvalidSelection(String),

    /// A blocking prompt was attempted while an offered choice is still
    /// waiting for its answer.
    #[error("an interaction is already outstanding")]
    Busy,

    /// The connection was lost or closed. Terminal.
    #[error("endpoint is suspended")]
    Suspended,

    /// No answer arrived within the configured answer timeout.
    #[error("timed out waiting for an answer")]
    AnswerTimeout,

    /// A frame could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl EndpointError {
    /// Returns `true` if the endpoint can't be used any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Suspended)
    }
}
