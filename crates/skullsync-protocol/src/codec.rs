//! Codec trait and implementations for turning values into wire lines.
//!
//! The endpoint and client don't care HOW a frame becomes text; they
//! need something that implements [`Codec`]. The only hard rule is the
//! framing rule: an encoded value is exactly one line, with no `\n`
//! anywhere inside it.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that encodes values to single lines and decodes them back.
///
/// `Send + Sync + 'static` so one codec can live inside a long-running
/// connection worker task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one line, without the terminator.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode_line<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one line back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for a blank line and
    /// [`ProtocolError::Decode`] if the text doesn't match `T`.
    fn decode_line<T: DeserializeOwned>(&self, line: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses compact JSON (via `serde_json`).
///
/// Compact output never contains a raw newline: newlines inside strings
/// are escaped as `\n`, so every frame stays on one line.
///
/// ## Example
///
/// ```rust
/// use skullsync_protocol::{Codec, Frame, JsonCodec};
///
/// let codec = JsonCodec;
/// let line = codec.encode_line(&Frame::Shutdown).unwrap();
/// assert_eq!(line, r#"{"head":"KILL"}"#);
///
/// let decoded: Frame = codec.decode_line(&line).unwrap();
/// assert_eq!(decoded, Frame::Shutdown);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode_line<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode_line<T: DeserializeOwned>(&self, line: &str) -> Result<T, ProtocolError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty line".into()));
        }
        serde_json::from_str(line).map_err(ProtocolError::Decode)
    }
}
