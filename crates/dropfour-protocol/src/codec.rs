//! Codec trait and implementations for serializing messages.
//!
//! A codec turns protocol types into bytes and back. The rest of the
//! stack never calls `serde_json` directly — it goes through the
//! [`Codec`] trait, so the wire format is a swappable strategy rather
//! than a hard-coded choice.
//!
//! [`JsonCodec`] is the only implementation today. JSON keeps every
//! frame readable in a packet capture, which is worth far more during
//! development than the bytes a binary format would save.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes protocol values to bytes and decodes them back.
///
/// The `Send + Sync + 'static` bounds let a codec be cloned into the
/// spawned tasks that serve each connection — Tokio may move those
/// tasks between worker threads at any await point.
///
/// `encode` and `decode` are generic over the value type rather than
/// fixed to one envelope struct: the host encodes [`ServerEnvelope`]s
/// and decodes [`ClientEnvelope`]s, while a client does the opposite,
/// and both directions share one codec.
///
/// `DeserializeOwned` (rather than `Deserialize<'de>`) means decoding
/// produces a value with no borrows into the input buffer, so the
/// buffer can be dropped as soon as `decode` returns.
///
/// [`ServerEnvelope`]: crate::ServerEnvelope
/// [`ClientEnvelope`]: crate::ClientEnvelope
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value cannot be
    /// represented in the codec's format.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or shaped like a different type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default) so that a build
/// using only a different codec carries no `serde_json` dependency.
///
/// ## Example
///
/// ```rust
/// use dropfour_protocol::{ClientEnvelope, ClientRequest, Codec, JsonCodec};
///
/// let codec = JsonCodec;
///
/// let envelope = ClientEnvelope {
///     seq: 2,
///     request: ClientRequest::Move { column: 3 },
/// };
///
/// let bytes = codec.encode(&envelope).unwrap();
/// let decoded: ClientEnvelope = codec.decode(&bytes).unwrap();
/// assert_eq!(envelope, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
