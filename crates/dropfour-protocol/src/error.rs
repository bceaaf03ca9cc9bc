//! Error types for the protocol layer.
//!
//! Each dropfour crate owns its error enum; a `ProtocolError` always
//! means a serialization problem, never a board-rules or networking one.

/// Errors that can occur while encoding or decoding messages.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error`
/// implementation; the `#[error("...")]` strings are what reach logs
/// and, for decode failures, the `message` of a `Malformed` rejection.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Turning a value into bytes failed. With JSON this is nearly
    /// unreachable for our types, but the codec contract keeps it
    /// explicit rather than panicking.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Turning bytes into a value failed: malformed JSON, a missing
    /// field, an unknown tag, or a truncated frame.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but breaks a protocol rule — e.g. a
    /// connection whose first message is not a `Hello`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
