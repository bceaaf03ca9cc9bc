//! Unified error type for the dropfour host.

use dropfour_match::MatchError;
use dropfour_protocol::ProtocolError;
use dropfour_transport::TransportError;

use crate::auth::AuthError;

/// Top-level error that wraps all crate-specific errors.
///
/// When embedding the host, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An authentication error during the handshake.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A match-level error (seat assignment, request plumbing).
    #[error(transparent)]
    Match(#[from] MatchError),
}
