//! Wire protocol for dropfour.
//!
//! This crate defines the language hosts and clients speak:
//!
//! - **Types** ([`ClientEnvelope`], [`ServerEnvelope`], [`BroadcastEvent`],
//!   [`RejectReason`], …) — every structure that crosses the network.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those structures
//!   become bytes and come back.
//! - **Errors** ([`ProtocolError`]) — what can go wrong in between.
//!
//! # Direction of truth
//!
//! The protocol encodes the game's authority model. Upstream traffic is
//! [`ClientRequest`]s — proposals the host is free to refuse. Downstream
//! traffic is [`BroadcastEvent`]s — facts about state that has already
//! changed — plus targeted [`ServerMessage::Rejected`] answers. A client
//! that only ever mutates its mirror in response to events cannot drift
//! from the host.
//!
//! ```text
//! Transport (bytes) → Protocol (envelopes) → Match (seats, turns, board)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BroadcastEvent, ClientEnvelope, ClientRequest, GameStatus, PlayerId,
    RejectReason, Role, ServerEnvelope, ServerMessage,
};

// The seat type is defined by the rules crate but appears in nearly
// every wire message, so clients get it from here too.
pub use dropfour_engine::Seat;
