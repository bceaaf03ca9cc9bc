//! # Dropfour
//!
//! Authoritative two-player Connect Four over WebSockets.
//!
//! The host process owns the only writable board. Clients authenticate,
//! get a seat, and from then on send *requests* (drop a disc, restart)
//! and receive *facts* (a cell was set, the status changed). A client
//! that applies the facts in arrival order holds a perfect mirror of
//! the game — and a client that lies, floods, or guesses wrong gets a
//! targeted rejection and no say in the matter.
//!
//! This meta-crate wires the layers together — transport → protocol →
//! match — and ships the `dropfour-host` binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dropfour::prelude::*;
//!
//! # async fn start() -> Result<(), HostError> {
//! let server = HostServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(StaticTokenAuth::new(["alpha", "bravo"]))
//!     .await?;
//! server.run().await
//! # }
//! ```

pub mod auth;
mod error;
mod handler;
mod server;

pub use auth::{AuthError, Authenticator, StaticTokenAuth};
pub use error::HostError;
pub use server::{HostServer, HostServerBuilder, PROTOCOL_VERSION};

/// Everything needed to run a host or write a client against one.
pub mod prelude {
    pub use crate::auth::{AuthError, Authenticator, StaticTokenAuth};
    pub use crate::error::HostError;
    pub use crate::server::{HostServer, HostServerBuilder, PROTOCOL_VERSION};
    pub use dropfour_engine::{Board, Seat};
    pub use dropfour_match::{BoardMirror, MatchConfig, MatchPhase};
    pub use dropfour_protocol::{
        BroadcastEvent, ClientEnvelope, ClientRequest, Codec, GameStatus,
        JsonCodec, PlayerId, RejectReason, Role, ServerEnvelope,
        ServerMessage,
    };
}
