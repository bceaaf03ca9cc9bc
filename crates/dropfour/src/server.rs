//! `HostServer` builder and accept loop.
//!
//! This is the entry point for running a dropfour host. It ties the
//! layers together: transport → protocol → match.

use std::sync::Arc;

use dropfour_match::{spawn_match, MatchConfig, MatchHandle};
use dropfour_protocol::{Codec, JsonCodec};
use dropfour_transport::{Transport, TransportError, WebSocketTransport};

use crate::auth::Authenticator;
use crate::handler::handle_connection;
use crate::HostError;

/// The current protocol version. Clients must send this in their
/// `Hello` or be rejected.
pub const PROTOCOL_VERSION: u32 = 1;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. There is
/// no mutex here: the only mutable thing behind it is the match, and
/// the match is reached through its actor handle.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) game: MatchHandle,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a dropfour host.
///
/// # Example
///
/// ```rust,no_run
/// use dropfour::prelude::*;
///
/// # async fn start() -> Result<(), HostError> {
/// let server = HostServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .match_config(MatchConfig { rows: 6, columns: 7 })
///     .build(StaticTokenAuth::new(["alpha", "bravo"]))
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct HostServerBuilder {
    bind_addr: String,
    match_config: MatchConfig,
}

impl HostServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            match_config: MatchConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the board dimensions for the hosted match.
    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Builds the server with the given authenticator.
    ///
    /// Binds the listener and spawns the match actor; the match is live
    /// from this point, waiting for its players. Uses `JsonCodec` and
    /// `WebSocketTransport`.
    pub async fn build(
        self,
        auth: impl Authenticator,
    ) -> Result<HostServer<impl Authenticator, JsonCodec>, HostError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            game: spawn_match(self.match_config),
            auth,
            codec: JsonCodec,
        });

        Ok(HostServer { transport, state })
    }
}

impl Default for HostServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running dropfour host.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct HostServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
}

impl<A, C> HostServer<A, C>
where
    A: Authenticator,
    C: Codec + Clone,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, TransportError> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), HostError> {
        tracing::info!(version = PROTOCOL_VERSION, "dropfour host running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
