//! Authentication hook for mapping join tokens to player identities.
//!
//! The host doesn't dictate where identities come from — that's your
//! job (or your auth provider's: a JWT validator, an API lookup, a
//! fixed allowlist). It defines the [`Authenticator`] trait instead: a
//! single async method that takes the token from a `Hello` and returns
//! a `PlayerId` or an error. The handshake calls it once per
//! connection, before any seat is claimed.
//!
//! # Why a trait?
//!
//! A trait is like an interface in other languages — it defines WHAT
//! something can do without specifying HOW. This lets us:
//! - Use real token validation in production
//! - Use the bundled [`StaticTokenAuth`] for private matches
//! - Use a permissive mock in tests
//!
//! All without changing any host code.
//!
//! Identity matters more here than in most lobbies: the `PlayerId` an
//! authenticator returns is what a seat binds to for the whole session.
//! Hand the same identity to two people and they will fight over one
//! seat; hand a reconnecting player a fresh identity and their old seat
//! is lost to them.

use dropfour_protocol::PlayerId;

/// Errors that can occur while authenticating a handshake.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token was missing, unknown, or rejected.
    #[error("authentication failed: {0}")]
    Failed(String),
}

/// Validates a client's join token and returns their identity.
///
/// # Trait bounds
///
/// - `Send + Sync` → the authenticator can be shared across connection
///   handler tasks (Tokio may call it from different threads
///   simultaneously).
/// - `'static` → it doesn't borrow temporary data. This is required
///   because the authenticator lives as long as the server.
///
/// # Example
///
/// ```rust
/// use dropfour::auth::{AuthError, Authenticator};
/// use dropfour_protocol::PlayerId;
///
/// /// Accepts any numeric token and uses it as the identity.
/// /// Only for development — never use this in production!
/// struct DevAuth;
///
/// impl Authenticator for DevAuth {
///     async fn authenticate(
///         &self,
///         token: &str,
///     ) -> Result<PlayerId, AuthError> {
///         // In production you'd validate a JWT, call an auth API, etc.
///         let id: u64 = token.parse().map_err(|_| {
///             AuthError::Failed("token must be a number".into())
///         })?;
///         Ok(PlayerId(id))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the player's identity.
    ///
    /// Called during the handshake when a client sends a
    /// [`ClientRequest::Hello`](dropfour_protocol::ClientRequest::Hello)
    /// with a token.
    ///
    /// # Arguments
    /// - `token` — the join token sent by the client (empty string if
    ///   the `Hello` carried none)
    ///
    /// # Returns
    /// - `Ok(PlayerId)` — authentication succeeded, here's who they are
    /// - `Err(AuthError::Failed)` — token is invalid or unknown
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, AuthError>> + Send;
}

/// Fixed-token authenticator for private matches.
///
/// Configured with a short list of tokens when the server starts; a
/// token's position in the list becomes the identity it maps to (first
/// token → `P-1`, second → `P-2`, …). Because the mapping is
/// positional and stable, the same token always yields the same
/// identity — which is exactly what lets a dropped player reconnect
/// and find their seat still theirs.
#[derive(Debug, Clone)]
pub struct StaticTokenAuth {
    tokens: Vec<String>,
}

impl StaticTokenAuth {
    /// Creates an authenticator accepting exactly these tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl Authenticator for StaticTokenAuth {
    async fn authenticate(&self, token: &str) -> Result<PlayerId, AuthError> {
        match self.tokens.iter().position(|known| known == token) {
            Some(position) => Ok(PlayerId(position as u64 + 1)),
            None => Err(AuthError::Failed("unknown token".into())),
        }
    }
}
