//! Per-connection handler: handshake, seat assignment, and request routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive Hello → validate version
//!   2. Authenticate token → get PlayerId
//!   3. Join the match → claim a seat, register the outbound channel
//!   4. Send Welcome, start the outbound pump
//!   5. Loop: receive envelopes → forward Move / Restart to the match

use std::sync::Arc;
use std::time::Duration;

use dropfour_match::{MatchHandle, PeerSender};
use dropfour_protocol::{
    ClientEnvelope, ClientRequest, Codec, PlayerId, ProtocolError,
    RejectReason, Role, ServerEnvelope, ServerMessage,
};
use dropfour_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::auth::Authenticator;
use crate::server::{ServerState, PROTOCOL_VERSION};
use crate::HostError;

/// Drop guard that retires the player's outbound channel when the
/// handler exits.
///
/// Cleanup has to happen on every exit path, early errors included.
/// Since `Drop` is synchronous, the async handle call is spawned
/// fire-and-forget. The guard carries the channel itself so the actor
/// can ignore this cleanup if the identity already reconnected with a
/// fresh one.
struct LeaveGuard {
    player_id: PlayerId,
    sender: PeerSender,
    game: MatchHandle,
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let sender = self.sender.clone();
        let game = self.game.clone();
        tokio::spawn(async move {
            let _ = game.leave(player_id, sender).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, C>>,
) -> Result<(), HostError>
where
    A: Authenticator,
    C: Codec + Clone,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // Shared with the outbound pump; the connection locks its send and
    // receive halves independently, so the pump can write while this
    // task sits in `recv`.
    let conn = Arc::new(conn);

    // --- Step 1: Handshake ---
    let player_id = perform_handshake(&conn, &state).await?;

    tracing::info!(%conn_id, %player_id, "player authenticated");

    // --- Step 2: Join the match ---
    let (tx, rx) = mpsc::unbounded_channel();
    let assignment = match state.game.join(player_id, tx.clone()).await {
        Ok(assignment) => assignment,
        Err(err) => {
            if let Some(reason) = err.reject_reason() {
                reject_and_close(&conn, &state.codec, reason, &err.to_string())
                    .await?;
            }
            return Err(HostError::Match(err));
        }
    };

    // Guard goes up the moment the channel is registered: from here on,
    // every exit path retires it.
    let _guard = LeaveGuard {
        player_id,
        sender: tx.clone(),
        game: state.game.clone(),
    };

    // --- Step 3: Welcome, then hand the send side to the pump ---
    send_now(
        &conn,
        &state.codec,
        ServerMessage::Welcome {
            player_id,
            seat: assignment.seat,
            role: Role::Observer,
            rows: assignment.rows,
            columns: assignment.columns,
        },
    )
    .await?;

    pump_outbound(Arc::clone(&conn), state.codec.clone(), rx);

    // --- Step 4: Request loop ---
    //
    // No idle timeout: a player thinking about a move is silent for as
    // long as they like, and WebSocket keepalive happens below us.
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let envelope: ClientEnvelope = match state.codec.decode(&data) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(
                    %player_id, error = %e, "failed to decode request"
                );
                send_reject(&tx, RejectReason::Malformed, &e.to_string());
                continue;
            }
        };

        match envelope.request {
            ClientRequest::Move { column } => {
                // The verdict comes back through the pump, not here:
                // broadcast events if accepted, a targeted rejection if
                // not. Only actor loss is an error.
                state.game.submit_move(player_id, column).await?;
            }
            ClientRequest::Restart => {
                state.game.restart(player_id).await?;
            }
            ClientRequest::Hello { .. } => {
                tracing::debug!(%player_id, "ignoring repeated hello");
            }
        }
    }

    // _guard drops here → the channel is retired; once the actor lets
    // go of its sender the pump drains what's left and closes the
    // socket.
    Ok(())
}

/// Performs the opening exchange: receive `Hello`, check the version,
/// authenticate the token.
///
/// Every refusal is answered with a targeted `Rejected` before the
/// connection is closed, so the human on the other end learns why.
async fn perform_handshake<A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<A, C>>,
) -> Result<PlayerId, HostError>
where
    A: Authenticator,
    C: Codec + Clone,
{
    let data = match tokio::time::timeout(
        Duration::from_secs(5),
        conn.recv(),
    )
    .await
    {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(HostError::Protocol(ProtocolError::InvalidMessage(
                "connection closed before hello".into(),
            )));
        }
        Ok(Err(e)) => return Err(HostError::Transport(e)),
        Err(_) => {
            return Err(HostError::Protocol(ProtocolError::InvalidMessage(
                "handshake timed out".into(),
            )));
        }
    };

    let envelope: ClientEnvelope = match state.codec.decode(&data) {
        Ok(envelope) => envelope,
        Err(e) => {
            reject_and_close(
                conn,
                &state.codec,
                RejectReason::Malformed,
                &e.to_string(),
            )
            .await?;
            return Err(HostError::Protocol(e));
        }
    };

    let (version, token) = match envelope.request {
        ClientRequest::Hello { version, token } => (version, token),
        _ => {
            reject_and_close(
                conn,
                &state.codec,
                RejectReason::Malformed,
                "first message must be Hello",
            )
            .await?;
            return Err(HostError::Protocol(ProtocolError::InvalidMessage(
                "first message must be Hello".into(),
            )));
        }
    };

    if version != PROTOCOL_VERSION {
        reject_and_close(
            conn,
            &state.codec,
            RejectReason::VersionMismatch,
            &format!(
                "expected protocol version {PROTOCOL_VERSION}, got {version}"
            ),
        )
        .await?;
        return Err(HostError::Protocol(ProtocolError::InvalidMessage(
            "protocol version mismatch".into(),
        )));
    }

    let token = token.unwrap_or_default();
    match state.auth.authenticate(&token).await {
        Ok(player_id) => Ok(player_id),
        Err(e) => {
            reject_and_close(
                conn,
                &state.codec,
                RejectReason::AuthFailed,
                &e.to_string(),
            )
            .await?;
            Err(HostError::Auth(e))
        }
    }
}

/// Spawns the task that forwards match messages to the socket, stamping
/// per-connection sequence numbers.
///
/// The `Welcome` went out as seq 0 before this task started; everything
/// after counts up from 1 with no gaps. One pump per connection means a
/// single writer per socket, so broadcast order survives all the way to
/// the wire.
fn pump_outbound<C: Codec>(
    conn: Arc<WebSocketConnection>,
    codec: C,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    tokio::spawn(async move {
        let mut seq: u64 = 1;
        while let Some(message) = rx.recv().await {
            let envelope = ServerEnvelope { seq, message };
            let bytes = match codec.encode(&envelope) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "failed to encode outbound message"
                    );
                    continue;
                }
            };
            if conn.send(&bytes).await.is_err() {
                break;
            }
            seq += 1;
        }
        // Channel closed: the peer was retired, or the socket died.
        let _ = conn.close().await;
    });
}

/// Queues a targeted rejection on this connection's outbound channel.
/// Delivery order relative to broadcast events is decided by the pump.
fn send_reject(sender: &PeerSender, reason: RejectReason, message: &str) {
    let _ = sender.send(ServerMessage::Rejected {
        reason,
        message: message.to_string(),
    });
}

/// Sends a seq-0 `Rejected` straight down the socket, then closes it.
/// Handshake-phase refusals only — once the pump is running, rejections
/// travel through it and the connection stays open.
async fn reject_and_close<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    reason: RejectReason,
    message: &str,
) -> Result<(), HostError> {
    send_now(
        conn,
        codec,
        ServerMessage::Rejected {
            reason,
            message: message.to_string(),
        },
    )
    .await?;
    let _ = conn.close().await;
    Ok(())
}

/// Sends a message directly on the socket with sequence number zero.
/// Only used before the outbound pump exists.
async fn send_now<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    message: ServerMessage,
) -> Result<(), HostError> {
    let envelope = ServerEnvelope { seq: 0, message };
    let bytes = codec.encode(&envelope)?;
    conn.send(&bytes).await.map_err(HostError::Transport)?;
    Ok(())
}
