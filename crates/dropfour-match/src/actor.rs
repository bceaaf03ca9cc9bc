//! Match actor: an isolated Tokio task owning the canonical session.
//!
//! All game state lives inside one task and is reached only through an
//! mpsc command channel. The actor pulls commands off that channel one
//! at a time and runs each to completion — a move is validated, applied,
//! and fanned out before the next command is even read. That single
//! consumption loop is the entire concurrency story: no lock guards the
//! board, because nothing else can touch it.

use std::collections::HashMap;

use dropfour_engine::Seat;
use dropfour_protocol::{BroadcastEvent, PlayerId, Role, ServerMessage};
use tokio::sync::{mpsc, oneshot};

use crate::{MatchConfig, MatchController, MatchError, MatchPhase};

/// Channel sender delivering outbound messages to one peer's connection
/// handler. Unbounded: the actor never blocks on a slow client, it just
/// queues (and the handler drops the queue when the socket dies).
pub type PeerSender = mpsc::UnboundedSender<ServerMessage>;

/// Command buffer size. Two players cannot meaningfully queue more;
/// a flooding client hits backpressure here instead of growing memory.
const COMMAND_BUFFER: usize = 64;

/// Commands sent to the match actor through its channel.
///
/// Variants carrying a `oneshot::Sender` are request/response: the
/// caller awaits the reply. The rest are fire-and-forget — their
/// outcome travels to clients as broadcast events or targeted
/// rejections, not as return values.
pub(crate) enum MatchCommand {
    /// Register a peer and claim (or reclaim) a seat for it.
    Join {
        player_id: PlayerId,
        sender: PeerSender,
        reply: oneshot::Sender<Result<SeatAssignment, MatchError>>,
    },

    /// Drop a peer's outbound channel, if it is still the registered
    /// one. The seat stays claimed.
    Leave {
        player_id: PlayerId,
        sender: PeerSender,
    },

    /// A move request from a peer.
    Move { player_id: PlayerId, column: usize },

    /// A restart request from a peer.
    Restart { player_id: PlayerId },

    /// Snapshot of match metadata (not the board itself).
    Info { reply: oneshot::Sender<MatchInfo> },

    /// Stop the actor.
    Shutdown,
}

/// What a successful join tells the connection handler: the seat the
/// identity holds and the board dimensions for the client's mirror.
#[derive(Debug, Clone, Copy)]
pub struct SeatAssignment {
    pub seat: Seat,
    pub rows: usize,
    pub columns: usize,
}

/// A snapshot of match metadata.
#[derive(Debug, Clone)]
pub struct MatchInfo {
    /// Current lifecycle phase.
    pub phase: MatchPhase,
    /// Whose turn it is (stale once the phase is terminal).
    pub current_turn: Seat,
    /// Claimed seats (0..=2).
    pub seated: usize,
    /// Peers with a live outbound channel.
    pub connected: usize,
}

/// Handle to a running match actor.
///
/// Cheap to clone — it wraps an `mpsc::Sender`. Every connection
/// handler holds one; the match stays alive as long as any handle does.
#[derive(Clone)]
pub struct MatchHandle {
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    /// Registers a peer and claims its seat, replacing any stale
    /// channel a previous connection for the same identity left behind.
    pub async fn join(
        &self,
        player_id: PlayerId,
        sender: PeerSender,
    ) -> Result<SeatAssignment, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Join {
                player_id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| MatchError::Unavailable)?;
        reply_rx.await.map_err(|_| MatchError::Unavailable)?
    }

    /// Unregisters a peer's outbound channel (fire-and-forget).
    ///
    /// Takes the channel being retired so the actor can tell a genuine
    /// departure from a stale cleanup racing a reconnect: if the
    /// identity already re-registered with a fresh channel, this is a
    /// no-op.
    pub async fn leave(
        &self,
        player_id: PlayerId,
        sender: PeerSender,
    ) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Leave { player_id, sender })
            .await
            .map_err(|_| MatchError::Unavailable)
    }

    /// Submits a move request. The verdict arrives on the peer's
    /// outbound channel — broadcast events if accepted, a targeted
    /// rejection if not — never as a return value here.
    pub async fn submit_move(
        &self,
        player_id: PlayerId,
        column: usize,
    ) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Move { player_id, column })
            .await
            .map_err(|_| MatchError::Unavailable)
    }

    /// Submits a restart request. Same delivery model as moves.
    pub async fn restart(&self, player_id: PlayerId) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Restart { player_id })
            .await
            .map_err(|_| MatchError::Unavailable)
    }

    /// Requests current match metadata.
    pub async fn info(&self) -> Result<MatchInfo, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| MatchError::Unavailable)?;
        reply_rx.await.map_err(|_| MatchError::Unavailable)
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Shutdown)
            .await
            .map_err(|_| MatchError::Unavailable)
    }
}

/// The actor's internal state. Runs inside a Tokio task.
struct MatchActor {
    controller: MatchController,
    /// Per-peer outbound channels, keyed by identity.
    peers: HashMap<PlayerId, PeerSender>,
    receiver: mpsc::Receiver<MatchCommand>,
}

impl MatchActor {
    async fn run(mut self) {
        let config = *self.controller.config();
        tracing::info!(
            role = %Role::Authoritative,
            rows = config.rows,
            columns = config.columns,
            "match actor started"
        );

        // The match is live from the first instant. Nobody is usually
        // connected to hear this opening batch, and that is fine: a
        // fresh mirror already equals a fresh board.
        let opening = self.controller.start();
        self.broadcast(&opening);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                MatchCommand::Join {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, sender);
                    let _ = reply.send(result);
                }
                MatchCommand::Leave { player_id, sender } => {
                    self.handle_leave(player_id, &sender);
                }
                MatchCommand::Move { player_id, column } => {
                    self.handle_move(player_id, column);
                }
                MatchCommand::Restart { player_id } => {
                    self.handle_restart(player_id);
                }
                MatchCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                MatchCommand::Shutdown => {
                    tracing::info!("match shutting down");
                    break;
                }
            }
        }

        tracing::info!("match actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        sender: PeerSender,
    ) -> Result<SeatAssignment, MatchError> {
        let seat = self.controller.claim_seat(player_id)?;

        // Insert unconditionally: a reconnecting identity replaces the
        // dead channel its old connection left behind.
        self.peers.insert(player_id, sender);
        tracing::info!(
            %player_id,
            %seat,
            connected = self.peers.len(),
            "player joined"
        );

        let config = self.controller.config();
        Ok(SeatAssignment {
            seat,
            rows: config.rows,
            columns: config.columns,
        })
    }

    fn handle_leave(&mut self, player_id: PlayerId, sender: &PeerSender) {
        // Only detach the exact channel being retired. A reconnect may
        // have replaced it already, and the late cleanup from the old
        // connection must not take the new one down.
        let retiring = self
            .peers
            .get(&player_id)
            .is_some_and(|current| current.same_channel(sender));
        if retiring {
            self.peers.remove(&player_id);
            tracing::info!(
                %player_id,
                connected = self.peers.len(),
                "player left"
            );
        }
        // The seat stays claimed: the same identity can reconnect and
        // resume, and nobody else can take its side in the meantime.
    }

    fn handle_move(&mut self, player_id: PlayerId, column: usize) {
        match self.controller.submit_move(player_id, column) {
            Ok(events) => {
                tracing::debug!(%player_id, column, "move accepted");
                self.broadcast(&events);
                let phase = self.controller.phase();
                if phase.is_over() {
                    tracing::info!(%phase, "game finished");
                }
            }
            Err(err) => {
                tracing::debug!(%player_id, column, %err, "move rejected");
                self.reject(player_id, &err);
            }
        }
    }

    fn handle_restart(&mut self, player_id: PlayerId) {
        match self.controller.restart(player_id) {
            Ok(events) => {
                tracing::info!(%player_id, "match restarted");
                self.broadcast(&events);
            }
            Err(err) => {
                tracing::debug!(%player_id, %err, "restart rejected");
                self.reject(player_id, &err);
            }
        }
    }

    /// Fans events out to every connected peer, preserving event order
    /// within each peer's channel.
    fn broadcast(&self, events: &[BroadcastEvent]) {
        for &event in events {
            let msg = ServerMessage::Event(event);
            for player_id in self.peers.keys() {
                self.send_to(*player_id, msg.clone());
            }
        }
    }

    /// Sends a targeted rejection to the offending peer only. Errors
    /// without a wire-level reason (actor plumbing failures) are logged
    /// by the caller and not sent.
    fn reject(&self, player_id: PlayerId, err: &MatchError) {
        if let Some(reason) = err.reject_reason() {
            self.send_to(
                player_id,
                ServerMessage::Rejected {
                    reason,
                    message: err.to_string(),
                },
            );
        }
    }

    /// Delivers one message to one peer. Silently drops it if the
    /// peer's channel is gone (connection already closed).
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.peers.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> MatchInfo {
        MatchInfo {
            phase: self.controller.phase(),
            current_turn: self.controller.current_turn(),
            seated: self.controller.seats().seated(),
            connected: self.peers.len(),
        }
    }
}

/// Spawns a match actor task and returns the handle for talking to it.
pub fn spawn_match(config: MatchConfig) -> MatchHandle {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

    let actor = MatchActor {
        controller: MatchController::new(config),
        peers: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    MatchHandle { sender: tx }
}
