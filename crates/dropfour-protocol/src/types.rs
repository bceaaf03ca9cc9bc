//! Core protocol types for dropfour's wire format.
//!
//! Every structure that travels between the host and a client lives here:
//! it gets serialized to bytes on one side, sent over the transport, and
//! deserialized on the other. If a type is not in this module, it never
//! leaves the process.
//!
//! The protocol is deliberately asymmetric. Clients send *requests*
//! (wishes the host may refuse); the host sends *facts* (events that have
//! already happened). There is no message a client can send that directly
//! mutates game state.

// Serde is Rust's de-facto serialization framework. Its two core traits:
//   - `Serialize`:   "this type can be turned INTO a wire format"
//   - `Deserialize`: "this type can be built FROM a wire format"
// `#[derive(...)]` generates both implementations from the type shape.
use serde::{Deserialize, Serialize};

// `fmt` gives us Display for human-readable formatting in logs.
use std::fmt;

use dropfour_engine::Seat;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for an authenticated player.
///
/// This is a newtype over `u64` — wrapping the primitive in a named
/// struct so a player id can never be confused with a sequence number or
/// a column index, even though all three are integers underneath. The
/// compiler enforces the distinction for free.
///
/// `#[serde(transparent)]` makes serde treat the wrapper as invisible:
/// `PlayerId(7)` appears on the wire as the bare number `7`, not as
/// `{ "0": 7 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// Display lets `{}` formatting (and tracing fields) print a compact,
/// recognizable form: `P-7`.
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role — who may mutate game state
// ---------------------------------------------------------------------------

/// Whether a participant holds the writable game state or a replica.
///
/// Exactly one side of a match is [`Authoritative`]: the host process
/// whose board is the truth. Everyone else is an [`Observer`] holding a
/// read-only mirror that is updated purely by applying broadcast events.
/// The role is fixed at connection time and never changes afterwards.
///
/// [`Authoritative`]: Role::Authoritative
/// [`Observer`]: Role::Observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Owns the canonical board and validates every move.
    Authoritative,
    /// Holds a mirror; may request moves but never apply them locally
    /// ahead of the host's event.
    Observer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Authoritative => write!(f, "authoritative"),
            Role::Observer => write!(f, "observer"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameStatus — the phase a match is in
// ---------------------------------------------------------------------------

/// The current phase of a match, as announced to clients.
///
/// `#[serde(tag = "state")]` produces internally tagged JSON. A turn
/// announcement looks like:
///   `{ "state": "Turn", "seat": "One" }`
/// and a finished game like:
///   `{ "state": "Won", "seat": "Two" }` or `{ "state": "Draw" }`.
///
/// The tag is `"state"` rather than `"type"` on purpose: a status is
/// always nested inside a [`BroadcastEvent`], and giving each nesting
/// level its own tag name keeps the flattened JSON unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum GameStatus {
    /// The game is live and it is `seat`'s turn to move.
    Turn { seat: Seat },
    /// `seat` connected four. The board is frozen until a restart.
    Won { seat: Seat },
    /// The board filled up with no line of four. Frozen until restart.
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Turn { seat } => write!(f, "{seat}'s turn"),
            GameStatus::Won { seat } => write!(f, "{seat} wins"),
            GameStatus::Draw => write!(f, "Draw"),
        }
    }
}

// ---------------------------------------------------------------------------
// RejectReason — why a request was refused
// ---------------------------------------------------------------------------

/// Machine-readable reason codes attached to every [`ServerMessage::Rejected`].
///
/// Clients branch on the reason (e.g. re-enable input after
/// `NotYourTurn`, show a dialog on `VersionMismatch`), so the codes are
/// part of the wire contract. The human-readable detail travels
/// separately in the `message` field.
///
/// A unit-only enum serializes as a bare string: `"ColumnFull"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    // -- Handshake failures (connection is closed afterwards) --
    /// The client speaks a different protocol version than the host.
    VersionMismatch,
    /// The presented token did not authenticate.
    AuthFailed,
    /// Both seats are already claimed by other identities.
    MatchFull,

    // -- Request failures (connection stays open, state untouched) --
    /// The bytes did not parse as a known request.
    Malformed,
    /// The sender holds no seat in this match.
    Unauthorized,
    /// The sender has a seat, but it is the opponent's turn.
    NotYourTurn,
    /// The requested column does not exist on this board.
    InvalidColumn,
    /// The requested column has no empty cell left.
    ColumnFull,
    /// The game already ended; only a restart can revive the board.
    GameOver,
}

// ---------------------------------------------------------------------------
// BroadcastEvent — facts the host fans out
// ---------------------------------------------------------------------------

/// A state change that already happened on the authoritative board.
///
/// Events are the *only* way a mirror learns anything. After an accepted
/// move the host emits, in this strict order: one [`CellSet`], then a
/// [`StatusChanged`] (new turn, win, or draw), then [`InputEnabled`] if
/// the game just ended. A mirror that applies events in arrival order is
/// guaranteed to equal the canonical board after each batch.
///
/// `#[serde(tag = "event")]` — internally tagged, with a tag name chosen
/// so an event can sit inside a `"type"`-tagged [`ServerMessage`] without
/// the two levels colliding:
///   `{ "type": "Event", "event": "CellSet", "row": 5, "col": 3, "seat": "One" }`
///
/// [`CellSet`]: BroadcastEvent::CellSet
/// [`StatusChanged`]: BroadcastEvent::StatusChanged
/// [`InputEnabled`]: BroadcastEvent::InputEnabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BroadcastEvent {
    /// A disc settled at `(row, col)`. Row 0 is the top of the board;
    /// the coordinates are final — gravity has already been applied by
    /// the host, so mirrors write the cell directly.
    CellSet { row: usize, col: usize, seat: Seat },

    /// The match moved to a new phase: the other player's turn, a win,
    /// or a draw.
    StatusChanged { status: GameStatus },

    /// Whether move input should currently be offered to players.
    /// Disabled when a game ends; re-enabled by the reset that follows
    /// a restart.
    InputEnabled { enabled: bool },

    /// The board was replaced with an empty `rows` × `columns` grid and
    /// the match restarted. Mirrors drop everything and start fresh.
    BoardReset { rows: usize, columns: usize },
}

// ---------------------------------------------------------------------------
// ClientRequest — what a client may ask for
// ---------------------------------------------------------------------------

/// A request from client to host.
///
/// Requests are wishes, not commands: every one of them can come back as
/// a [`ServerMessage::Rejected`], and a client must not change any local
/// state when sending one.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "Move", "column": 3 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    /// The opening message of every connection. Nothing else is accepted
    /// until the host has answered it with a [`ServerMessage::Welcome`].
    Hello {
        /// The protocol version the client was built against. The host
        /// rejects mismatches outright rather than guessing at
        /// compatibility.
        version: u32,
        /// Credential for the authenticator. Optional at the protocol
        /// level; a host configured with tokens will reject `None`.
        token: Option<String>,
    },

    /// "Drop my disc into `column`." The host decides where (and
    /// whether) it lands.
    Move { column: usize },

    /// "Clear the board and start a new game." Only honored for the
    /// player seated as host; mid-game restarts are allowed.
    Restart,
}

// ---------------------------------------------------------------------------
// ServerMessage — what the host sends back
// ---------------------------------------------------------------------------

/// A message from host to client.
///
/// Three kinds of traffic flow downstream: the handshake answer
/// ([`Welcome`]), broadcast facts ([`Event`]), and targeted refusals
/// ([`Rejected`]). Events go to every connected client in identical
/// order; a rejection goes only to the offender.
///
/// [`Welcome`]: ServerMessage::Welcome
/// [`Event`]: ServerMessage::Event
/// [`Rejected`]: ServerMessage::Rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Handshake accepted. Tells the client who it is, which seat it
    /// holds, and how big the board is, so it can size its mirror
    /// before the first event arrives.
    Welcome {
        player_id: PlayerId,
        seat: Seat,
        /// Always [`Role::Observer`] for remote clients — the writable
        /// state never leaves the host.
        role: Role,
        rows: usize,
        columns: usize,
    },

    /// A broadcast fact. The inner [`BroadcastEvent`] carries its own
    /// `"event"` tag, so on the wire the two tags sit side by side in
    /// one flat object.
    Event(BroadcastEvent),

    /// A request was refused. State did not change anywhere; `reason`
    /// is for the client's logic, `message` for its logs and the human
    /// behind them.
    Rejected {
        reason: RejectReason,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Envelopes — the top-level wire format
// ---------------------------------------------------------------------------

/// The top-level frame for client-to-host traffic.
///
/// `seq` increments by one per message sent, starting at 1 for the
/// `Hello`. The host does not act on it beyond logging, but gaps in the
/// sequence make transport bugs visible in a packet capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnvelope {
    /// The sender's own message counter.
    pub seq: u64,
    /// The actual request.
    pub request: ClientRequest,
}

/// The top-level frame for host-to-client traffic.
///
/// Each connection gets its own `seq` stream: the `Welcome` is seq 0 and
/// everything after it counts up with no gaps, which lets a client
/// assert it has not missed an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEnvelope {
    /// Per-connection message counter.
    pub seq: u64,
    /// The actual message.
    pub message: ServerMessage,
}

// =========================================================================
// Tests
// =========================================================================
