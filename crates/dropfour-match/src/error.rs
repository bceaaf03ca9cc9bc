//! Error types for the match layer.

use dropfour_protocol::{PlayerId, RejectReason};

use crate::MatchPhase;

/// Errors produced while driving a match.
///
/// Every variant except [`Unavailable`] corresponds to a refused player
/// request; none of them disturbs canonical state, and none is fatal to
/// the session. The `#[error]` strings double as the human-readable
/// `message` of the rejection sent back to the offending client.
///
/// [`Unavailable`]: MatchError::Unavailable
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The requested column does not exist on this board.
    #[error("column {column} is out of range (board has {columns} columns)")]
    InvalidColumn { column: usize, columns: usize },

    /// Every cell in the requested column is occupied.
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    /// The requester holds a seat, but the other seat has the turn.
    #[error("it is {current}'s turn")]
    NotYourTurn { current: dropfour_engine::Seat },

    /// The requesting identity holds no seat in this match.
    #[error("player {0} holds no seat in this match")]
    Unauthorized(PlayerId),

    /// The match already ended; only a restart revives the board.
    #[error("game over: {phase}")]
    GameOver { phase: MatchPhase },

    /// Both seats belong to other identities.
    #[error("match is full, both seats are taken")]
    MatchFull,

    /// The match actor's command channel is closed or saturated.
    #[error("match is unavailable")]
    Unavailable,
}

impl MatchError {
    /// The wire-level reason code for this error, or `None` for errors
    /// that never travel to a client ([`Unavailable`] means the actor
    /// itself is gone, so there is nobody left to send through).
    ///
    /// [`Unavailable`]: MatchError::Unavailable
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::InvalidColumn { .. } => Some(RejectReason::InvalidColumn),
            Self::ColumnFull { .. } => Some(RejectReason::ColumnFull),
            Self::NotYourTurn { .. } => Some(RejectReason::NotYourTurn),
            Self::Unauthorized(_) => Some(RejectReason::Unauthorized),
            Self::GameOver { .. } => Some(RejectReason::GameOver),
            Self::MatchFull => Some(RejectReason::MatchFull),
            Self::Unavailable => None,
        }
    }
}
