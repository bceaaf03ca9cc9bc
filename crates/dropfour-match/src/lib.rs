//! Authoritative match session for dropfour.
//!
//! One match, two seats, one truth. The pieces:
//!
//! - [`MatchController`] — pure sequential game logic: seats, turns,
//!   drops, win/draw verdicts, and the event stream they produce.
//! - [`spawn_match`] / [`MatchHandle`] — the controller wrapped in a
//!   Tokio actor task, which serializes concurrent client requests and
//!   fans broadcast events out to connected peers.
//! - [`BoardMirror`] — the observer-side replica, mutated only by
//!   applying broadcast events.
//! - [`MatchConfig`] / [`MatchPhase`] — settings and lifecycle.

mod actor;
mod config;
mod controller;
mod error;
mod mirror;
mod seats;

pub use actor::{
    spawn_match, MatchHandle, MatchInfo, PeerSender, SeatAssignment,
};
pub use config::{MatchConfig, MatchPhase, MAX_BOARD_DIM, MIN_BOARD_DIM};
pub use controller::MatchController;
pub use error::MatchError;
pub use mirror::BoardMirror;
pub use seats::SeatMap;
