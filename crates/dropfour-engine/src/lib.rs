//! Connect-Four board rules for dropfour.
//!
//! This crate is the rules kernel: the grid, gravity, and the win and
//! draw predicates. It has no notion of turns, players, or transport —
//! higher layers own those and call down into [`Board`] for every
//! placement and every verdict.
//!
//! # Example
//!
//! ```
//! use dropfour_engine::{Board, Seat};
//!
//! let mut board = Board::new(6, 7);
//! for _ in 0..3 {
//!     board.drop_disc(0, Seat::One)?;
//! }
//! let row = board.drop_disc(0, Seat::One)?;
//! assert_eq!(row, 2);
//! assert!(board.connects_four(row, 0));
//! # Ok::<(), dropfour_engine::BoardError>(())
//! ```

mod board;
mod error;

pub use board::{Board, Seat};
pub use error::BoardError;
