//! The Connect-Four grid and its rules.
//!
//! Everything here is synchronous, allocation-light, and free of I/O.
//! The board knows how discs fall and when four of them line up; it does
//! not know about players' identities, turns, or the network — that is
//! the session layer's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardError;

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// One of the two player roles in a match.
///
/// A seat is the color of a disc, not a connection: the session layer maps
/// connecting identities onto seats, and the board only ever sees seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// The opposing seat.
    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// The seat's 1-based number, for display and logs.
    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The four axes a winning line can lie on, as (row, col) step deltas:
/// horizontal, vertical, and the two diagonals. Each axis is scanned in
/// both directions from the placed cell.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A rows × columns Connect-Four grid.
///
/// # Coordinate convention
///
/// Row 0 is the **top** row and row `rows - 1` is the **bottom**; gravity
/// pulls discs toward higher row indices. Every coordinate in this crate
/// (and everything built on it) is `(row, col)` in that order.
///
/// A cell is either empty (`None`) or holds the disc of a [`Seat`]. An
/// occupied cell never becomes empty again; the only way back to an empty
/// grid is replacing the board wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major: index = row * cols + col.
    cells: Vec<Option<Seat>>,
}

impl Board {
    /// Creates an empty board with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The seat occupying `(row, col)`, or `None` if the cell is empty.
    /// Coordinates outside the grid also read as empty.
    pub fn get(&self, row: usize, col: usize) -> Option<Seat> {
        self.seat_at(row as isize, col as isize)
    }

    /// `true` if no disc has been placed.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// `true` if every cell is occupied. A full board with no winning
    /// line is a draw; that judgement belongs to the caller, which must
    /// check for a win first.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// The row a disc dropped into `column` would settle in: the lowest
    /// currently-empty cell, scanning from the bottom row upward.
    ///
    /// # Errors
    ///
    /// [`BoardError::ColumnOutOfRange`] if the column does not exist,
    /// [`BoardError::ColumnFull`] if no cell in it is empty. The board is
    /// not read beyond its bounds in either case.
    pub fn landing_row(&self, column: usize) -> Result<usize, BoardError> {
        if column >= self.cols {
            return Err(BoardError::ColumnOutOfRange {
                column,
                columns: self.cols,
            });
        }
        (0..self.rows)
            .rev()
            .find(|&row| self.cells[row * self.cols + column].is_none())
            .ok_or(BoardError::ColumnFull { column })
    }

    /// Drops a disc into `column` and returns the row it settled in.
    ///
    /// Computing the landing row and occupying the cell happen in one
    /// call, so no other mutation can slip between them.
    pub fn drop_disc(
        &mut self,
        column: usize,
        seat: Seat,
    ) -> Result<usize, BoardError> {
        let row = self.landing_row(column)?;
        self.cells[row * self.cols + column] = Some(seat);
        Ok(row)
    }

    /// Occupies `(row, col)` directly, bypassing gravity.
    ///
    /// This is for replicas applying an authoritative placement event
    /// (which already carries the landing row) and for tests building
    /// positions. The authoritative path itself uses [`drop_disc`].
    ///
    /// [`drop_disc`]: Self::drop_disc
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        seat: Seat,
    ) -> Result<(), BoardError> {
        if row >= self.rows || col >= self.cols {
            return Err(BoardError::CellOutOfRange { row, col });
        }
        self.cells[row * self.cols + col] = Some(seat);
        Ok(())
    }

    /// `true` if the disc at `(row, col)` completes a line of four.
    ///
    /// Pivots on the given cell — intended to be the cell a disc was just
    /// placed in — and, for each of the four axes, counts contiguous
    /// same-seat cells outward in both directions (at most 3 steps each
    /// way, stopping at the board edge or a non-matching cell). The two
    /// counts summing to 3 or more means four in a row including the
    /// pivot. At most 24 cells are read; the board is never scanned in
    /// full.
    ///
    /// Calling this with an empty pivot cell violates the contract
    /// (placements always precede the check); it returns `false`.
    pub fn connects_four(&self, row: usize, col: usize) -> bool {
        let Some(seat) = self.get(row, col) else {
            debug_assert!(false, "win check pivot ({row}, {col}) is empty");
            return false;
        };
        AXES.iter().any(|&(dr, dc)| {
            self.run_from(row, col, seat, dr, dc)
                + self.run_from(row, col, seat, -dr, -dc)
                >= 3
        })
    }

    /// Length of the contiguous run of `seat` discs starting one step
    /// from `(row, col)` in direction `(dr, dc)`, capped at 3.
    fn run_from(
        &self,
        row: usize,
        col: usize,
        seat: Seat,
        dr: isize,
        dc: isize,
    ) -> usize {
        let mut len = 0;
        for step in 1..=3 {
            let r = row as isize + dr * step;
            let c = col as isize + dc * step;
            if self.seat_at(r, c) != Some(seat) {
                break;
            }
            len += 1;
        }
        len
    }

    fn seat_at(&self, row: isize, col: isize) -> Option<Seat> {
        if row < 0
            || col < 0
            || row >= self.rows as isize
            || col >= self.cols as isize
        {
            return None;
        }
        self.cells[row as usize * self.cols + col as usize]
    }
}

// =========================================================================
// Tests
// =========================================================================
