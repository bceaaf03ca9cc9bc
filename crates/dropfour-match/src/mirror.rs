//! Read-only board replica for observers.
//!
//! Every peer that is not the host keeps one of these. It is mutated by
//! exactly one thing — applying broadcast events in arrival order — and
//! never by local input, so it cannot drift from the canonical board as
//! long as events are delivered in order.

use dropfour_engine::{Board, BoardError, Seat};
use dropfour_protocol::{BroadcastEvent, GameStatus};

/// An observer's view of the match: board, announced status, and
/// whether input should currently be offered.
///
/// A freshly constructed mirror is identical to a freshly started match
/// — empty board, [`Seat::One`] to move, input enabled. That identity
/// is the whole bootstrapping story: a client that connects before the
/// first move needs no snapshot, only the dimensions from its welcome.
#[derive(Debug, Clone)]
pub struct BoardMirror {
    board: Board,
    status: GameStatus,
    input_enabled: bool,
}

impl BoardMirror {
    /// An empty mirror with the given dimensions.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            board: Board::new(rows, columns),
            status: GameStatus::Turn { seat: Seat::One },
            input_enabled: true,
        }
    }

    /// Applies one broadcast event.
    ///
    /// # Errors
    ///
    /// [`BoardError::CellOutOfRange`] if a `CellSet` names a cell this
    /// mirror does not have — only possible when host and client
    /// disagree about dimensions, which the welcome message exists to
    /// prevent.
    pub fn apply(&mut self, event: BroadcastEvent) -> Result<(), BoardError> {
        match event {
            BroadcastEvent::CellSet { row, col, seat } => {
                self.board.set_cell(row, col, seat)?;
            }
            BroadcastEvent::StatusChanged { status } => {
                self.status = status;
            }
            BroadcastEvent::InputEnabled { enabled } => {
                self.input_enabled = enabled;
            }
            BroadcastEvent::BoardReset { rows, columns } => {
                // Board only. The status and input flags are carried by
                // the other two events of the reset batch, which the
                // host always sends right behind this one.
                self.board = Board::new(rows, columns);
            }
        }
        Ok(())
    }

    /// The replicated board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The most recently announced status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether the host currently wants move input offered.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropfour_protocol::PlayerId;

    use crate::{MatchConfig, MatchController};

    #[test]
    fn test_fresh_mirror_matches_fresh_match() {
        let mirror = BoardMirror::new(6, 7);
        let ctl = MatchController::new(MatchConfig::default());
        assert_eq!(*mirror.board(), *ctl.board());
        assert_eq!(
            mirror.status(),
            GameStatus::Turn { seat: Seat::One }
        );
        assert!(mirror.input_enabled());
    }

    #[test]
    fn test_cell_set_writes_exactly_one_cell() {
        let mut mirror = BoardMirror::new(6, 7);
        mirror
            .apply(BroadcastEvent::CellSet { row: 5, col: 3, seat: Seat::One })
            .unwrap();
        assert_eq!(mirror.board().get(5, 3), Some(Seat::One));
        assert_eq!(mirror.board().get(4, 3), None);
    }

    #[test]
    fn test_status_and_input_events_update_flags() {
        let mut mirror = BoardMirror::new(6, 7);
        mirror
            .apply(BroadcastEvent::StatusChanged {
                status: GameStatus::Won { seat: Seat::Two },
            })
            .unwrap();
        mirror
            .apply(BroadcastEvent::InputEnabled { enabled: false })
            .unwrap();
        assert_eq!(mirror.status(), GameStatus::Won { seat: Seat::Two });
        assert!(!mirror.input_enabled());
    }

    #[test]
    fn test_reset_batch_restores_fresh_state() {
        // A finished game: discs on the board, a winner announced,
        // input off.
        let mut mirror = BoardMirror::new(6, 7);
        mirror
            .apply(BroadcastEvent::CellSet { row: 5, col: 0, seat: Seat::Two })
            .unwrap();
        mirror
            .apply(BroadcastEvent::StatusChanged {
                status: GameStatus::Won { seat: Seat::Two },
            })
            .unwrap();
        mirror
            .apply(BroadcastEvent::InputEnabled { enabled: false })
            .unwrap();

        // BoardReset alone clears only the board; the status and input
        // flags wait for the rest of the batch.
        mirror
            .apply(BroadcastEvent::BoardReset { rows: 6, columns: 7 })
            .unwrap();
        assert!(mirror.board().is_empty());
        assert_eq!(mirror.status(), GameStatus::Won { seat: Seat::Two });

        mirror
            .apply(BroadcastEvent::StatusChanged {
                status: GameStatus::Turn { seat: Seat::One },
            })
            .unwrap();
        mirror
            .apply(BroadcastEvent::InputEnabled { enabled: true })
            .unwrap();
        assert_eq!(mirror.status(), GameStatus::Turn { seat: Seat::One });
        assert!(mirror.input_enabled());
    }

    #[test]
    fn test_cell_outside_mirror_is_an_error() {
        let mut mirror = BoardMirror::new(6, 7);
        let err = mirror
            .apply(BroadcastEvent::CellSet { row: 9, col: 0, seat: Seat::One })
            .unwrap_err();
        assert!(matches!(err, BoardError::CellOutOfRange { row: 9, col: 0 }));
    }

    #[test]
    fn test_mirror_tracks_canonical_board_through_a_game() {
        // Drive a real controller and feed every emitted event into a
        // mirror; after each move the two boards must be identical.
        let mut ctl = MatchController::new(MatchConfig::default());
        let mut mirror = BoardMirror::new(6, 7);
        for event in ctl.start() {
            mirror.apply(event).unwrap();
        }
        let p1 = PlayerId(1);
        let p2 = PlayerId(2);
        ctl.claim_seat(p1).unwrap();
        ctl.claim_seat(p2).unwrap();

        let columns = [3, 0, 3, 0, 3, 0, 3];
        for (i, &col) in columns.iter().enumerate() {
            let mover = if i % 2 == 0 { p1 } else { p2 };
            for event in ctl.submit_move(mover, col).unwrap() {
                mirror.apply(event).unwrap();
            }
            assert_eq!(*mirror.board(), *ctl.board(), "after move {i}");
        }

        assert_eq!(mirror.status(), GameStatus::Won { seat: Seat::One });
        assert!(!mirror.input_enabled());
    }
}
