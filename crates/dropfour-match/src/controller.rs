//! The authoritative session controller.
//!
//! [`MatchController`] owns the one true board. It is pure sequential
//! logic — no I/O, no channels, no locks — so the whole rule set can be
//! unit-tested without a runtime. Concurrency is layered on top by the
//! match actor, which feeds the controller one command at a time.

use dropfour_engine::{Board, BoardError, Seat};
use dropfour_protocol::{BroadcastEvent, GameStatus, PlayerId};

use crate::{MatchConfig, MatchError, MatchPhase, SeatMap};

/// The canonical game state and the rules for mutating it.
///
/// Every mutating method returns the ordered list of [`BroadcastEvent`]s
/// the change produced; the caller is responsible for delivering them to
/// every observer *in that order*. A rejected request returns an error
/// instead and is guaranteed to leave all state — board, turn, phase,
/// seats — exactly as it was.
#[derive(Debug)]
pub struct MatchController {
    config: MatchConfig,
    board: Board,
    seats: SeatMap,
    current: Seat,
    phase: MatchPhase,
}

impl MatchController {
    /// Creates a live match with an empty board and [`Seat::One`] to
    /// move. Out-of-range dimensions are clamped, see
    /// [`MatchConfig::validated`].
    pub fn new(config: MatchConfig) -> Self {
        let config = config.validated();
        Self {
            config,
            board: Board::new(config.rows, config.columns),
            seats: SeatMap::new(),
            current: Seat::One,
            phase: MatchPhase::InProgress,
        }
    }

    // -----------------------------------------------------------------
    // Seats
    // -----------------------------------------------------------------

    /// Claims a seat for `player` (first-come, idempotent for an
    /// identity that already holds one). Seat assignment survives
    /// restarts; only a new match hands out fresh seats.
    pub fn claim_seat(
        &mut self,
        player: PlayerId,
    ) -> Result<Seat, MatchError> {
        self.seats.claim(player)
    }

    /// The seat held by `player`, if any.
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        self.seats.seat_of(player)
    }

    // -----------------------------------------------------------------
    // Game flow
    // -----------------------------------------------------------------

    /// Resets to a fresh game: empty board, [`Seat::One`] to move,
    /// phase back to [`MatchPhase::InProgress`].
    ///
    /// Returns the reset batch every observer must apply, in order:
    /// board cleared, turn announced, input re-enabled.
    pub fn start(&mut self) -> Vec<BroadcastEvent> {
        self.board = Board::new(self.config.rows, self.config.columns);
        self.current = Seat::One;
        self.phase = MatchPhase::InProgress;
        vec![
            BroadcastEvent::BoardReset {
                rows: self.config.rows,
                columns: self.config.columns,
            },
            BroadcastEvent::StatusChanged {
                status: GameStatus::Turn { seat: Seat::One },
            },
            BroadcastEvent::InputEnabled { enabled: true },
        ]
    }

    /// Restarts the game on behalf of `player`.
    ///
    /// Only the occupant of [`Seat::One`] — the host's own player — may
    /// restart. Restarting mid-game is allowed and simply abandons the
    /// current position.
    pub fn restart(
        &mut self,
        player: PlayerId,
    ) -> Result<Vec<BroadcastEvent>, MatchError> {
        if self.seats.occupant(Seat::One) != Some(player) {
            return Err(MatchError::Unauthorized(player));
        }
        Ok(self.start())
    }

    /// Processes one move request from `player`, end to end.
    ///
    /// The pipeline, in order:
    ///
    /// 1. refuse if the game is over;
    /// 2. refuse identities holding no seat;
    /// 3. refuse the seat that does not have the turn;
    /// 4. drop the disc (which refuses bad or full columns);
    /// 5. emit `CellSet` for the landing cell;
    /// 6. if the disc completed four-in-a-row: phase becomes `Won`,
    ///    emit `StatusChanged` and `InputEnabled(false)`;
    /// 7. else if the board filled up: phase becomes `Draw`, same
    ///    event pair;
    /// 8. else: the turn flips, emit `StatusChanged` for the new turn.
    ///
    /// The win check pivots on the cell that was just filled (step 4's
    /// landing), never a full-board scan, and the draw check only runs
    /// when there was no win.
    ///
    /// # Errors
    ///
    /// Any refusal above. No state changes on any error path — the
    /// validations all happen before the board is touched, and the
    /// board's own drop is atomic.
    pub fn submit_move(
        &mut self,
        player: PlayerId,
        column: usize,
    ) -> Result<Vec<BroadcastEvent>, MatchError> {
        if self.phase.is_over() {
            return Err(MatchError::GameOver { phase: self.phase });
        }
        let seat = self
            .seats
            .seat_of(player)
            .ok_or(MatchError::Unauthorized(player))?;
        if seat != self.current {
            return Err(MatchError::NotYourTurn {
                current: self.current,
            });
        }

        let columns = self.board.cols();
        let row = self.board.drop_disc(column, seat).map_err(|err| {
            match err {
                BoardError::ColumnOutOfRange { column, columns } => {
                    MatchError::InvalidColumn { column, columns }
                }
                BoardError::ColumnFull { column } => {
                    MatchError::ColumnFull { column }
                }
                // Drops never report cell coordinates; kept total so the
                // compiler holds this mapping up to date.
                BoardError::CellOutOfRange { .. } => {
                    MatchError::InvalidColumn { column, columns }
                }
            }
        })?;

        let mut events = vec![BroadcastEvent::CellSet {
            row,
            col: column,
            seat,
        }];

        if self.board.connects_four(row, column) {
            self.phase = MatchPhase::Won(seat);
            events.push(BroadcastEvent::StatusChanged {
                status: GameStatus::Won { seat },
            });
            events.push(BroadcastEvent::InputEnabled { enabled: false });
        } else if self.board.is_full() {
            self.phase = MatchPhase::Draw;
            events.push(BroadcastEvent::StatusChanged {
                status: GameStatus::Draw,
            });
            events.push(BroadcastEvent::InputEnabled { enabled: false });
        } else {
            self.current = seat.other();
            events.push(BroadcastEvent::StatusChanged {
                status: GameStatus::Turn { seat: self.current },
            });
        }

        Ok(events)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// The canonical board, read-only.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Whose turn it is. Meaningless once the game is over, but kept
    /// stable (the last mover's opponent) rather than invented.
    pub fn current_turn(&self) -> Seat {
        self.current
    }

    /// The validated configuration this match runs with.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The seat assignments.
    pub fn seats(&self) -> &SeatMap {
        &self.seats
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    /// A started 6×7 match with both seats claimed: P1 → One, P2 → Two.
    fn seated() -> MatchController {
        let mut ctl = MatchController::new(MatchConfig::default());
        ctl.start();
        ctl.claim_seat(P1).unwrap();
        ctl.claim_seat(P2).unwrap();
        ctl
    }

    /// Plays `columns` as strictly alternating moves starting with P1,
    /// asserting each one is accepted, and returns the final move's
    /// events.
    fn play(ctl: &mut MatchController, columns: &[usize]) -> Vec<BroadcastEvent> {
        let mut last = Vec::new();
        for (i, &col) in columns.iter().enumerate() {
            let mover = if i % 2 == 0 { P1 } else { P2 };
            last = ctl
                .submit_move(mover, col)
                .unwrap_or_else(|err| panic!("move {i} into column {col} rejected: {err}"));
        }
        last
    }

    // ---------------------------------------------------------------
    // Initialization
    // ---------------------------------------------------------------

    #[test]
    fn test_new_match_is_live_with_player_one_to_move() {
        let ctl = MatchController::new(MatchConfig::default());
        assert_eq!(ctl.phase(), MatchPhase::InProgress);
        assert_eq!(ctl.current_turn(), Seat::One);
        assert!(ctl.board().is_empty());
    }

    #[test]
    fn test_start_emits_reset_batch_in_order() {
        let mut ctl = MatchController::new(MatchConfig::default());
        let events = ctl.start();
        assert_eq!(
            events,
            vec![
                BroadcastEvent::BoardReset { rows: 6, columns: 7 },
                BroadcastEvent::StatusChanged {
                    status: GameStatus::Turn { seat: Seat::One },
                },
                BroadcastEvent::InputEnabled { enabled: true },
            ]
        );
    }

    #[test]
    fn test_config_dimensions_flow_into_board_and_events() {
        let mut ctl =
            MatchController::new(MatchConfig { rows: 8, columns: 9 });
        assert_eq!(ctl.board().rows(), 8);
        assert_eq!(ctl.board().cols(), 9);
        let events = ctl.start();
        assert_eq!(
            events[0],
            BroadcastEvent::BoardReset { rows: 8, columns: 9 }
        );
    }

    #[test]
    fn test_claim_seat_is_first_come_and_idempotent() {
        let mut ctl = MatchController::new(MatchConfig::default());
        assert_eq!(ctl.claim_seat(P1).unwrap(), Seat::One);
        assert_eq!(ctl.claim_seat(P2).unwrap(), Seat::Two);
        assert_eq!(ctl.claim_seat(P1).unwrap(), Seat::One);
        assert!(matches!(
            ctl.claim_seat(PlayerId(3)),
            Err(MatchError::MatchFull)
        ));
    }

    // ---------------------------------------------------------------
    // Accepted moves
    // ---------------------------------------------------------------

    #[test]
    fn test_accepted_move_emits_cell_then_new_turn() {
        let mut ctl = seated();
        let events = ctl.submit_move(P1, 2).unwrap();
        assert_eq!(
            events,
            vec![
                BroadcastEvent::CellSet { row: 5, col: 2, seat: Seat::One },
                BroadcastEvent::StatusChanged {
                    status: GameStatus::Turn { seat: Seat::Two },
                },
            ]
        );
        assert_eq!(ctl.board().get(5, 2), Some(Seat::One));
    }

    #[test]
    fn test_turn_alternates_after_each_accepted_move() {
        let mut ctl = seated();
        assert_eq!(ctl.current_turn(), Seat::One);
        ctl.submit_move(P1, 0).unwrap();
        assert_eq!(ctl.current_turn(), Seat::Two);
        ctl.submit_move(P2, 0).unwrap();
        assert_eq!(ctl.current_turn(), Seat::One);
    }

    #[test]
    fn test_discs_stack_in_same_column() {
        let mut ctl = seated();
        ctl.submit_move(P1, 4).unwrap();
        let events = ctl.submit_move(P2, 4).unwrap();
        assert_eq!(
            events[0],
            BroadcastEvent::CellSet { row: 4, col: 4, seat: Seat::Two }
        );
    }

    #[test]
    fn test_move_allowed_before_opponent_claims_seat() {
        let mut ctl = MatchController::new(MatchConfig::default());
        ctl.start();
        ctl.claim_seat(P1).unwrap();

        // The match is live from creation, so a lone player may open.
        ctl.submit_move(P1, 3).unwrap();

        // But only once: the turn flipped to the unclaimed seat.
        assert!(matches!(
            ctl.submit_move(P1, 3),
            Err(MatchError::NotYourTurn { current: Seat::Two })
        ));
    }

    // ---------------------------------------------------------------
    // Rejections — each leaves every piece of state untouched
    // ---------------------------------------------------------------

    #[test]
    fn test_out_of_turn_move_rejected() {
        let mut ctl = seated();
        let board_before = ctl.board().clone();

        let err = ctl.submit_move(P2, 3).unwrap_err();
        assert!(matches!(err, MatchError::NotYourTurn { current: Seat::One }));
        assert_eq!(*ctl.board(), board_before);
        assert_eq!(ctl.current_turn(), Seat::One);
    }

    #[test]
    fn test_unknown_identity_rejected() {
        let mut ctl = seated();
        let board_before = ctl.board().clone();

        let err = ctl.submit_move(PlayerId(99), 0).unwrap_err();
        assert!(matches!(err, MatchError::Unauthorized(PlayerId(99))));
        assert_eq!(*ctl.board(), board_before);
    }

    #[test]
    fn test_out_of_range_column_rejected() {
        let mut ctl = seated();
        let err = ctl.submit_move(P1, 7).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidColumn { column: 7, columns: 7 }
        ));
        assert!(ctl.board().is_empty());
        assert_eq!(ctl.current_turn(), Seat::One);
    }

    #[test]
    fn test_full_column_rejected_board_unchanged() {
        let mut ctl = seated();
        // Six alternating drops fill column 0 with no line of four.
        play(&mut ctl, &[0, 0, 0, 0, 0, 0]);
        let board_before = ctl.board().clone();

        let err = ctl.submit_move(P1, 0).unwrap_err();
        assert!(matches!(err, MatchError::ColumnFull { column: 0 }));
        assert_eq!(*ctl.board(), board_before);
        assert_eq!(ctl.current_turn(), Seat::One);
        assert_eq!(ctl.phase(), MatchPhase::InProgress);
    }

    // ---------------------------------------------------------------
    // Terminal conditions
    // ---------------------------------------------------------------

    #[test]
    fn test_vertical_win_ends_game() {
        let mut ctl = seated();
        // P1 stacks column 3; P2 answers in column 0.
        let events = play(&mut ctl, &[3, 0, 3, 0, 3, 0, 3]);

        assert_eq!(ctl.phase(), MatchPhase::Won(Seat::One));
        assert_eq!(
            events,
            vec![
                BroadcastEvent::CellSet { row: 2, col: 3, seat: Seat::One },
                BroadcastEvent::StatusChanged {
                    status: GameStatus::Won { seat: Seat::One },
                },
                BroadcastEvent::InputEnabled { enabled: false },
            ]
        );
    }

    #[test]
    fn test_diagonal_win_ends_game() {
        let mut ctl = seated();
        // Builds a staircase so P1's last drop lands at (2,2) and
        // completes (2,2)(3,3)(4,4)(5,5).
        let events = play(&mut ctl, &[5, 4, 4, 3, 3, 2, 3, 2, 2, 6, 2]);

        assert_eq!(ctl.phase(), MatchPhase::Won(Seat::One));
        assert_eq!(
            events[0],
            BroadcastEvent::CellSet { row: 2, col: 2, seat: Seat::One }
        );
        assert_eq!(
            events[1],
            BroadcastEvent::StatusChanged {
                status: GameStatus::Won { seat: Seat::One },
            }
        );
    }

    #[test]
    fn test_horizontal_win_ends_game() {
        let mut ctl = seated();
        // P1 walks the bottom row 0..3 while P2 stacks on top of P1's
        // previous column, never building a line of its own.
        let events = play(&mut ctl, &[0, 0, 1, 1, 2, 2, 3]);

        assert_eq!(ctl.phase(), MatchPhase::Won(Seat::One));
        assert_eq!(
            events[0],
            BroadcastEvent::CellSet { row: 5, col: 3, seat: Seat::One }
        );
    }

    #[test]
    fn test_filled_board_without_line_is_draw() {
        let mut ctl = seated();
        // Column pairs in a pattern that never aligns four: each column
        // ends up three of one seat stacked under three of the other.
        let sequence = [
            0, 1, 0, 1, 0, 1, 2, 3, 2, 3, 2, 3, 4, 5, 4, 5, 4, 5, 6, 0, 6,
            0, 6, 0, 1, 2, 1, 2, 1, 2, 3, 4, 3, 4, 3, 4, 5, 6, 5, 6, 5, 6,
        ];
        let events = play(&mut ctl, &sequence);

        assert_eq!(ctl.phase(), MatchPhase::Draw);
        assert!(ctl.board().is_full());
        assert_eq!(
            events,
            vec![
                BroadcastEvent::CellSet { row: 0, col: 6, seat: Seat::Two },
                BroadcastEvent::StatusChanged { status: GameStatus::Draw },
                BroadcastEvent::InputEnabled { enabled: false },
            ]
        );
    }

    #[test]
    fn test_win_on_final_cell_reports_win_not_draw() {
        // On a 4×4 board, fill all sixteen cells so the very last disc
        // both fills the board and completes a vertical four. The win
        // must take precedence over the draw.
        let mut ctl =
            MatchController::new(MatchConfig { rows: 4, columns: 4 });
        ctl.start();
        ctl.claim_seat(P1).unwrap();
        ctl.claim_seat(P2).unwrap();

        let sequence = [1, 0, 1, 2, 0, 3, 2, 1, 0, 3, 1, 2, 0, 3, 2, 3];
        let events = play(&mut ctl, &sequence);

        assert!(ctl.board().is_full());
        assert_eq!(ctl.phase(), MatchPhase::Won(Seat::Two));
        assert_eq!(
            events[1],
            BroadcastEvent::StatusChanged {
                status: GameStatus::Won { seat: Seat::Two },
            }
        );
    }

    #[test]
    fn test_moves_rejected_after_game_over() {
        let mut ctl = seated();
        play(&mut ctl, &[3, 0, 3, 0, 3, 0, 3]);
        let board_before = ctl.board().clone();

        // Both the would-be next mover and the winner are locked out.
        assert!(matches!(
            ctl.submit_move(P2, 1),
            Err(MatchError::GameOver { phase: MatchPhase::Won(Seat::One) })
        ));
        assert!(matches!(
            ctl.submit_move(P1, 1),
            Err(MatchError::GameOver { .. })
        ));
        assert_eq!(*ctl.board(), board_before);
    }

    // ---------------------------------------------------------------
    // Restart
    // ---------------------------------------------------------------

    #[test]
    fn test_restart_after_win_resets_everything() {
        let mut ctl = seated();
        play(&mut ctl, &[3, 0, 3, 0, 3, 0, 3]);
        assert_eq!(ctl.phase(), MatchPhase::Won(Seat::One));

        let events = ctl.restart(P1).unwrap();
        assert_eq!(
            events,
            vec![
                BroadcastEvent::BoardReset { rows: 6, columns: 7 },
                BroadcastEvent::StatusChanged {
                    status: GameStatus::Turn { seat: Seat::One },
                },
                BroadcastEvent::InputEnabled { enabled: true },
            ]
        );
        assert!(ctl.board().is_empty());
        assert_eq!(ctl.phase(), MatchPhase::InProgress);
        assert_eq!(ctl.current_turn(), Seat::One);

        // Seats survive the restart; play can resume immediately.
        ctl.submit_move(P1, 6).unwrap();
    }

    #[test]
    fn test_restart_requires_host_seat() {
        let mut ctl = seated();
        play(&mut ctl, &[3, 0, 3, 0, 3, 0, 3]);

        let err = ctl.restart(P2).unwrap_err();
        assert!(matches!(err, MatchError::Unauthorized(_)));
        assert_eq!(ctl.phase(), MatchPhase::Won(Seat::One));
        assert!(!ctl.board().is_empty());
    }

    #[test]
    fn test_restart_mid_game_abandons_position() {
        let mut ctl = seated();
        play(&mut ctl, &[2, 3]);

        ctl.restart(P1).unwrap();
        assert!(ctl.board().is_empty());
        assert_eq!(ctl.current_turn(), Seat::One);
    }

    #[test]
    fn test_restart_by_unknown_identity_rejected() {
        let mut ctl = seated();
        assert!(matches!(
            ctl.restart(PlayerId(42)),
            Err(MatchError::Unauthorized(PlayerId(42)))
        ));
    }
}
