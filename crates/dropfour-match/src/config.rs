//! Match configuration and game phase.

use dropfour_engine::Seat;
use serde::{Deserialize, Serialize};

/// Smallest board dimension worth playing on. Anything under four cells
/// per axis cannot contain a winning line at all.
pub const MIN_BOARD_DIM: usize = 4;

/// Largest board dimension accepted. Keeps a typo like `--rows 700`
/// from allocating an absurd grid.
pub const MAX_BOARD_DIM: usize = 32;

// ---------------------------------------------------------------------------
// MatchConfig
// ---------------------------------------------------------------------------

/// Configuration for one match.
///
/// Dimensions are fixed once the match starts: a restart reuses them,
/// and they are never renegotiated mid-session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Board height. Row 0 is the top row.
    pub rows: usize,

    /// Board width.
    pub columns: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        // The classic 6×7 Connect-Four board.
        Self { rows: 6, columns: 7 }
    }
}

impl MatchConfig {
    /// Returns a copy with both dimensions clamped to
    /// [`MIN_BOARD_DIM`]..=[`MAX_BOARD_DIM`], warning when a value had
    /// to be adjusted.
    pub fn validated(self) -> Self {
        let rows = self.rows.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM);
        let columns = self.columns.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM);
        if rows != self.rows {
            tracing::warn!(
                requested = self.rows,
                using = rows,
                "row count out of range, clamped"
            );
        }
        if columns != self.columns {
            tracing::warn!(
                requested = self.columns,
                using = columns,
                "column count out of range, clamped"
            );
        }
        Self { rows, columns }
    }
}

// ---------------------------------------------------------------------------
// MatchPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a match, as the authoritative side tracks it.
///
/// ```text
/// InProgress → Won(seat) ─┐
///      ↑    → Draw ───────┤
///      └── restart ───────┘
/// ```
///
/// Unlike most state machines there is no "waiting" phase: a match is
/// live from the moment it is created, and a player may legally move
/// before the opponent has even connected. The only transitions out of
/// a terminal phase are restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Moves are being accepted.
    InProgress,
    /// The given seat connected four. Board frozen.
    Won(Seat),
    /// Full board, no winner. Board frozen.
    Draw,
}

impl MatchPhase {
    /// `true` once the match reached a terminal phase. Every move is
    /// rejected while this holds.
    pub fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Won(seat) => write!(f, "won by {seat}"),
            Self::Draw => write!(f, "drawn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_default_is_classic_board() {
        let config = MatchConfig::default();
        assert_eq!(config.rows, 6);
        assert_eq!(config.columns, 7);
    }

    #[test]
    fn test_validated_clamps_tiny_dimensions() {
        let config = MatchConfig { rows: 1, columns: 0 }.validated();
        assert_eq!(config.rows, MIN_BOARD_DIM);
        assert_eq!(config.columns, MIN_BOARD_DIM);
    }

    #[test]
    fn test_validated_clamps_huge_dimensions() {
        let config = MatchConfig {
            rows: 700,
            columns: 64,
        }
        .validated();
        assert_eq!(config.rows, MAX_BOARD_DIM);
        assert_eq!(config.columns, MAX_BOARD_DIM);
    }

    #[test]
    fn test_validated_keeps_sane_dimensions() {
        let config = MatchConfig { rows: 6, columns: 7 }.validated();
        assert_eq!(config.rows, 6);
        assert_eq!(config.columns, 7);
    }

    #[test]
    fn test_match_phase_is_over() {
        assert!(!MatchPhase::InProgress.is_over());
        assert!(MatchPhase::Won(Seat::One).is_over());
        assert!(MatchPhase::Draw.is_over());
    }

    #[test]
    fn test_match_phase_display() {
        assert_eq!(MatchPhase::InProgress.to_string(), "in progress");
        assert_eq!(
            MatchPhase::Won(Seat::Two).to_string(),
            "won by Player 2"
        );
        assert_eq!(MatchPhase::Draw.to_string(), "drawn");
    }
}
