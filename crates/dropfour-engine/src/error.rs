//! Error types for board operations.

/// Errors produced by [`Board`](crate::Board) operations.
///
/// Every variant is recoverable: the board is never mutated when an
/// operation returns an error, so the caller can report the problem
/// and carry on with the same board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The column index is outside the board.
    #[error("column {column} is out of range (board has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// Every cell in the column is already occupied.
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    /// The (row, col) coordinate is outside the board.
    #[error("cell ({row}, {col}) is outside the board")]
    CellOutOfRange { row: usize, col: usize },
}
