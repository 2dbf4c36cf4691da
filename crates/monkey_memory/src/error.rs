//! Validation errors for board values.

use derive_more::{Display, Error};

use crate::{BOARD_CELLS, Cell};

/// Error raised when a value cannot be accepted as board content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The number does not name a cell on the board.
    #[display("Cell {} is outside the board (1-{})", _0, BOARD_CELLS)]
    OutOfRange(#[error(not(source))] u8),

    /// The cell already appears earlier in the sequence.
    #[display("Cell {} appears more than once in the sequence", _0)]
    DuplicateCell(#[error(not(source))] Cell),
}
