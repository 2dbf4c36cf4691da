//! Board geometry and the validated [`Cell`] type.
//!
//! The board is a fixed grid of 18 numbered cells laid out three per row.
//! Sequences are drawn from this universe, so every cell value that enters
//! the engine is checked once at construction and trusted afterwards.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::BoardError;

/// Number of cells on the board.
pub const BOARD_CELLS: u8 = 18;

/// Number of cells per board row.
pub const BOARD_COLUMNS: u8 = 3;

/// Number of board rows.
pub const BOARD_ROWS: u8 = BOARD_CELLS / BOARD_COLUMNS;

/// A cell on the board, numbered `1..=18`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("{}", _0)]
pub struct Cell(u8);

impl Cell {
    /// The top-left cell.
    pub const FIRST: Cell = Cell(1);

    /// Creates a cell from its board number.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] if `number` is not in `1..=18`.
    #[instrument]
    pub fn new(number: u8) -> Result<Self, BoardError> {
        if (1..=BOARD_CELLS).contains(&number) {
            Ok(Self(number))
        } else {
            Err(BoardError::OutOfRange(number))
        }
    }

    /// Returns the cell number (`1..=18`).
    pub fn number(self) -> u8 {
        self.0
    }

    /// Returns the zero-based row of this cell.
    pub fn row(self) -> u8 {
        (self.0 - 1) / BOARD_COLUMNS
    }

    /// Returns the zero-based column of this cell.
    pub fn column(self) -> u8 {
        (self.0 - 1) % BOARD_COLUMNS
    }

    /// Returns the cell at the given zero-based row and column, if on the board.
    pub fn at(row: u8, column: u8) -> Option<Self> {
        if row >= BOARD_ROWS || column >= BOARD_COLUMNS {
            return None;
        }
        Some(Self(row * BOARD_COLUMNS + column + 1))
    }

    /// Iterates over every cell in board order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (1..=BOARD_CELLS).map(Cell)
    }
}

impl TryFrom<u8> for Cell {
    type Error = BoardError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Cell::new(number)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.0
    }
}
