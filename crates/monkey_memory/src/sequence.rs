//! Recall sequences and the sources that generate them.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{BOARD_CELLS, BoardError, Cell};

/// Ordered list of distinct board cells the player must reproduce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Sequence(Vec<Cell>);

impl Sequence {
    /// Builds a sequence from explicit cells.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateCell`] if a cell occurs twice.
    #[instrument]
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, BoardError> {
        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen.insert(*cell) {
                return Err(BoardError::DuplicateCell(*cell));
            }
        }
        Ok(Self(cells))
    }

    /// Number of cells in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty sequence.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the cell at `index`.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    /// Returns true if `cell` is part of the sequence.
    pub fn contains(&self, cell: Cell) -> bool {
        self.0.contains(&cell)
    }

    /// Returns the cells in order.
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }
}

impl TryFrom<Vec<Cell>> for Sequence {
    type Error = BoardError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        Sequence::from_cells(cells)
    }
}

impl From<Sequence> for Vec<Cell> {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}

/// Source of fresh recall sequences.
///
/// Implementations must return distinct cells; lengths above the board size
/// are clamped to the board size.
pub trait SequenceSource: std::fmt::Debug {
    /// Produces a new sequence of `length` cells.
    fn generate(&mut self, length: usize) -> Sequence;
}

/// Uniformly shuffled sequences.
///
/// Shuffles all 18 cells with Fisher-Yates and keeps the first `length`,
/// so every sequence is duplicate-free and independent of earlier rounds.
#[derive(Debug, Clone)]
pub struct ShuffledSequences<R = StdRng> {
    rng: R,
}

impl ShuffledSequences<StdRng> {
    /// Creates a source seeded from the operating system.
    #[instrument]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Creates a reproducible source from a seed.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ShuffledSequences<R> {
    /// Wraps an existing random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + std::fmt::Debug> SequenceSource for ShuffledSequences<R> {
    #[instrument(skip(self))]
    fn generate(&mut self, length: usize) -> Sequence {
        let board = usize::from(BOARD_CELLS);
        if length > board {
            warn!(requested = length, board, "Sequence length clamped to board size");
        }

        let mut cells: Vec<Cell> = Cell::all().collect();
        cells.shuffle(&mut self.rng);
        cells.truncate(length.min(board));

        debug!(length = cells.len(), "Sequence generated");
        Sequence(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(numbers: &[u8]) -> Vec<Cell> {
        numbers.iter().map(|n| Cell::new(*n).unwrap()).collect()
    }

    #[test]
    fn duplicates_rejected() {
        let result = Sequence::from_cells(cells(&[1, 2, 1]));
        assert_eq!(
            result,
            Err(BoardError::DuplicateCell(Cell::new(1).unwrap()))
        );
    }

    #[test]
    fn oversized_request_is_clamped() {
        let mut source = ShuffledSequences::seeded(7);
        let sequence = source.generate(40);
        assert_eq!(sequence.len(), 18);
        assert!(Sequence::from_cells(sequence.cells().to_vec()).is_ok());
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let a = ShuffledSequences::seeded(99).generate(8);
        let b = ShuffledSequences::seeded(99).generate(8);
        assert_eq!(a, b);
    }
}
