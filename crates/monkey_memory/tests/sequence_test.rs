//! Statistical checks for sequence generation.

use std::collections::HashMap;

use monkey_memory::{BOARD_CELLS, Sequence, SequenceSource, ShuffledSequences};

#[test]
fn test_sequences_are_duplicate_free_for_all_lengths() {
    let mut source = ShuffledSequences::seeded(2024);
    for length in 0..=usize::from(BOARD_CELLS) {
        let sequence = source.generate(length);
        assert_eq!(sequence.len(), length);
        assert!(Sequence::from_cells(sequence.cells().to_vec()).is_ok());
    }
}

#[test]
fn test_first_position_is_roughly_uniform() {
    let mut source = ShuffledSequences::seeded(17);
    let draws = 18_000;
    let mut counts: HashMap<u8, u32> = HashMap::new();
    for _ in 0..draws {
        let first = source.generate(4).get(0).expect("non-empty").number();
        *counts.entry(first).or_default() += 1;
    }

    assert_eq!(counts.len(), usize::from(BOARD_CELLS));
    // Expected 1000 per cell; a fair shuffle stays well inside this band.
    for (cell, count) in counts {
        assert!((800..=1200).contains(&count), "cell {cell} drawn {count} times");
    }
}

#[test]
fn test_consecutive_sequences_differ() {
    let mut source = ShuffledSequences::seeded(5);
    let first = source.generate(8);
    let differing = (0..10).filter(|_| source.generate(8) != first).count();
    assert!(differing > 0);
}
