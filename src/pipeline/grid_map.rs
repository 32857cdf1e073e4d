// Maps a row-major grid cell to its pad. Pads are numbered along the
// anti-diagonals (the grid is drawn rotated 45 degrees), so each category
// sits in a contiguous diagonal band. Only square grids are supported.

use crate::shared::{GRID_SIZE, PadCategory, PadConfig};

// band edges in diagonal order for the 6x6 grid
const SOUNDS_START: usize = 10;
const DRUM_START: usize = 26;

/// Position of `(row, col)` when an `n` x `n` grid is read diagonal by
/// diagonal, top-left first, each diagonal from its top row down.
pub fn diagonal_position(row: usize, col: usize, n: usize) -> usize {
    let diagonal = row + col;
    if diagonal <= n - 1 {
        // ascending half: triangular number of the earlier diagonals
        return diagonal * (diagonal + 1) / 2 + row;
    }
    let terms = diagonal - n + 1;
    let first = n - 1 - (diagonal % n);
    let last = n - 1;
    let max_index = n * (n + 1) / 2 - 1;
    // terms * (first + last) is always even here
    max_index + terms * (first + last) / 2 - (n - row - 1)
}

pub fn diagonal_position_of_index(index: usize, n: usize) -> usize {
    diagonal_position(index / n, index % n, n)
}

/// The pad bound to grid cell `index` (`0..36`) of the 6x6 grid.
pub fn grid_index_to_pad(index: usize) -> PadConfig {
    debug_assert!(index < GRID_SIZE * GRID_SIZE, "grid index {index} out of range");
    let position = diagonal_position_of_index(index, GRID_SIZE);
    let (category, slot) = if position < SOUNDS_START {
        (PadCategory::Bass, position)
    } else if position < DRUM_START {
        (PadCategory::Sounds, position - SOUNDS_START)
    } else {
        (PadCategory::Drum, position - DRUM_START)
    };
    PadConfig { category, slot: slot as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::NUM_CELLS;
    use std::collections::HashSet;

    #[test]
    fn diagonal_positions_cover_grid_once() {
        let mut seen: Vec<usize> = (0..NUM_CELLS)
            .map(|i| diagonal_position_of_index(i, GRID_SIZE))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..NUM_CELLS).collect::<Vec<_>>());
    }

    #[test]
    fn corners_and_first_diagonals() {
        assert_eq!(diagonal_position(0, 0, 6), 0);
        assert_eq!(diagonal_position(0, 1, 6), 1);
        assert_eq!(diagonal_position(1, 0, 6), 2);
        assert_eq!(diagonal_position(0, 5, 6), 15);
        assert_eq!(diagonal_position(5, 0, 6), 20);
        assert_eq!(diagonal_position(1, 5, 6), 21);
        assert_eq!(diagonal_position(5, 5, 6), 35);
    }

    #[test]
    fn every_pad_appears_exactly_once() {
        let pads: HashSet<PadConfig> = (0..NUM_CELLS).map(grid_index_to_pad).collect();
        assert_eq!(pads.len(), NUM_CELLS);
        assert!(pads.iter().all(|p| p.is_valid()));
        for category in PadCategory::ALL {
            let count = pads.iter().filter(|p| p.category == category).count();
            assert_eq!(count, category.bank_size(), "{category:?}");
        }
    }

    #[test]
    fn bands_follow_diagonal_order() {
        for index in 0..NUM_CELLS {
            let position = diagonal_position_of_index(index, GRID_SIZE);
            let pad = grid_index_to_pad(index);
            match position {
                0..=9 => assert_eq!(pad, PadConfig { category: PadCategory::Bass, slot: position as u8 }),
                10..=25 => assert_eq!(pad, PadConfig { category: PadCategory::Sounds, slot: (position - 10) as u8 }),
                _ => assert_eq!(pad, PadConfig { category: PadCategory::Drum, slot: (position - 26) as u8 }),
            }
        }
    }

    #[test]
    fn top_left_is_bass_and_bottom_right_is_drum() {
        assert_eq!(grid_index_to_pad(0), PadConfig { category: PadCategory::Bass, slot: 0 });
        assert_eq!(grid_index_to_pad(35), PadConfig { category: PadCategory::Drum, slot: 9 });
        // row 0, col 4 sits on diagonal position 10
        assert_eq!(grid_index_to_pad(4), PadConfig { category: PadCategory::Sounds, slot: 0 });
    }
}
