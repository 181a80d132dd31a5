use lazy_static::lazy_static;

use crate::min_max::Player;

pub const CELL_COUNT: usize = 9;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

pub const WIN_INDICES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

lazy_static! {
    /// For every cell the winning lines running through it.
    pub static ref LINES_THROUGH: [Vec<[usize; 3]>; CELL_COUNT] = {
        let mut lines: [Vec<[usize; 3]>; CELL_COUNT] = Default::default();
        for line in WIN_INDICES {
            for index in line {
                lines[index].push(line);
            }
        }
        lines
    };
}

/// Nine cells in row-major order, each empty or owned by one side.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Board {
    pub cells: [Option<Player>; CELL_COUNT],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(cells: [Option<Player>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<Player> {
        self.cells[index]
    }

    pub fn is_empty_cell(&self, index: usize) -> bool {
        self.cells[index].is_none()
    }

    pub fn winning_indices(&self) -> Option<&'static [usize; 3]> {
        WIN_INDICES.iter().find(|indices| {
            self.cells[indices[0]].is_some() && self.cells[indices[0]] == self.cells[indices[1]] && self.cells[indices[1]] == self.cells[indices[2]]
        })
    }

    pub fn winner(&self) -> Option<Player> {
        self.winning_indices().and_then(|indices| self.cells[indices[0]])
    }

    /// Empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&index| self.is_empty_cell(index)).collect()
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(player)).count()
    }

    /// Empty cells where a mark of `player` completes a line.
    pub fn winning_cells(&self, player: Player) -> Vec<usize> {
        (0..CELL_COUNT)
            .filter(|&index| self.is_empty_cell(index))
            .filter(|&index| {
                LINES_THROUGH[index].iter().any(|line| {
                    line.iter().all(|&other| other == index || self.cells[other] == Some(player))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::min_max::Player::{Max as X, Min as O};

    const E: Option<Player> = None;

    fn board(cells: [Option<Player>; 9]) -> Board {
        Board::new(cells)
    }

    #[test]
    fn winner() {
        assert_eq!(Board::empty().winner(), None);
        assert_eq!(board([Some(X), Some(X), Some(X), E, E, E, E, E, E]).winner(), Some(X));
        assert_eq!(board([Some(O), E, E, E, Some(O), E, E, E, Some(O)]).winner(), Some(O));
        assert_eq!(board([E, E, Some(O), E, Some(O), E, Some(O), E, E]).winner(), Some(O));
        assert_eq!(board([Some(X), Some(O), Some(X), E, E, E, E, E, E]).winner(), None);
        assert_eq!(board([Some(X), E, E, Some(X), E, E, Some(O), E, E]).winner(), None);
    }

    #[test]
    fn winner_iff_a_line_is_filled_by_one_side() {
        // every placement of at most three marks per side
        for x_mask in 0u32..(1 << 9) {
            if x_mask.count_ones() > 3 {
                continue;
            }
            for o_mask in 0u32..(1 << 9) {
                if o_mask.count_ones() > 3 || x_mask & o_mask != 0 {
                    continue;
                }
                let mut cells = [E; 9];
                for index in 0..9 {
                    if x_mask & (1 << index) != 0 {
                        cells[index] = Some(X);
                    } else if o_mask & (1 << index) != 0 {
                        cells[index] = Some(O);
                    }
                }
                let filled = |mask: u32| WIN_INDICES.iter().any(|line| line.iter().all(|&i| mask & (1 << i) != 0));
                if filled(x_mask) && filled(o_mask) {
                    // both sides cannot have completed a line in a real game
                    continue;
                }
                let expected = if filled(x_mask) {
                    Some(X)
                } else if filled(o_mask) {
                    Some(O)
                } else {
                    None
                };
                assert_eq!(board(cells).winner(), expected);
            }
        }
    }

    #[test]
    fn empty_cells_skip_occupied() {
        let b = board([Some(X), E, Some(O), E, Some(X), E, Some(O), E, E]);
        assert_eq!(b.empty_cells(), vec![1, 3, 5, 7, 8]);
        assert_eq!(b.count(X), 2);
        assert_eq!(b.count(O), 2);
    }

    #[test]
    fn lines_through_cells() {
        assert_eq!(LINES_THROUGH[CENTER].len(), 4);
        assert!(CORNERS.iter().all(|&corner| LINES_THROUGH[corner].len() == 3));
        assert_eq!(LINES_THROUGH[1].len(), 2);
        assert_eq!(LINES_THROUGH.iter().map(Vec::len).sum::<usize>(), 24);
    }

    #[test]
    fn winning_cells() {
        let b = board([Some(X), Some(X), E, Some(O), Some(O), E, E, E, E]);
        assert_eq!(b.winning_cells(X), vec![2]);
        assert_eq!(b.winning_cells(O), vec![5]);

        let fork = board([Some(X), E, E, E, Some(X), Some(X), E, E, E]);
        assert_eq!(fork.winning_cells(X), vec![3, 8]);
    }
}
