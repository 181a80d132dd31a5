/// Live marks a side may keep on the board.
pub const MAX_LIVE_MARKS: usize = 3;

/// Placement order of one side's live marks, oldest first.
///
/// Holds one extra slot: a fourth mark that completes a line is never
/// evicted, so a finished game may carry four entries. Unused slots stay
/// zeroed so that derived `Hash`/`Eq` only see the live prefix.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct MoveHistory {
    cells: [u8; MAX_LIVE_MARKS + 1],
    len: u8,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from cell indices, oldest first. Returns `None` if
    /// there are more than four entries or an index is not a cell.
    pub fn from_cells(cells: &[usize]) -> Option<Self> {
        if cells.len() > MAX_LIVE_MARKS + 1 {
            return None;
        }
        let mut history = Self::new();
        for &cell in cells {
            if cell >= crate::board::CELL_COUNT {
                return None;
            }
            history.push_back(cell);
        }
        Some(history)
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item=usize> + '_ {
        self.cells[..self.len()].iter().map(|&cell| usize::from(cell))
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.iter().any(|c| c == cell)
    }

    pub fn oldest(&self) -> Option<usize> {
        self.iter().next()
    }

    /// The mark that disappears on this side's next non-winning placement.
    pub fn next_to_vanish(&self) -> Option<usize> {
        if self.len() == MAX_LIVE_MARKS {
            self.oldest()
        } else {
            None
        }
    }

    pub(crate) fn push_back(&mut self, cell: usize) {
        debug_assert!(self.len() <= MAX_LIVE_MARKS, "history overflow");
        let len = self.len();
        self.cells[len] = cell as u8;
        self.len += 1;
    }

    pub(crate) fn pop_front(&mut self) -> Option<usize> {
        let oldest = self.oldest()?;
        let len = self.len();
        self.cells.copy_within(1..len, 0);
        self.cells[len - 1] = 0;
        self.len -= 1;
        Some(oldest)
    }
}
