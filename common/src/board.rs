use crate::{Cell, Error, Result, all_cells, check_bounds, neighbors};
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::HashSet;

/// The hidden ground truth of a game: where the mines are.
///
/// The agent never reads this directly. A driver asks the board about each
/// cell the agent picks and reports the answer back through
/// [`Agent::observe`](crate::Agent::observe).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Board {
    pub height: usize,
    pub width: usize,
    mines: HashSet<Cell>,
    /// Cells the player has flagged as mines.
    pub mines_found: HashSet<Cell>,
}

impl Board {
    /// Places `mines` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let cells = height * width;
        if mines > cells {
            return Err(Error::TooManyMines { mines, cells });
        }

        let mines = all_cells(height, width).choose_multiple(rng, mines);
        Self::with_mines(height, width, mines)
    }

    /// Builds a board with a fixed mine layout.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self> {
        let mines = mines
            .into_iter()
            .map(|cell| check_bounds(cell, height, width).map(|_| cell))
            .collect::<Result<HashSet<Cell>>>()?;

        Ok(Board {
            height,
            width,
            mines,
            mines_found: HashSet::new(),
        })
    }

    pub fn deserialize(bts: &[u8]) -> Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        check_bounds(cell, self.height, self.width).is_ok()
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    /// Number of mines among the up-to-eight cells touching `cell`.
    pub fn adjacent_mine_count(&self, cell: Cell) -> usize {
        neighbors(cell, self.height, self.width)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count()
    }

    pub fn flag(&mut self, cell: Cell) {
        self.mines_found.insert(cell);
    }

    /// Won once the flagged cells are exactly the mines.
    pub fn won(&self) -> bool {
        self.mines_found == self.mines
    }
}

/// Draws the mine layout, `X` for a mine.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = format!("{}-", "--".repeat(self.width));
        for row in 0..self.height {
            writeln!(f, "{}", rule)?;
            for col in 0..self.width {
                let mark = if self.is_mine(Cell { row, col }) { 'X' } else { ' ' };
                write!(f, "|{}", mark)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", rule)
    }
}
