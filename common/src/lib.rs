//! A knowledge-based Minesweeper player.
//!
//! The agent never sees the mine layout. It is told, for every cell it
//! reveals, how many of that cell's neighbours are mines, and turns each
//! report into a [`Constraint`]. The [`KnowledgeStore`] closes those
//! constraints to a fixpoint, extracting every cell that is certainly a mine
//! or certainly safe, and the [`Agent`] picks its next move from the result.

pub mod agent;
pub mod board;
pub mod constraint;
pub mod knowledge;

pub use agent::Agent;
pub use board::Board;
pub use constraint::Constraint;
pub use knowledge::KnowledgeStore;

use itertools::Itertools;

/// A coordinate on the board, zero-based from the top-left corner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cannot place {mines} mines on a board of {cells} cells")]
    TooManyMines { mines: usize, cells: usize },

    #[error("state codec: {0}")]
    Codec(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<bcs::Error> for Error {
    fn from(err: bcs::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

/// Every cell of a `height` x `width` board, row by row.
pub fn all_cells(height: usize, width: usize) -> impl Iterator<Item = Cell> {
    (0..height)
        .cartesian_product(0..width)
        .map(|(row, col)| Cell { row, col })
}

/// The in-bounds cells surrounding `cell`, not including `cell` itself.
/// Edges and corners yield five and three neighbours respectively.
pub fn neighbors(cell: Cell, height: usize, width: usize) -> impl Iterator<Item = Cell> {
    (-1isize..=1).flat_map(move |dr| {
        (-1isize..=1).filter_map(move |dc| {
            if dr == 0 && dc == 0 {
                return None;
            }

            let row = cell.row.checked_add_signed(dr)?;
            let col = cell.col.checked_add_signed(dc)?;

            if row < height && col < width {
                Some(Cell { row, col })
            } else {
                None
            }
        })
    })
}

/// Rejects cells that do not fit on a `height` x `width` board.
pub(crate) fn check_bounds(cell: Cell, height: usize, width: usize) -> Result<()> {
    if cell.row < height && cell.col < width {
        Ok(())
    } else {
        Err(Error::OutOfBounds {
            cell,
            height,
            width,
        })
    }
}
