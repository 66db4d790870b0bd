use crate::Cell;
use std::collections::HashSet;

/// A statement about the board: exactly `count` of `cells` are mines.
///
/// Equality is structural, so two constraints over the same cells with the
/// same count are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Constraint {
    pub cells: HashSet<Cell>,
    pub count: usize,
}

impl Constraint {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        Constraint {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    /// A constraint over no cells says nothing and can be dropped.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every cell is a mine when the count covers the whole set.
    pub fn known_mines(&self) -> Option<&HashSet<Cell>> {
        if !self.cells.is_empty() && self.count == self.cells.len() {
            Some(&self.cells)
        } else {
            None
        }
    }

    /// Every cell is safe when the count is zero.
    pub fn known_safes(&self) -> Option<&HashSet<Cell>> {
        if !self.cells.is_empty() && self.count == 0 {
            Some(&self.cells)
        } else {
            None
        }
    }

    /// Drops a cell now known to be a mine, taking its mine out of the count.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count = self.count.saturating_sub(1);
        }
    }

    /// Drops a cell now known to be safe.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// The subset rule: if `self` is contained in `other`, the cells `other`
    /// has beyond `self` hold the mines `other` has beyond `self`.
    ///
    /// Returns `None` when `self` is not a subset, when nothing is left over,
    /// or when the counts cannot be reconciled.
    pub fn subtract_from(&self, other: &Constraint) -> Option<Constraint> {
        if !self.cells.is_subset(&other.cells) {
            return None;
        }

        let cells: HashSet<Cell> = other.cells.difference(&self.cells).copied().collect();
        if cells.is_empty() {
            return None;
        }

        let count = other.count.checked_sub(self.count)?;
        Some(Constraint { cells, count })
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut cells: Vec<&Cell> = self.cells.iter().collect();
        cells.sort();
        write!(f, "{{")?;
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "}} = {}", self.count)
    }
}
