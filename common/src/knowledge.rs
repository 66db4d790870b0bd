use crate::{Cell, Constraint};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Everything the agent has learned about one game.
///
/// `moves_made`, `safes` and `mines` only ever grow. `knowledge` holds the
/// live constraints; it gains entries from observations and resolution and
/// loses them once they are consumed down to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KnowledgeStore {
    moves_made: HashSet<Cell>,
    safes: HashSet<Cell>,
    mines: HashSet<Cell>,
    knowledge: Vec<Constraint>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &[Constraint] {
        &self.knowledge
    }

    pub fn record_move(&mut self, cell: Cell) {
        self.moves_made.insert(cell);
    }

    /// Records `cell` as a mine and removes it from every live constraint.
    pub fn mark_mine(&mut self, cell: Cell) {
        debug_assert!(!self.safes.contains(&cell), "{cell} is already known safe");
        if self.mines.insert(cell) {
            trace!(%cell, "deduced mine");
        }
        for constraint in &mut self.knowledge {
            constraint.mark_mine(cell);
        }
    }

    /// Records `cell` as safe and removes it from every live constraint.
    pub fn mark_safe(&mut self, cell: Cell) {
        debug_assert!(!self.mines.contains(&cell), "{cell} is already known to be a mine");
        if self.safes.insert(cell) {
            trace!(%cell, "deduced safe");
        }
        for constraint in &mut self.knowledge {
            constraint.mark_safe(cell);
        }
    }

    /// Appends a constraint unless it is empty or already present.
    /// Returns whether the knowledge list changed.
    pub fn add_constraint(&mut self, constraint: Constraint) -> bool {
        if constraint.is_empty() || self.knowledge.contains(&constraint) {
            return false;
        }
        self.knowledge.push(constraint);
        true
    }

    /// Appends every new constraint, returning how many were kept.
    pub fn extend(&mut self, constraints: impl IntoIterator<Item = Constraint>) -> usize {
        let mut added = 0;
        for constraint in constraints {
            if self.add_constraint(constraint) {
                added += 1;
            }
        }
        added
    }

    /// Drives the store to a fixpoint: afterwards no live constraint is empty,
    /// none asserts that all of its cells are mines or all are safe, and none
    /// mentions a cell already in `mines` or `safes`.
    ///
    /// Returns the number of passes taken; the last pass is the one that made
    /// no progress, so an already-closed store reports 1.
    pub fn close(&mut self) -> usize {
        self.normalize();

        let mut passes = 0;
        loop {
            passes += 1;
            let mut progress = self.prune();

            // Facts read from the snapshot are applied to the live list, so
            // one deduction can shrink constraints later in the same pass.
            let snapshot = self.knowledge.clone();
            for constraint in &snapshot {
                if let Some(mines) = constraint.known_mines() {
                    for &cell in mines {
                        self.mark_mine(cell);
                    }
                    progress = true;
                }

                if let Some(safes) = constraint.known_safes() {
                    for &cell in safes {
                        self.mark_safe(cell);
                    }
                    progress = true;
                }
            }

            if !progress {
                break;
            }
        }

        debug!(
            passes,
            constraints = self.knowledge.len(),
            mines = self.mines.len(),
            safes = self.safes.len(),
            "knowledge closed"
        );
        passes
    }

    /// Derives new constraints with the subset rule over every ordered pair
    /// of distinct live constraints. The store itself is left untouched.
    pub fn resolve(&self) -> Vec<Constraint> {
        let derived: Vec<Constraint> = self
            .knowledge
            .iter()
            .cartesian_product(self.knowledge.iter())
            .filter(|(subset, superset)| subset != superset)
            .filter_map(|(subset, superset)| subset.subtract_from(superset))
            .collect();

        debug!(derived = derived.len(), "resolution finished");
        derived
    }

    /// Strips already-known cells out of every constraint. Observations may
    /// add constraints mentioning neighbours that were resolved earlier.
    fn normalize(&mut self) {
        let Self {
            safes,
            mines,
            knowledge,
            ..
        } = self;

        for constraint in knowledge.iter_mut() {
            let known: Vec<Cell> = constraint
                .cells
                .iter()
                .filter(|&cell| mines.contains(cell) || safes.contains(cell))
                .copied()
                .collect();

            for cell in known {
                if mines.contains(&cell) {
                    constraint.mark_mine(cell);
                } else {
                    constraint.mark_safe(cell);
                }
            }
        }
    }

    /// Drops empty and duplicate constraints, reporting whether any went.
    fn prune(&mut self) -> bool {
        let before = self.knowledge.len();
        let mut kept: Vec<Constraint> = Vec::with_capacity(before);
        for constraint in self.knowledge.drain(..) {
            if !constraint.is_empty() && !kept.contains(&constraint) {
                kept.push(constraint);
            }
        }
        self.knowledge = kept;
        self.knowledge.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn constraint(points: &[(usize, usize)], count: usize) -> Constraint {
        Constraint::new(points.iter().map(|&(row, col)| c(row, col)), count)
    }

    #[test]
    fn test_full_set_mine_rule() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0), (0, 1)], 2));
        store.close();

        assert_eq!(store.mines(), &HashSet::from([c(0, 0), c(0, 1)]));
        assert!(store.safes().is_empty());
        assert!(store.knowledge().is_empty());
    }

    #[test]
    fn test_vacuous_safe_rule() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0), (0, 1), (0, 2)], 0));
        store.add_constraint(constraint(&[(0, 2), (1, 2), (2, 2)], 1));
        store.close();

        assert_eq!(store.safes(), &HashSet::from([c(0, 0), c(0, 1), c(0, 2)]));
        assert_eq!(store.knowledge(), &[constraint(&[(1, 2), (2, 2)], 1)]);
    }

    #[test]
    fn test_cascading_deduction() {
        // (0,0) being a mine leaves {(0,1)} = 0, which frees (0,1), which
        // leaves {(0,2)} = 1.
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 1), (0, 2)], 1));
        store.add_constraint(constraint(&[(0, 0), (0, 1)], 1));
        store.add_constraint(constraint(&[(0, 0)], 1));
        store.close();

        assert_eq!(store.mines(), &HashSet::from([c(0, 0), c(0, 2)]));
        assert_eq!(store.safes(), &HashSet::from([c(0, 1)]));
        assert!(store.knowledge().is_empty());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0), (0, 1), (0, 2)], 1));
        store.add_constraint(constraint(&[(1, 0), (1, 1)], 2));
        store.add_constraint(constraint(&[(1, 1), (2, 1)], 1));
        store.close();
        let closed = store.clone();

        assert_eq!(store.close(), 1);
        assert_eq!(store, closed);
    }

    #[test]
    fn test_empty_constraints_are_pruned() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0)], 0));
        store.add_constraint(constraint(&[(0, 0), (0, 1)], 1));
        store.close();

        assert!(store.knowledge().iter().all(|k| !k.is_empty()));
        assert_eq!(store.mines(), &HashSet::from([c(0, 1)]));

        // Marking more cells never brings an empty constraint back.
        store.mark_safe(c(3, 3));
        store.close();
        assert!(store.knowledge().is_empty());
    }

    #[test]
    fn test_add_constraint_deduplicates() {
        let mut store = KnowledgeStore::new();
        assert!(store.add_constraint(constraint(&[(0, 0), (0, 1)], 1)));
        assert!(!store.add_constraint(constraint(&[(0, 1), (0, 0)], 1)));
        assert!(!store.add_constraint(constraint(&[], 0)));
        assert_eq!(store.knowledge().len(), 1);
    }

    #[test]
    fn test_close_strips_known_cells() {
        let mut store = KnowledgeStore::new();
        store.mark_mine(c(0, 0));
        store.mark_safe(c(0, 1));
        store.add_constraint(constraint(&[(0, 0), (0, 1), (0, 2), (0, 3)], 2));
        store.close();

        assert_eq!(store.knowledge(), &[constraint(&[(0, 2), (0, 3)], 1)]);
    }

    #[test]
    fn test_resolution_then_closure_finds_mine() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 1), (0, 2)], 1));
        store.add_constraint(constraint(&[(0, 1), (0, 2), (0, 3)], 2));

        let derived = store.resolve();
        assert_eq!(derived, vec![constraint(&[(0, 3)], 1)]);

        store.extend(derived);
        store.close();
        assert!(store.mines().contains(&c(0, 3)));
        assert!(!store.safes().contains(&c(0, 3)));
    }

    #[test]
    fn test_overlapping_constraints_resolve_to_safe() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0), (0, 1)], 1));
        store.add_constraint(constraint(&[(0, 0), (0, 1), (0, 2)], 1));

        let derived = store.resolve();
        assert_eq!(derived, vec![constraint(&[(0, 2)], 0)]);

        store.extend(derived);
        store.close();
        assert_eq!(store.safes(), &HashSet::from([c(0, 2)]));
        assert!(store.mines().is_empty());
    }

    #[test]
    fn test_resolve_does_not_mutate() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0), (0, 1)], 1));
        store.add_constraint(constraint(&[(0, 0), (0, 1), (1, 1)], 1));
        let before = store.clone();

        store.resolve();
        assert_eq!(store, before);
    }

    #[test]
    fn test_resolve_without_subsets_is_empty() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0), (0, 1)], 1));
        store.add_constraint(constraint(&[(0, 1), (0, 2)], 1));
        assert!(store.resolve().is_empty());
    }

    #[test]
    fn test_extend_counts_new_constraints() {
        let mut store = KnowledgeStore::new();
        store.add_constraint(constraint(&[(0, 0)], 1));
        let added = store.extend(vec![
            constraint(&[(0, 0)], 1),
            constraint(&[(1, 1)], 0),
            constraint(&[(1, 1)], 0),
        ]);
        assert_eq!(added, 1);
        assert_eq!(store.knowledge().len(), 2);
    }
}
