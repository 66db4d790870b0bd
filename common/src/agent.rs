use crate::{Cell, Constraint, KnowledgeStore, Result, all_cells, check_bounds, neighbors};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use tracing::debug;

/// A player that only acts on what it can prove.
///
/// Each revealed cell becomes a constraint over its unexplored neighbours.
/// After every observation the store is closed to a fixpoint and then
/// extended once with whatever the subset rule derives; anything those new
/// constraints imply is picked up by the next observation's closure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Agent {
    pub height: usize,
    pub width: usize,
    store: KnowledgeStore,
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Self {
        Agent {
            height,
            width,
            store: KnowledgeStore::new(),
        }
    }

    /// Restores an agent from bytes produced by [`Agent::serialize`].
    pub fn deserialize(bts: &[u8]) -> Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        self.store.moves_made()
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        self.store.safes()
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        self.store.mines()
    }

    /// Takes in the board's answer for a revealed cell: `count` of its
    /// neighbours are mines.
    ///
    /// Out-of-bounds cells are rejected before anything is recorded.
    pub fn observe(&mut self, cell: Cell, count: usize) -> Result<()> {
        check_bounds(cell, self.height, self.width)?;

        self.store.record_move(cell);
        self.store.mark_safe(cell);

        // Neighbours already resolved stay in; closure strips them.
        let hidden: Vec<Cell> = neighbors(cell, self.height, self.width)
            .filter(|neighbor| !self.store.moves_made().contains(neighbor))
            .collect();
        if !hidden.is_empty() {
            self.store.add_constraint(Constraint::new(hidden, count));
        }

        self.store.close();

        let derived = self.store.resolve();
        let added = self.store.extend(derived);

        debug!(
            %cell,
            count,
            added,
            mines = self.mines().len(),
            safes = self.safes().len(),
            "observed"
        );
        Ok(())
    }

    /// A cell proven safe that has not been played yet, if any.
    /// Callers should not depend on which one comes back when several qualify.
    pub fn safe_move(&self) -> Option<Cell> {
        self.safes()
            .difference(self.moves_made())
            .min()
            .copied()
    }

    /// A uniformly random cell that is not played and not known either way.
    /// `None` once every cell is played or deduced.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let unknown: Vec<Cell> = all_cells(self.height, self.width)
            .filter(|cell| {
                !self.moves_made().contains(cell)
                    && !self.mines().contains(cell)
                    && !self.safes().contains(cell)
            })
            .collect();

        unknown.choose(rng).copied()
    }
}
