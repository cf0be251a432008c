//! Reachability over the tile connectivity graph.
//!
//! Two neighbouring cells are connected when both tiles open onto their
//! shared border. Connectivity changes with every shift, so reachability is
//! always recomputed from the current grid.

use std::collections::{BTreeSet, VecDeque};

use rustc_hash::FxHashSet;

use super::grid::{Board, BoardError, Pos};
use crate::tiles::Edge;

impl Board {
    /// Cells reachable from `start`, including `start` itself.
    ///
    /// Fails with `OutOfBounds` or `NotFloor` when `start` is not a floor tile.
    pub fn reachable_from(&self, start: Pos) -> Result<BTreeSet<Pos>, BoardError> {
        self.reachable_avoiding(start, |_| false)
    }

    /// Like `reachable_from`, but never enters a cell for which `blocked`
    /// returns true. The start cell is always included.
    pub fn reachable_avoiding(
        &self,
        start: Pos,
        blocked: impl Fn(Pos) -> bool,
    ) -> Result<BTreeSet<Pos>, BoardError> {
        self.floor_at(start)?;

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for next in self.open_neighbours(pos) {
                if !blocked(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Ok(seen.into_iter().collect())
    }

    /// Neighbouring positions joined to `pos` by a mutually open edge.
    pub fn open_neighbours(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Edge::ALL.into_iter().filter_map(move |edge| {
            let here = self.floor_at(pos).ok()?;
            let next = self.neighbour(pos, edge)?;
            let there = self.floor_at(next).ok()?;
            here.connects_to(edge, there).then_some(next)
        })
    }
}
