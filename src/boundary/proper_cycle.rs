use std::collections::HashSet;
use std::ops::Index;

use crate::math::Time;
use crate::topology::{CellId, Halfedge, Vac};

use super::chain;

/// A simple closed chain of key halfedges at one time.
///
/// Either a single closed halfedge, or open halfedges where each one ends at
/// the start vertex of the next (cyclically) and no start vertex repeats. An
/// empty chain means the cycle is invalid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProperCycle {
    halfedges: Vec<Halfedge>,
}

impl ProperCycle {
    /// Chains an unordered set of key edges into a simple loop.
    ///
    /// The result is invalid if the set is empty, spans several times,
    /// mixes a closed edge with other edges, or does not form exactly one
    /// simple loop.
    #[must_use]
    pub fn from_edges(edges: &[CellId], vac: &Vac) -> Self {
        Self {
            halfedges: chain::chain_loop(edges, vac),
        }
    }

    /// Returns `true` if the cycle holds at least one halfedge.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.halfedges.is_empty()
    }

    /// Number of halfedges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// Returns `true` for invalid cycles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// The ordered halfedges.
    #[must_use]
    pub fn halfedges(&self) -> &[Halfedge] {
        &self.halfedges
    }

    /// Time of the cycle, `None` when invalid.
    #[must_use]
    pub fn time(&self, vac: &Vac) -> Option<Time> {
        self.halfedges.first().and_then(|he| he.time(vac))
    }

    /// Vertices and edges of the cycle.
    #[must_use]
    pub fn cells(&self, vac: &Vac) -> HashSet<CellId> {
        chain::chain_cells(&self.halfedges, vac)
    }

    /// Replaces `old` by the ordered chain `new_edges`.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId]) {
        self.halfedges = chain::splice_edges(&self.halfedges, old, new_edges);
    }
}

impl Index<usize> for ProperCycle {
    type Output = Halfedge;

    fn index(&self, i: usize) -> &Halfedge {
        &self.halfedges[i]
    }
}
