use std::collections::HashSet;
use std::ops::Index;

use crate::math::Time;
use crate::topology::{CellId, Halfedge, Vac};

use super::chain;

/// An open chain of key halfedges at one time, used for the cracks of a
/// hole boundary.
///
/// The chain holds no closed edge and its two end vertices are distinct.
/// Vertices may repeat in between. An empty chain means the path is invalid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProperPath {
    halfedges: Vec<Halfedge>,
}

impl ProperPath {
    /// Chains an unordered set of open key edges, growing from both ends.
    #[must_use]
    pub fn from_edges(edges: &[CellId], vac: &Vac) -> Self {
        Self {
            halfedges: chain::chain_path(edges, vac, false),
        }
    }

    /// Returns `true` if the path holds at least one halfedge.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.halfedges.is_empty()
    }

    /// Number of halfedges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// Returns `true` for invalid paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// The ordered halfedges.
    #[must_use]
    pub fn halfedges(&self) -> &[Halfedge] {
        &self.halfedges
    }

    /// Time of the path, `None` when invalid.
    #[must_use]
    pub fn time(&self, vac: &Vac) -> Option<Time> {
        self.halfedges.first().and_then(|he| he.time(vac))
    }

    /// Vertices and edges of the path, end vertex included.
    #[must_use]
    pub fn cells(&self, vac: &Vac) -> HashSet<CellId> {
        let mut cells = chain::chain_cells(&self.halfedges, vac);
        if let Some(v) = self.halfedges.last().and_then(|he| he.end_vertex(vac)) {
            cells.insert(v);
        }
        cells
    }

    /// Replaces `old` by the ordered chain `new_edges`.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId]) {
        self.halfedges = chain::splice_edges(&self.halfedges, old, new_edges);
    }
}

impl Index<usize> for ProperPath {
    type Output = Halfedge;

    fn index(&self, i: usize) -> &Halfedge {
        &self.halfedges[i]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{closed_loop, polygon};

    #[test]
    fn grows_from_both_ends() {
        let mut vac = Vac::new();
        let (vertices, edges) = polygon(&mut vac, Time::from_frame(0), 5);
        // seeded in the middle, so the walk must prepend as well as append
        let path = ProperPath::from_edges(&[edges[2], edges[3], edges[1], edges[0]], &vac);

        assert!(path.is_valid());
        assert_eq!(path.len(), 4);
        assert_eq!(path[0].start_vertex(&vac), Some(vertices[0]));
        assert_eq!(path[3].end_vertex(&vac), Some(vertices[4]));
        assert_eq!(path.cells(&vac).len(), 9);
    }

    #[test]
    fn looping_or_closed_is_invalid() {
        let mut vac = Vac::new();
        let (_, edges) = polygon(&mut vac, Time::from_frame(0), 3);
        assert!(!ProperPath::from_edges(&edges, &vac).is_valid());

        let ring = closed_loop(&mut vac, Time::from_frame(0));
        assert!(!ProperPath::from_edges(&[ring], &vac).is_valid());
    }

    #[test]
    fn disconnected_is_invalid() {
        let mut vac = Vac::new();
        let (_, edges) = polygon(&mut vac, Time::from_frame(0), 6);
        assert!(!ProperPath::from_edges(&[edges[0], edges[3]], &vac).is_valid());
    }
}
