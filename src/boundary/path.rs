use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::EdgeSample;
use crate::math::{Point2, Time};
use crate::topology::{CellId, Halfedge, Vac};

use super::chain;
use super::cycle::{format_halfedges, format_vertex};
use super::{ProperCycle, ProperPath};

/// The shape of a [`Path`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PathBoundary {
    #[default]
    Invalid,
    /// A path reduced to one key vertex.
    SingleVertex(CellId),
    /// Open key halfedges chained end to start.
    OpenHalfedgeList(Vec<Halfedge>),
}

/// An open boundary made of key cells at one time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    boundary: PathBoundary,
}

impl Path {
    /// A path reduced to one key vertex.
    #[must_use]
    pub fn from_vertex(vertex: CellId) -> Self {
        Self {
            boundary: PathBoundary::SingleVertex(vertex),
        }
    }

    /// Chains an unordered set of open key edges, growing from both ends.
    ///
    /// The chain may end where it started.
    #[must_use]
    pub fn from_edges(edges: &[CellId], vac: &Vac) -> Self {
        Self::from_chain(chain::chain_path(edges, vac, true))
    }

    /// Builds a path from an ordered list of open halfedges.
    #[must_use]
    pub fn from_halfedges(halfedges: Vec<Halfedge>, vac: &Vac) -> Self {
        if halfedges.iter().any(|he| he.is_closed(vac)) || !chain::is_continuous(&halfedges, vac) {
            return Self::default();
        }
        Self::from_chain(halfedges)
    }

    /// Converts a proper path; invalid in, invalid out.
    #[must_use]
    pub fn from_proper_path(path: &ProperPath) -> Self {
        Self::from_chain(path.halfedges().to_vec())
    }

    /// Converts a proper cycle into a path ending where it starts.
    ///
    /// A cycle made of a single closed edge has no vertex to start from and
    /// gives an invalid path.
    #[must_use]
    pub fn from_proper_cycle(cycle: &ProperCycle, vac: &Vac) -> Self {
        match cycle.halfedges() {
            [he] if he.is_closed(vac) => Self::default(),
            hes => Self::from_chain(hes.to_vec()),
        }
    }

    fn from_chain(halfedges: Vec<Halfedge>) -> Self {
        let boundary = if halfedges.is_empty() {
            PathBoundary::Invalid
        } else {
            PathBoundary::OpenHalfedgeList(halfedges)
        };
        Self { boundary }
    }

    /// The shape of the path.
    #[must_use]
    pub fn boundary(&self) -> &PathBoundary {
        &self.boundary
    }

    /// Returns `true` unless the path is [`PathBoundary::Invalid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self.boundary, PathBoundary::Invalid)
    }

    /// The vertex of a single-vertex path.
    #[must_use]
    pub fn single_vertex(&self) -> Option<CellId> {
        match self.boundary {
            PathBoundary::SingleVertex(v) => Some(v),
            _ => None,
        }
    }

    /// The halfedges of the path; empty for vertex and invalid paths.
    #[must_use]
    pub fn halfedges(&self) -> &[Halfedge] {
        match &self.boundary {
            PathBoundary::OpenHalfedgeList(hes) => hes,
            PathBoundary::Invalid | PathBoundary::SingleVertex(_) => &[],
        }
    }

    /// Number of halfedges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.halfedges().len()
    }

    /// Returns `true` if the path holds no halfedge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.halfedges().is_empty()
    }

    /// Time of the path, `None` when invalid.
    #[must_use]
    pub fn time(&self, vac: &Vac) -> Option<Time> {
        match &self.boundary {
            PathBoundary::Invalid => None,
            PathBoundary::SingleVertex(v) => vac.key_time(*v),
            PathBoundary::OpenHalfedgeList(hes) => hes.first().and_then(|he| he.time(vac)),
        }
    }

    /// First vertex of the path.
    #[must_use]
    pub fn start_vertex(&self, vac: &Vac) -> Option<CellId> {
        match &self.boundary {
            PathBoundary::Invalid => None,
            PathBoundary::SingleVertex(v) => Some(*v),
            PathBoundary::OpenHalfedgeList(hes) => hes.first().and_then(|he| he.start_vertex(vac)),
        }
    }

    /// Last vertex of the path.
    #[must_use]
    pub fn end_vertex(&self, vac: &Vac) -> Option<CellId> {
        match &self.boundary {
            PathBoundary::Invalid => None,
            PathBoundary::SingleVertex(v) => Some(*v),
            PathBoundary::OpenHalfedgeList(hes) => hes.last().and_then(|he| he.end_vertex(vac)),
        }
    }

    /// Key cells of the path, end vertex included.
    #[must_use]
    pub fn cells(&self, vac: &Vac) -> HashSet<CellId> {
        match &self.boundary {
            PathBoundary::Invalid => HashSet::new(),
            PathBoundary::SingleVertex(v) => HashSet::from([*v]),
            PathBoundary::OpenHalfedgeList(hes) => {
                let mut cells = chain::chain_cells(hes, vac);
                cells.extend(self.end_vertex(vac));
                cells
            }
        }
    }

    /// Total arclength; 0 for vertex and invalid paths.
    #[must_use]
    pub fn length(&self, vac: &Vac) -> f64 {
        chain::length(self.halfedges(), vac)
    }

    /// `n` samples with widths, evenly spaced by arclength from the start
    /// vertex to the end vertex.
    #[must_use]
    pub fn sample_edge_samples(&self, n: usize, vac: &Vac) -> Vec<EdgeSample> {
        match &self.boundary {
            PathBoundary::Invalid => Vec::new(),
            PathBoundary::SingleVertex(v) => {
                let pos = vac.key_vertex(*v).map_or(Point2::origin(), |data| data.pos);
                vec![EdgeSample::at(pos); n]
            }
            PathBoundary::OpenHalfedgeList(hes) => chain::sample(hes, n, vac),
        }
    }

    /// `n` positions evenly spaced by arclength.
    #[must_use]
    pub fn sample(&self, n: usize, vac: &Vac) -> Vec<Point2> {
        self.sample_edge_samples(n, vac)
            .iter()
            .map(EdgeSample::pos)
            .collect()
    }

    /// The same path traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let boundary = match &self.boundary {
            PathBoundary::OpenHalfedgeList(hes) => PathBoundary::OpenHalfedgeList(chain::reversed(hes)),
            other => other.clone(),
        };
        Self { boundary }
    }

    /// Retargets a single-vertex path on `old` to `new`.
    pub fn replace_vertex(&mut self, old: CellId, new: CellId) {
        if self.boundary == PathBoundary::SingleVertex(old) {
            self.boundary = PathBoundary::SingleVertex(new);
        }
    }

    /// Retargets the halfedges over `old.edge` to `new.edge`.
    pub fn replace_halfedge(&mut self, old: Halfedge, new: Halfedge) {
        if let PathBoundary::OpenHalfedgeList(hes) = &mut self.boundary {
            chain::replace_halfedge(hes, old, new);
        }
    }

    /// Replaces the edge `old` by the ordered chain `new_edges`.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId]) {
        if let PathBoundary::OpenHalfedgeList(hes) = &mut self.boundary {
            *hes = chain::splice_edges(hes, old, new_edges);
        }
    }

    /// Text form: `[e1+ e2- ...]`, or `[v]` for a single vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced cell is no longer in `vac`.
    pub fn to_text(&self, vac: &Vac) -> Result<String> {
        match &self.boundary {
            PathBoundary::SingleVertex(v) => format_vertex(*v, vac),
            _ => format_halfedges(self.halfedges(), vac),
        }
    }
}
