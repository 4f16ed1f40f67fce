use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::EdgeSample;
use crate::math::polyline_2d::closed_loop_turning;
use crate::math::{Point2, Time};
use crate::topology::{CellId, Halfedge, Vac};

use super::chain;
use super::ProperCycle;

/// The shape of a [`Cycle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CycleBoundary {
    #[default]
    Invalid,
    /// A boundary pinched to one key vertex.
    SingleVertex(CellId),
    /// A closed key edge traversed once.
    ClosedHalfedge(Halfedge),
    /// Open key halfedges chained end to start, the last one closing back
    /// onto the first.
    OpenHalfedgeList(Vec<Halfedge>),
}

/// A closed boundary of a key face.
///
/// `s0` in `[0, 1)` rotates where [`Cycle::sample`] starts along the loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cycle {
    boundary: CycleBoundary,
    s0: f64,
}

impl Cycle {
    /// A cycle reduced to one key vertex.
    #[must_use]
    pub fn from_vertex(vertex: CellId) -> Self {
        Self {
            boundary: CycleBoundary::SingleVertex(vertex),
            s0: 0.0,
        }
    }

    /// Chains an unordered set of key edges into a simple loop.
    ///
    /// Same contract as [`ProperCycle::from_edges`].
    #[must_use]
    pub fn from_edges(edges: &[CellId], vac: &Vac) -> Self {
        Self::from_chain(chain::chain_loop(edges, vac), vac)
    }

    /// Builds a cycle from an ordered list of halfedges.
    ///
    /// Only continuity and closure are checked, and a closed halfedge is
    /// accepted only on its own. The list is trusted to be simple.
    #[must_use]
    pub fn from_halfedges(halfedges: Vec<Halfedge>, vac: &Vac) -> Self {
        let valid = match halfedges.as_slice() {
            [] => false,
            [he] if he.is_closed(vac) => true,
            hes => {
                hes.iter().all(|he| !he.is_closed(vac))
                    && chain::is_continuous(hes, vac)
                    && chain::closes(hes, vac)
            }
        };
        if valid {
            Self::from_chain(halfedges, vac)
        } else {
            Self::default()
        }
    }

    /// Converts a proper cycle; invalid in, invalid out.
    #[must_use]
    pub fn from_proper_cycle(cycle: &ProperCycle, vac: &Vac) -> Self {
        Self::from_chain(cycle.halfedges().to_vec(), vac)
    }

    fn from_chain(halfedges: Vec<Halfedge>, vac: &Vac) -> Self {
        let boundary = match halfedges.as_slice() {
            [] => CycleBoundary::Invalid,
            [he] if he.is_closed(vac) => CycleBoundary::ClosedHalfedge(*he),
            _ => CycleBoundary::OpenHalfedgeList(halfedges),
        };
        Self { boundary, s0: 0.0 }
    }

    /// The shape of the cycle.
    #[must_use]
    pub fn boundary(&self) -> &CycleBoundary {
        &self.boundary
    }

    /// Returns `true` unless the cycle is [`CycleBoundary::Invalid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self.boundary, CycleBoundary::Invalid)
    }

    /// The vertex of a single-vertex cycle.
    #[must_use]
    pub fn single_vertex(&self) -> Option<CellId> {
        match self.boundary {
            CycleBoundary::SingleVertex(v) => Some(v),
            _ => None,
        }
    }

    /// The halfedge of a closed-halfedge cycle.
    #[must_use]
    pub fn closed_halfedge(&self) -> Option<Halfedge> {
        match self.boundary {
            CycleBoundary::ClosedHalfedge(he) => Some(he),
            _ => None,
        }
    }

    /// The halfedges of the cycle; empty for vertex and invalid cycles.
    #[must_use]
    pub fn halfedges(&self) -> &[Halfedge] {
        match &self.boundary {
            CycleBoundary::ClosedHalfedge(he) => std::slice::from_ref(he),
            CycleBoundary::OpenHalfedgeList(hes) => hes,
            CycleBoundary::Invalid | CycleBoundary::SingleVertex(_) => &[],
        }
    }

    /// Number of halfedges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.halfedges().len()
    }

    /// Returns `true` if the cycle holds no halfedge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.halfedges().is_empty()
    }

    /// Time of the cycle, `None` when invalid.
    #[must_use]
    pub fn time(&self, vac: &Vac) -> Option<Time> {
        match &self.boundary {
            CycleBoundary::Invalid => None,
            CycleBoundary::SingleVertex(v) => vac.key_time(*v),
            CycleBoundary::ClosedHalfedge(he) => he.time(vac),
            CycleBoundary::OpenHalfedgeList(hes) => hes.first().and_then(|he| he.time(vac)),
        }
    }

    /// Key cells of the cycle.
    #[must_use]
    pub fn cells(&self, vac: &Vac) -> HashSet<CellId> {
        match &self.boundary {
            CycleBoundary::Invalid => HashSet::new(),
            CycleBoundary::SingleVertex(v) => HashSet::from([*v]),
            CycleBoundary::ClosedHalfedge(he) => HashSet::from([he.edge]),
            CycleBoundary::OpenHalfedgeList(hes) => chain::chain_cells(hes, vac),
        }
    }

    /// Starting offset of the sampling, in `[0, 1)`.
    #[must_use]
    pub fn s0(&self) -> f64 {
        self.s0
    }

    /// Sets the starting offset of the sampling.
    pub fn set_starting_point(&mut self, s0: f64) {
        self.s0 = s0;
    }

    /// Total arclength; 0 for vertex and invalid cycles.
    #[must_use]
    pub fn length(&self, vac: &Vac) -> f64 {
        chain::length(self.halfedges(), vac)
    }

    /// `n` samples with widths, evenly spaced by arclength and rotated by
    /// the starting offset.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn sample_edge_samples(&self, n: usize, vac: &Vac) -> Vec<EdgeSample> {
        match &self.boundary {
            CycleBoundary::Invalid => Vec::new(),
            CycleBoundary::SingleVertex(v) => {
                let pos = vac.key_vertex(*v).map_or(Point2::origin(), |data| data.pos);
                vec![EdgeSample::at(pos); n]
            }
            CycleBoundary::ClosedHalfedge(_) | CycleBoundary::OpenHalfedgeList(_) => {
                let mut samples = chain::sample(self.halfedges(), n, vac);
                if n > 0 {
                    let i0 = (n as f64 * self.s0 + 0.5).floor().clamp(0.0, (n - 1) as f64);
                    samples.rotate_left(i0 as usize);
                }
                samples
            }
        }
    }

    /// `n` positions evenly spaced by arclength and rotated by the starting
    /// offset.
    ///
    /// Without rotation the first and last positions coincide.
    #[must_use]
    pub fn sample(&self, n: usize, vac: &Vac) -> Vec<Point2> {
        self.sample_edge_samples(n, vac)
            .iter()
            .map(EdgeSample::pos)
            .collect()
    }

    /// Samples spaced by roughly [`SamplingParams::cycle_spacing`].
    ///
    /// [`SamplingParams::cycle_spacing`]: crate::geometry::SamplingParams
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample_default(&self, vac: &Vac) -> Vec<Point2> {
        let n = (self.length(vac) / vac.params().cycle_spacing) as usize + 4;
        self.sample(n, vac)
    }

    /// Sum of the signed turning angles along the default sampling.
    #[must_use]
    pub fn total_curvature(&self, vac: &Vac) -> f64 {
        match self.boundary {
            CycleBoundary::Invalid | CycleBoundary::SingleVertex(_) => 0.0,
            _ => closed_loop_turning(&self.sample_default(vac)),
        }
    }

    /// Number of full turns made along the loop.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn turning_number(&self, vac: &Vac) -> i32 {
        (0.5 + self.total_curvature(vac) / std::f64::consts::TAU).floor() as i32
    }

    /// The same loop traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let boundary = match &self.boundary {
            CycleBoundary::ClosedHalfedge(he) => CycleBoundary::ClosedHalfedge(he.opposite()),
            CycleBoundary::OpenHalfedgeList(hes) => {
                CycleBoundary::OpenHalfedgeList(chain::reversed(hes))
            }
            other => other.clone(),
        };
        let s0 = if self.s0 == 0.0 { 0.0 } else { 1.0 - self.s0 };
        Self { boundary, s0 }
    }

    /// Retargets a single-vertex cycle on `old` to `new`.
    pub fn replace_vertex(&mut self, old: CellId, new: CellId) {
        if self.boundary == CycleBoundary::SingleVertex(old) {
            self.boundary = CycleBoundary::SingleVertex(new);
        }
    }

    /// Retargets the halfedges over `old.edge` to `new.edge`.
    pub fn replace_halfedge(&mut self, old: Halfedge, new: Halfedge) {
        match &mut self.boundary {
            CycleBoundary::ClosedHalfedge(he) => {
                chain::replace_halfedge(std::slice::from_mut(he), old, new);
            }
            CycleBoundary::OpenHalfedgeList(hes) => chain::replace_halfedge(hes, old, new),
            CycleBoundary::Invalid | CycleBoundary::SingleVertex(_) => {}
        }
    }

    /// Replaces the edge `old` by the ordered chain `new_edges`.
    ///
    /// A closed halfedge split into open edges turns into a halfedge list.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId], vac: &Vac) {
        if !self.halfedges().iter().any(|he| he.edge == old) {
            return;
        }
        let halfedges = chain::splice_edges(self.halfedges(), old, new_edges);
        self.boundary = Self::from_chain(halfedges, vac).boundary;
    }

    /// Text form: `[e1+ e2- ...]`, or `[v]` for a single vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if a referenced cell is no
    /// longer in `vac`.
    ///
    /// [`TopologyError::EntityNotFound`]: crate::error::TopologyError::EntityNotFound
    pub fn to_text(&self, vac: &Vac) -> Result<String> {
        match &self.boundary {
            CycleBoundary::SingleVertex(v) => format_vertex(*v, vac),
            _ => format_halfedges(self.halfedges(), vac),
        }
    }
}

pub(crate) fn format_vertex(vertex: CellId, vac: &Vac) -> Result<String> {
    Ok(format!("[{}]", vac.require_id(vertex)?))
}

pub(crate) fn format_halfedges(halfedges: &[Halfedge], vac: &Vac) -> Result<String> {
    let tokens = halfedges
        .iter()
        .map(|he| {
            let side = if he.side { '+' } else { '-' };
            Ok(format!("{}{side}", vac.require_id(he.edge)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", tokens.join(" ")))
}
