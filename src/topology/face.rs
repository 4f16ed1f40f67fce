use std::collections::HashSet;

use crate::animated::AnimatedCycle;
use crate::boundary::Cycle;
use crate::error::Result;
use crate::math::{Point2, Time};

use super::{CellId, Halfedge, Vac};

/// A face existing at a single instant, bounded by key cycles.
///
/// The first cycle is the outer boundary, the others are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFace {
    pub time: Time,
    pub cycles: Vec<Cycle>,
}

impl KeyFace {
    /// Creates a face without boundary.
    #[must_use]
    pub fn new(time: Time) -> Self {
        Self {
            time,
            cycles: Vec::new(),
        }
    }

    /// Adds a boundary cycle.
    pub fn add_cycle(&mut self, cycle: Cycle) {
        self.cycles.push(cycle);
    }

    /// One closed polyline per valid cycle.
    #[must_use]
    pub fn sample(&self, vac: &Vac) -> Vec<Vec<Point2>> {
        self.cycles
            .iter()
            .filter(|cycle| cycle.is_valid())
            .map(|cycle| cycle.sample_default(vac))
            .collect()
    }

    /// Cells of all boundary cycles.
    #[must_use]
    pub fn cells(&self, vac: &Vac) -> HashSet<CellId> {
        self.cycles.iter().flat_map(|cycle| cycle.cells(vac)).collect()
    }

    pub fn replace_vertex(&mut self, old: CellId, new: CellId) {
        for cycle in &mut self.cycles {
            cycle.replace_vertex(old, new);
        }
    }

    pub fn replace_halfedge(&mut self, old: Halfedge, new: Halfedge) {
        for cycle in &mut self.cycles {
            cycle.replace_halfedge(old, new);
        }
    }

    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId], vac: &Vac) {
        for cycle in &mut self.cycles {
            cycle.replace_edges(old, new_edges, vac);
        }
    }
}

/// A face sweeping over a time span, bounded by animated cycles.
#[derive(Debug, Clone, Default)]
pub struct InbetweenFace {
    pub cycles: Vec<AnimatedCycle>,
}

impl InbetweenFace {
    #[must_use]
    pub fn new(cycles: Vec<AnimatedCycle>) -> Self {
        Self { cycles }
    }

    /// One polyline per cycle alive at `time`.
    #[must_use]
    pub fn sample(&self, time: Time, vac: &Vac) -> Vec<Vec<Point2>> {
        self.cycles
            .iter()
            .map(|cycle| cycle.sample(time, vac))
            .filter(|polyline| !polyline.is_empty())
            .collect()
    }

    #[must_use]
    pub fn cells(&self) -> HashSet<CellId> {
        self.cycles.iter().flat_map(AnimatedCycle::cells).collect()
    }

    #[must_use]
    pub fn before_cells(&self, vac: &Vac) -> HashSet<CellId> {
        self.cycles
            .iter()
            .flat_map(|cycle| cycle.before_cells(vac))
            .collect()
    }

    #[must_use]
    pub fn after_cells(&self, vac: &Vac) -> HashSet<CellId> {
        self.cycles
            .iter()
            .flat_map(|cycle| cycle.after_cells(vac))
            .collect()
    }

    pub fn replace_vertex(&mut self, old: CellId, new: CellId) {
        for cycle in &mut self.cycles {
            cycle.replace_vertex(old, new);
        }
    }

    pub fn replace_halfedge(&mut self, old: Halfedge, new: Halfedge) {
        for cycle in &mut self.cycles {
            cycle.replace_halfedge(old, new);
        }
    }

    /// Replaces `old` by `new_edges` in every cycle.
    ///
    /// # Errors
    ///
    /// See [`AnimatedCycle::replace_edges`]. No cycle is changed if one of
    /// them fails.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId], vac: &Vac) -> Result<()> {
        self.update_all(|cycle| cycle.replace_edges(old, new_edges, vac))
    }

    /// # Errors
    ///
    /// See [`AnimatedCycle::replace_inbetween_vertex`]. No cycle is changed
    /// if one of them fails.
    pub fn replace_inbetween_vertex(
        &mut self,
        old: CellId,
        before: CellId,
        key_vertex: CellId,
        after: CellId,
    ) -> Result<()> {
        self.update_all(|cycle| cycle.replace_inbetween_vertex(old, before, key_vertex, after))
    }

    /// # Errors
    ///
    /// See [`AnimatedCycle::replace_inbetween_edge`]. No cycle is changed if
    /// one of them fails.
    pub fn replace_inbetween_edge(
        &mut self,
        old: CellId,
        before: CellId,
        key_edge: CellId,
        after: CellId,
        vac: &Vac,
    ) -> Result<()> {
        self.update_all(|cycle| cycle.replace_inbetween_edge(old, before, key_edge, after, vac))
    }

    /// Retargets every cycle to the cells with the same ids in `to`.
    ///
    /// # Errors
    ///
    /// See [`AnimatedCycle::remap_cells`].
    pub fn remap_cells(&mut self, from: &Vac, to: &Vac) -> Result<()> {
        self.update_all(|cycle| cycle.remap_cells(from, to))
    }

    /// Runs `op` on copies of the cycles and keeps them only if all succeed.
    fn update_all<F>(&mut self, mut op: F) -> Result<()>
    where
        F: FnMut(&mut AnimatedCycle) -> Result<()>,
    {
        let mut updated = self.cycles.clone();
        for cycle in &mut updated {
            op(cycle)?;
        }
        self.cycles = updated;
        Ok(())
    }
}
