pub mod cell;
pub mod edge;
pub mod face;
pub mod halfedge;
pub mod vertex;

pub use cell::{Cell, CellId, CellKind};
pub use edge::{InbetweenEdgeData, KeyEdgeData};
pub use face::{InbetweenFace, KeyFace};
pub use halfedge::Halfedge;
pub use vertex::{InbetweenVertexData, KeyVertexData};

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TopologyError};
use crate::geometry::{EdgeGeometry, SamplingParams};
use crate::math::{Point2, Time};
use slotmap::SlotMap;

#[derive(Debug, Clone)]
struct CellEntry {
    id: u32,
    cell: Cell,
}

/// Central arena that owns the cells of a vector animation complex.
///
/// Cells reference each other via [`CellId`] (generational indices). Each
/// cell also carries a stable integer id used by the text formats.
#[derive(Debug, Default, Clone)]
pub struct Vac {
    cells: SlotMap<CellId, CellEntry>,
    ids: HashMap<u32, CellId>,
    next_id: u32,
    params: SamplingParams,
}

impl Vac {
    /// Creates a new, empty complex.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty complex with custom sampling parameters.
    #[must_use]
    pub fn with_params(params: SamplingParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Returns the sampling parameters.
    #[must_use]
    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the complex holds no cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn insert(&mut self, cell: Cell) -> CellId {
        let id = self.next_id;
        self.next_id += 1;
        let key = self.cells.insert(CellEntry { id, cell });
        self.ids.insert(id, key);
        key
    }

    // --- Cell creation ---

    /// Inserts a key vertex and returns its ID.
    pub fn add_key_vertex(&mut self, time: Time, pos: Point2) -> CellId {
        self.insert(Cell::KeyVertex(KeyVertexData::new(time, pos)))
    }

    /// Inserts an open key edge between two key vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is not a key vertex of this complex
    /// or the two vertices live at different times.
    pub fn add_key_edge(
        &mut self,
        start: CellId,
        end: CellId,
        geometry: EdgeGeometry,
    ) -> Result<CellId> {
        let time = self.key_vertex(start)?.time;
        if self.key_vertex(end)?.time != time {
            return Err(TopologyError::InvalidTopology(
                "edge end vertices are not at the same time".into(),
            )
            .into());
        }
        Ok(self.insert(Cell::KeyEdge(KeyEdgeData {
            time,
            start: Some(start),
            end: Some(end),
            geometry,
        })))
    }

    /// Inserts a closed key edge.
    pub fn add_closed_key_edge(&mut self, time: Time, geometry: EdgeGeometry) -> CellId {
        self.insert(Cell::KeyEdge(KeyEdgeData {
            time,
            start: None,
            end: None,
            geometry,
        }))
    }

    /// Inserts an inbetween vertex sweeping `before` into `after`.
    ///
    /// # Errors
    ///
    /// Returns an error if either cell is not a key vertex or if `before`
    /// does not come strictly before `after`.
    pub fn add_inbetween_vertex(&mut self, before: CellId, after: CellId) -> Result<CellId> {
        let t0 = self.key_vertex(before)?.time;
        let t1 = self.key_vertex(after)?.time;
        if t0 >= t1 {
            return Err(TopologyError::InvalidTopology(format!(
                "inbetween vertex needs before time {t0} < after time {t1}"
            ))
            .into());
        }
        Ok(self.insert(Cell::InbetweenVertex(InbetweenVertexData { before, after })))
    }

    /// Inserts an inbetween edge.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary is invalid or if the before boundary
    /// does not come strictly before the after boundary.
    pub fn add_inbetween_edge(&mut self, data: InbetweenEdgeData) -> Result<CellId> {
        let (t0, t1) = match &data {
            InbetweenEdgeData::Open { before, after } => (before.time(self), after.time(self)),
            InbetweenEdgeData::Closed { before, after } => (before.time(self), after.time(self)),
        };
        match (t0, t1) {
            (Some(t0), Some(t1)) if t0 < t1 => Ok(self.insert(Cell::InbetweenEdge(data))),
            _ => Err(TopologyError::InvalidTopology(
                "inbetween edge needs valid boundaries at increasing times".into(),
            )
            .into()),
        }
    }

    /// Removes a cell, returning it if it was present.
    ///
    /// Boundaries referencing the cell are not updated.
    pub fn remove_cell(&mut self, cell: CellId) -> Option<Cell> {
        let entry = self.cells.remove(cell)?;
        self.ids.remove(&entry.id);
        Some(entry.cell)
    }

    // --- Lookup ---

    /// Returns the cell, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the complex.
    pub fn cell(&self, cell: CellId) -> std::result::Result<&Cell, TopologyError> {
        self.cells
            .get(cell)
            .map(|entry| &entry.cell)
            .ok_or_else(|| TopologyError::EntityNotFound("cell".into()))
    }

    /// Returns `true` if the cell is in the complex.
    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains_key(cell)
    }

    /// Returns the integer id of a cell.
    #[must_use]
    pub fn id(&self, cell: CellId) -> Option<u32> {
        self.cells.get(cell).map(|entry| entry.id)
    }

    /// Returns the integer id of a cell, or an error if it was removed.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the cell is not in the
    /// complex.
    pub fn require_id(&self, cell: CellId) -> std::result::Result<u32, TopologyError> {
        self.id(cell)
            .ok_or_else(|| TopologyError::EntityNotFound("cell".into()))
    }

    /// Finds a cell from its integer id.
    #[must_use]
    pub fn get_cell(&self, id: u32) -> Option<CellId> {
        self.ids.get(&id).copied()
    }

    /// Returns the nature of a cell.
    #[must_use]
    pub fn kind(&self, cell: CellId) -> Option<CellKind> {
        self.cells.get(cell).map(|entry| entry.cell.kind())
    }

    /// Returns the key vertex data, or an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is missing or is not a key vertex.
    pub fn key_vertex(
        &self,
        cell: CellId,
    ) -> std::result::Result<&KeyVertexData, TopologyError> {
        match self.cell(cell)? {
            Cell::KeyVertex(data) => Ok(data),
            _ => Err(TopologyError::WrongCellKind {
                expected: "key vertex",
            }),
        }
    }

    /// Returns the key edge data, or an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is missing or is not a key edge.
    pub fn key_edge(&self, cell: CellId) -> std::result::Result<&KeyEdgeData, TopologyError> {
        match self.cell(cell)? {
            Cell::KeyEdge(data) => Ok(data),
            _ => Err(TopologyError::WrongCellKind { expected: "key edge" }),
        }
    }

    /// Returns the inbetween vertex data, or an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is missing or is not an inbetween vertex.
    pub fn inbetween_vertex(
        &self,
        cell: CellId,
    ) -> std::result::Result<&InbetweenVertexData, TopologyError> {
        match self.cell(cell)? {
            Cell::InbetweenVertex(data) => Ok(data),
            _ => Err(TopologyError::WrongCellKind {
                expected: "inbetween vertex",
            }),
        }
    }

    /// Returns the inbetween edge data, or an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is missing or is not an inbetween edge.
    pub fn inbetween_edge(
        &self,
        cell: CellId,
    ) -> std::result::Result<&InbetweenEdgeData, TopologyError> {
        match self.cell(cell)? {
            Cell::InbetweenEdge(data) => Ok(data),
            _ => Err(TopologyError::WrongCellKind {
                expected: "inbetween edge",
            }),
        }
    }

    // --- Capability queries ---

    /// Time of a key cell.
    #[must_use]
    pub fn key_time(&self, cell: CellId) -> Option<Time> {
        match self.cell(cell).ok()? {
            Cell::KeyVertex(v) => Some(v.time),
            Cell::KeyEdge(e) => Some(e.time),
            Cell::InbetweenVertex(_) | Cell::InbetweenEdge(_) => None,
        }
    }

    /// Time of the key cells bounding an inbetween cell from below.
    #[must_use]
    pub fn before_time(&self, cell: CellId) -> Option<Time> {
        match self.cell(cell).ok()? {
            Cell::InbetweenVertex(v) => self.key_time(v.before),
            Cell::InbetweenEdge(InbetweenEdgeData::Open { before, .. }) => before.time(self),
            Cell::InbetweenEdge(InbetweenEdgeData::Closed { before, .. }) => before.time(self),
            Cell::KeyVertex(_) | Cell::KeyEdge(_) => None,
        }
    }

    /// Time of the key cells bounding an inbetween cell from above.
    #[must_use]
    pub fn after_time(&self, cell: CellId) -> Option<Time> {
        match self.cell(cell).ok()? {
            Cell::InbetweenVertex(v) => self.key_time(v.after),
            Cell::InbetweenEdge(InbetweenEdgeData::Open { after, .. }) => after.time(self),
            Cell::InbetweenEdge(InbetweenEdgeData::Closed { after, .. }) => after.time(self),
            Cell::KeyVertex(_) | Cell::KeyEdge(_) => None,
        }
    }

    /// Returns `true` if the cell exists at `time`.
    ///
    /// Key cells exist at their own instant only; inbetween cells exist on
    /// the open interval between their before and after times.
    #[must_use]
    pub fn exists(&self, cell: CellId, time: Time) -> bool {
        match self.kind(cell) {
            Some(CellKind::KeyVertex | CellKind::KeyEdge) => self.key_time(cell) == Some(time),
            Some(CellKind::InbetweenVertex | CellKind::InbetweenEdge) => {
                match (self.before_time(cell), self.after_time(cell)) {
                    (Some(t0), Some(t1)) => time.is_strictly_between(t0, t1),
                    _ => false,
                }
            }
            None => false,
        }
    }

    /// Returns `true` if the cell is a closed key or inbetween edge.
    #[must_use]
    pub fn is_closed_edge(&self, cell: CellId) -> bool {
        match self.cell(cell) {
            Ok(Cell::KeyEdge(e)) => e.is_closed(),
            Ok(Cell::InbetweenEdge(e)) => e.is_closed(),
            _ => false,
        }
    }

    /// Start vertex of an open key edge.
    #[must_use]
    pub fn edge_start_vertex(&self, cell: CellId) -> Option<CellId> {
        self.key_edge(cell).ok()?.start
    }

    /// End vertex of an open key edge.
    #[must_use]
    pub fn edge_end_vertex(&self, cell: CellId) -> Option<CellId> {
        self.key_edge(cell).ok()?.end
    }

    /// Geometry of a key edge.
    #[must_use]
    pub fn edge_geometry(&self, cell: CellId) -> Option<&EdgeGeometry> {
        self.key_edge(cell).ok().map(|edge| &edge.geometry)
    }

    /// Position of a vertex at `time`.
    ///
    /// Key vertices ignore `time`; inbetween vertices interpolate linearly
    /// between their bounding key vertices.
    #[must_use]
    pub fn vertex_pos(&self, cell: CellId, time: Time) -> Option<Point2> {
        match self.cell(cell).ok()? {
            Cell::KeyVertex(v) => Some(v.pos),
            Cell::InbetweenVertex(v) => {
                let before = self.key_vertex(v.before).ok()?;
                let after = self.key_vertex(v.after).ok()?;
                let u = time.ratio_between(before.time, after.time);
                Some(before.pos + (after.pos - before.pos) * u)
            }
            Cell::KeyEdge(_) | Cell::InbetweenEdge(_) => None,
        }
    }

    /// Centerline of an edge at `time`, from its start to its end.
    ///
    /// Closed edges repeat their first point at the end. Returns an empty
    /// list for missing cells and vertices.
    #[must_use]
    pub fn edge_sampling(&self, cell: CellId, time: Time) -> Vec<Point2> {
        match self.cell(cell) {
            Ok(Cell::KeyEdge(e)) => e.geometry.sampling(),
            Ok(Cell::InbetweenEdge(e)) => self.inbetween_edge_geometry(cell, e, time),
            _ => Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn inbetween_edge_geometry(
        &self,
        cell: CellId,
        edge: &InbetweenEdgeData,
        time: Time,
    ) -> Vec<Point2> {
        let (before_length, after_length, min_samples) = match edge {
            InbetweenEdgeData::Open { before, after } => (before.length(self), after.length(self), 2),
            InbetweenEdgeData::Closed { before, after } => {
                (before.length(self), after.length(self), 4)
            }
        };
        let max_length = before_length.max(after_length);
        let num_samples =
            min_samples.max((max_length / self.params.inbetween_spacing) as usize + 2);

        let (before_sampling, after_sampling) = match edge {
            InbetweenEdgeData::Open { before, after } => {
                (before.sample(num_samples, self), after.sample(num_samples, self))
            }
            InbetweenEdgeData::Closed { before, after } => {
                (before.sample(num_samples, self), after.sample(num_samples, self))
            }
        };
        if before_sampling.len() != num_samples || after_sampling.len() != num_samples {
            tracing::warn!(?cell, "inbetween edge has an invalid key boundary");
            return Vec::new();
        }

        let (Some(t0), Some(t1)) = (self.before_time(cell), self.after_time(cell)) else {
            return Vec::new();
        };
        let u = time.ratio_between(t0, t1);
        before_sampling
            .iter()
            .zip(&after_sampling)
            .map(|(p, q)| p + (q - p) * u)
            .collect()
    }

    /// Key cells bounding an inbetween cell from below. Empty for key cells.
    #[must_use]
    pub fn before_cells(&self, cell: CellId) -> HashSet<CellId> {
        match self.cell(cell) {
            Ok(Cell::InbetweenVertex(v)) => HashSet::from([v.before]),
            Ok(Cell::InbetweenEdge(InbetweenEdgeData::Open { before, .. })) => before.cells(self),
            Ok(Cell::InbetweenEdge(InbetweenEdgeData::Closed { before, .. })) => {
                before.cells(self)
            }
            _ => HashSet::new(),
        }
    }

    /// Key cells bounding an inbetween cell from above. Empty for key cells.
    #[must_use]
    pub fn after_cells(&self, cell: CellId) -> HashSet<CellId> {
        match self.cell(cell) {
            Ok(Cell::InbetweenVertex(v)) => HashSet::from([v.after]),
            Ok(Cell::InbetweenEdge(InbetweenEdgeData::Open { after, .. })) => after.cells(self),
            Ok(Cell::InbetweenEdge(InbetweenEdgeData::Closed { after, .. })) => after.cells(self),
            _ => HashSet::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::boundary::Path;
    use approx::assert_abs_diff_eq;

    fn segment(vac: &mut Vac, t: Time, y: f64) -> (CellId, CellId, CellId) {
        let a = vac.add_key_vertex(t, Point2::new(0.0, y));
        let b = vac.add_key_vertex(t, Point2::new(10.0, y));
        let geometry =
            EdgeGeometry::from_points(&[Point2::new(0.0, y), Point2::new(10.0, y)], false).unwrap();
        let e = vac.add_key_edge(a, b, geometry).unwrap();
        (a, b, e)
    }

    #[test]
    fn ids_round_trip_and_are_released() {
        let mut vac = Vac::new();
        let v = vac.add_key_vertex(Time::from_frame(0), Point2::origin());
        let id = vac.id(v).unwrap();
        assert_eq!(vac.get_cell(id), Some(v));
        vac.remove_cell(v);
        assert_eq!(vac.get_cell(id), None);
        assert!(vac.is_empty());
    }

    #[test]
    fn edge_endpoints_must_share_time() {
        let mut vac = Vac::new();
        let a = vac.add_key_vertex(Time::from_frame(0), Point2::origin());
        let b = vac.add_key_vertex(Time::from_frame(1), Point2::new(1.0, 0.0));
        let geometry =
            EdgeGeometry::from_points(&[Point2::origin(), Point2::new(1.0, 0.0)], false).unwrap();
        assert!(vac.add_key_edge(a, b, geometry).is_err());
    }

    #[test]
    fn inbetween_vertex_interpolates_and_exists_on_open_interval() {
        let mut vac = Vac::new();
        let a = vac.add_key_vertex(Time::from_frame(0), Point2::new(0.0, 0.0));
        let b = vac.add_key_vertex(Time::from_frame(10), Point2::new(10.0, 20.0));
        let iv = vac.add_inbetween_vertex(a, b).unwrap();

        let p = vac.vertex_pos(iv, Time::new(5.0)).unwrap();
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 10.0, epsilon = 1e-12);
        assert!(vac.exists(iv, Time::new(5.0)));
        assert!(!vac.exists(iv, Time::from_frame(0)));
        assert!(!vac.exists(iv, Time::from_frame(10)));
        assert!(vac.exists(a, Time::from_frame(0)));
        assert_eq!(vac.before_cells(iv), HashSet::from([a]));
        assert!(vac.before_cells(a).is_empty());
        assert!(vac.add_inbetween_vertex(b, a).is_err());
    }

    #[test]
    fn inbetween_edge_interpolates_key_paths() {
        let mut vac = Vac::new();
        let (_, _, e0) = segment(&mut vac, Time::from_frame(0), 0.0);
        let (_, _, e1) = segment(&mut vac, Time::from_frame(10), 10.0);
        let before = Path::from_edges(&[e0], &vac);
        let after = Path::from_edges(&[e1], &vac);
        let ie = vac
            .add_inbetween_edge(InbetweenEdgeData::Open { before, after })
            .unwrap();

        assert_eq!(vac.before_time(ie), Some(Time::from_frame(0)));
        assert!(vac.exists(ie, Time::new(2.5)));
        let sampling = vac.edge_sampling(ie, Time::new(2.5));
        assert!(sampling.len() >= 2);
        for p in &sampling {
            assert_abs_diff_eq!(p.y, 2.5, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(sampling[0].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sampling[sampling.len() - 1].x, 10.0, epsilon = 1e-9);
        assert!(vac.after_cells(ie).contains(&e1));
    }
}
