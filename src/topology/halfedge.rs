use crate::geometry::EdgeSample;
use crate::math::{Point2, Time};

use super::{CellId, Vac};

/// A key edge with orientation information.
///
/// All geometric queries take the owning [`Vac`]; a halfedge whose edge is no
/// longer in the complex answers with zero length and origin positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Halfedge {
    /// The edge identifier.
    pub edge: CellId,
    /// If `true`, the edge is traversed in its natural direction (start → end).
    /// If `false`, the edge is traversed in reverse (end → start).
    pub side: bool,
}

impl Halfedge {
    /// Creates a new halfedge.
    #[must_use]
    pub fn new(edge: CellId, side: bool) -> Self {
        Self { edge, side }
    }

    /// The same edge traversed the other way.
    #[must_use]
    pub fn opposite(self) -> Self {
        Self::new(self.edge, !self.side)
    }

    /// Vertex at which the traversal starts, `None` for closed edges.
    #[must_use]
    pub fn start_vertex(&self, vac: &Vac) -> Option<CellId> {
        if self.side {
            vac.edge_start_vertex(self.edge)
        } else {
            vac.edge_end_vertex(self.edge)
        }
    }

    /// Vertex at which the traversal ends, `None` for closed edges.
    #[must_use]
    pub fn end_vertex(&self, vac: &Vac) -> Option<CellId> {
        if self.side {
            vac.edge_end_vertex(self.edge)
        } else {
            vac.edge_start_vertex(self.edge)
        }
    }

    /// Returns `true` if the underlying edge is closed.
    #[must_use]
    pub fn is_closed(&self, vac: &Vac) -> bool {
        vac.is_closed_edge(self.edge)
    }

    /// Time of the underlying key edge.
    #[must_use]
    pub fn time(&self, vac: &Vac) -> Option<Time> {
        vac.key_time(self.edge)
    }

    /// Arclength of the underlying edge.
    #[must_use]
    pub fn length(&self, vac: &Vac) -> f64 {
        vac.key_edge(self.edge)
            .map_or(0.0, |edge| edge.geometry.length())
    }

    /// Sample at arclength `s` measured along the traversal direction.
    #[must_use]
    pub fn sample(&self, vac: &Vac, s: f64) -> EdgeSample {
        let Ok(edge) = vac.key_edge(self.edge) else {
            return EdgeSample::default();
        };
        if self.side {
            edge.geometry.pos(s)
        } else {
            edge.geometry.pos(edge.geometry.length() - s)
        }
    }

    /// Position at arclength `s` measured along the traversal direction.
    #[must_use]
    pub fn pos(&self, vac: &Vac, s: f64) -> Point2 {
        self.sample(vac, s).pos()
    }

    /// Position where the traversal starts.
    #[must_use]
    pub fn left_pos(&self, vac: &Vac) -> Point2 {
        self.pos(vac, 0.0)
    }

    /// Position where the traversal ends.
    #[must_use]
    pub fn right_pos(&self, vac: &Vac) -> Point2 {
        self.pos(vac, self.length(vac))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::EdgeGeometry;
    use approx::assert_abs_diff_eq;

    fn segment(vac: &mut Vac) -> (CellId, CellId, CellId) {
        let t = Time::from_frame(0);
        let a = vac.add_key_vertex(t, Point2::new(0.0, 0.0));
        let b = vac.add_key_vertex(t, Point2::new(4.0, 0.0));
        let geometry =
            EdgeGeometry::from_points(&[Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)], false)
                .unwrap();
        let e = vac.add_key_edge(a, b, geometry).unwrap();
        (a, b, e)
    }

    #[test]
    fn side_flips_endpoints_and_parameterization() {
        let mut vac = Vac::new();
        let (a, b, e) = segment(&mut vac);
        let forward = Halfedge::new(e, true);
        let backward = forward.opposite();

        assert_eq!(forward.start_vertex(&vac), Some(a));
        assert_eq!(forward.end_vertex(&vac), Some(b));
        assert_eq!(backward.start_vertex(&vac), Some(b));
        assert_eq!(backward.end_vertex(&vac), Some(a));

        assert_abs_diff_eq!(forward.pos(&vac, 1.0).x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(backward.pos(&vac, 1.0).x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(backward.right_pos(&vac).x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_edge_is_degenerate_not_fatal() {
        let mut vac = Vac::new();
        let (_, _, e) = segment(&mut vac);
        vac.remove_cell(e);
        let he = Halfedge::new(e, true);
        assert_eq!(he.start_vertex(&vac), None);
        assert!(he.length(&vac).abs() < 1e-12);
        assert_eq!(he.pos(&vac, 2.0), Point2::origin());
    }
}
