use crate::boundary::{Cycle, Path};
use crate::geometry::EdgeGeometry;
use crate::math::Time;

use super::CellId;

/// Data associated with a key edge.
///
/// An open key edge connects two key vertices at the same time. A closed key
/// edge has no end vertices: its geometry loops back onto itself.
#[derive(Debug, Clone)]
pub struct KeyEdgeData {
    /// The instant at which the edge exists.
    pub time: Time,
    /// Start vertex, `None` for closed edges.
    pub start: Option<CellId>,
    /// End vertex, `None` for closed edges.
    pub end: Option<CellId>,
    /// The centerline of the edge, from start to end.
    pub geometry: EdgeGeometry,
}

impl KeyEdgeData {
    /// Returns `true` if the edge is a closed loop without end vertices.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }
}

/// Data associated with an inbetween edge.
///
/// The edge sweeps the open interval between its `before` and `after` key
/// boundaries; its geometry at a given time interpolates both.
#[derive(Debug, Clone)]
pub enum InbetweenEdgeData {
    /// Sweeps a key path into another key path.
    Open { before: Path, after: Path },
    /// Sweeps a key cycle into another key cycle.
    Closed { before: Cycle, after: Cycle },
}

impl InbetweenEdgeData {
    /// Returns `true` if the swept boundaries are cycles.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}
