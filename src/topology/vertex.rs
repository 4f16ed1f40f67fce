use crate::math::{Point2, Time};

use super::CellId;

/// Data associated with a key vertex: a point that exists at one instant.
#[derive(Debug, Clone)]
pub struct KeyVertexData {
    /// The instant at which the vertex exists.
    pub time: Time,
    /// The 2D position of the vertex.
    pub pos: Point2,
}

impl KeyVertexData {
    /// Creates a new key vertex at the given time and position.
    #[must_use]
    pub fn new(time: Time, pos: Point2) -> Self {
        Self { time, pos }
    }
}

/// Data associated with an inbetween vertex.
///
/// An inbetween vertex sweeps the open time interval between two key
/// vertices; its position is interpolated linearly between theirs.
#[derive(Debug, Clone)]
pub struct InbetweenVertexData {
    /// Key vertex at the start of the interval.
    pub before: CellId,
    /// Key vertex at the end of the interval.
    pub after: CellId,
}
