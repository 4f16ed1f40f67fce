use super::edge::{InbetweenEdgeData, KeyEdgeData};
use super::vertex::{InbetweenVertexData, KeyVertexData};

slotmap::new_key_type! {
    /// Unique identifier for a cell in the complex.
    pub struct CellId;
}

/// The nature of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    KeyVertex,
    KeyEdge,
    InbetweenVertex,
    InbetweenEdge,
}

impl CellKind {
    /// Returns `true` for key and inbetween vertices.
    #[must_use]
    pub fn is_vertex(self) -> bool {
        matches!(self, Self::KeyVertex | Self::InbetweenVertex)
    }

    /// Returns `true` for key and inbetween edges.
    #[must_use]
    pub fn is_edge(self) -> bool {
        matches!(self, Self::KeyEdge | Self::InbetweenEdge)
    }

    /// Returns `true` for key cells.
    #[must_use]
    pub fn is_key(self) -> bool {
        matches!(self, Self::KeyVertex | Self::KeyEdge)
    }
}

/// A cell of the complex.
#[derive(Debug, Clone)]
pub enum Cell {
    KeyVertex(KeyVertexData),
    KeyEdge(KeyEdgeData),
    InbetweenVertex(InbetweenVertexData),
    InbetweenEdge(InbetweenEdgeData),
}

impl Cell {
    /// Returns the nature of the cell.
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            Self::KeyVertex(_) => CellKind::KeyVertex,
            Self::KeyEdge(_) => CellKind::KeyEdge,
            Self::InbetweenVertex(_) => CellKind::InbetweenVertex,
            Self::InbetweenEdge(_) => CellKind::InbetweenEdge,
        }
    }
}
