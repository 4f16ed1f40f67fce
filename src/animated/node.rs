use crate::topology::{CellId, CellKind, Vac};

slotmap::new_key_type! {
    /// Unique identifier for a node in an animated cycle.
    pub struct NodeId;
}

/// One cell of an animated cycle, with its spatial and temporal neighbors.
///
/// `previous`/`next` link nodes around the ring at a given time.
/// `before`/`after` link a node to the nodes standing for the same part of
/// the boundary over the preceding and following time spans.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedCycleNode {
    /// The referenced cell. The node does not own it.
    pub cell: CellId,
    pub previous: Option<NodeId>,
    pub next: Option<NodeId>,
    pub before: Option<NodeId>,
    pub after: Option<NodeId>,
    /// Traversal direction when `cell` is an edge. Ignored for vertices.
    pub side: bool,
}

impl AnimatedCycleNode {
    /// Creates an unlinked node on `cell`, traversed forward.
    #[must_use]
    pub fn new(cell: CellId) -> Self {
        Self::with_side(cell, true)
    }

    /// Creates an unlinked node on `cell` with the given traversal direction.
    #[must_use]
    pub fn with_side(cell: CellId, side: bool) -> Self {
        Self {
            cell,
            previous: None,
            next: None,
            before: None,
            after: None,
            side,
        }
    }
}

/// Nature of a node, derived from its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    KeyVertex,
    KeyOpenEdge,
    KeyClosedEdge,
    InbetweenVertex,
    InbetweenOpenEdge,
    InbetweenClosedEdge,
    /// The cell is missing from the complex.
    Invalid,
}

impl NodeType {
    /// Classifies `cell`.
    #[must_use]
    pub fn of(cell: CellId, vac: &Vac) -> Self {
        match vac.kind(cell) {
            Some(CellKind::KeyVertex) => Self::KeyVertex,
            Some(CellKind::InbetweenVertex) => Self::InbetweenVertex,
            Some(CellKind::KeyEdge) if vac.is_closed_edge(cell) => Self::KeyClosedEdge,
            Some(CellKind::KeyEdge) => Self::KeyOpenEdge,
            Some(CellKind::InbetweenEdge) if vac.is_closed_edge(cell) => Self::InbetweenClosedEdge,
            Some(CellKind::InbetweenEdge) => Self::InbetweenOpenEdge,
            None => Self::Invalid,
        }
    }

    /// Returns `true` for key and inbetween vertex nodes.
    #[must_use]
    pub fn is_vertex(self) -> bool {
        matches!(self, Self::KeyVertex | Self::InbetweenVertex)
    }

    /// Returns `true` for key and inbetween open edge nodes.
    #[must_use]
    pub fn is_open_edge(self) -> bool {
        matches!(self, Self::KeyOpenEdge | Self::InbetweenOpenEdge)
    }

    /// Returns `true` for key and inbetween closed edge nodes.
    #[must_use]
    pub fn is_closed_edge(self) -> bool {
        matches!(self, Self::KeyClosedEdge | Self::InbetweenClosedEdge)
    }
}

/// Shape of the ring a node belongs to at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleType {
    /// A single vertex node looping onto itself.
    Steiner,
    /// Closed edge nodes only.
    Simple,
    /// Open edge nodes alternating with vertex nodes.
    NonSimple,
    Invalid,
}
