//! Animated cycles: time-varying boundary rings of inbetween faces.
//!
//! An [`AnimatedCycle`] owns a small graph of [`AnimatedCycleNode`]s stored
//! in a generational arena. Removing a node from the arena turns every link
//! still pointing to it into a dangling [`NodeId`], which all traversals
//! treat as a missing link.

pub mod node;
mod sampling;
pub mod serialization;
mod surgery;

pub use node::{AnimatedCycleNode, CycleType, NodeId, NodeType};
pub use serialization::UnresolvedAnimatedCycle;

use std::collections::HashSet;

use crate::math::Time;
use crate::topology::{CellId, Vac};
use slotmap::SlotMap;
use tracing::warn;

/// A time-varying closed boundary.
///
/// At every time of its lifetime, the nodes whose cell exists at that time
/// form one ring (Steiner, simple or non-simple) reachable from `first`
/// through `after` links. Cloning deep-copies the whole graph.
#[derive(Debug, Clone, Default)]
pub struct AnimatedCycle {
    nodes: SlotMap<NodeId, AnimatedCycleNode>,
    first: Option<NodeId>,
}

impl AnimatedCycle {
    /// Creates an empty cycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Building ---

    /// Inserts an unlinked node and returns its ID.
    pub fn add_node(&mut self, node: AnimatedCycleNode) -> NodeId {
        self.nodes.insert(node)
    }

    /// Returns the node, if it is still in the cycle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&AnimatedCycleNode> {
        self.nodes.get(id)
    }

    /// Returns a mutable reference to the node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut AnimatedCycleNode> {
        self.nodes.get_mut(id)
    }

    /// The node traversals start from.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    /// Sets the node traversals start from.
    pub fn set_first(&mut self, id: NodeId) {
        self.first = Some(id);
    }

    /// Makes `b` follow `a` around the ring. Missing nodes are ignored.
    pub fn link_spatial(&mut self, a: NodeId, b: NodeId) {
        if let Some(node) = self.nodes.get_mut(a) {
            node.next = Some(b);
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.previous = Some(a);
        }
    }

    /// Makes `b` succeed `a` in time. Missing nodes are ignored.
    pub fn link_temporal(&mut self, a: NodeId, b: NodeId) {
        if let Some(node) = self.nodes.get_mut(a) {
            node.after = Some(b);
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.before = Some(a);
        }
    }

    /// Removes a node. Links pointing to it are left dangling.
    pub fn remove_node(&mut self, id: NodeId) -> Option<AnimatedCycleNode> {
        if self.first == Some(id) {
            self.first = None;
        }
        self.nodes.remove(id)
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.first = None;
    }

    /// Number of nodes stored, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the cycle holds no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Graph queries ---

    /// Nodes reachable from `first` through any of the four links, in
    /// discovery order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        let Some(first) = self.first.filter(|id| self.nodes.contains_key(*id)) else {
            return Vec::new();
        };
        let mut order = vec![first];
        let mut seen = HashSet::from([first]);
        let mut stack = vec![first];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            for link in [node.previous, node.next, node.before, node.after]
                .into_iter()
                .flatten()
            {
                if self.nodes.contains_key(link) && seen.insert(link) {
                    order.push(link);
                    stack.push(link);
                }
            }
        }
        order
    }

    /// Reachable nodes referencing `cell`.
    #[must_use]
    pub fn get_nodes(&self, cell: CellId) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|&id| self.nodes[id].cell == cell)
            .collect()
    }

    /// Cells referenced by the reachable nodes.
    #[must_use]
    pub fn cells(&self) -> HashSet<CellId> {
        self.nodes().into_iter().map(|id| self.nodes[id].cell).collect()
    }

    /// Key cells bounding the cycle from below: the before cells of the
    /// nodes without `before` link.
    #[must_use]
    pub fn before_cells(&self, vac: &Vac) -> HashSet<CellId> {
        self.nodes()
            .into_iter()
            .filter(|&id| self.nodes[id].before.is_none())
            .flat_map(|id| vac.before_cells(self.nodes[id].cell))
            .collect()
    }

    /// Key cells bounding the cycle from above: the after cells of the
    /// nodes without `after` link.
    #[must_use]
    pub fn after_cells(&self, vac: &Vac) -> HashSet<CellId> {
        self.nodes()
            .into_iter()
            .filter(|&id| self.nodes[id].after.is_none())
            .flat_map(|id| vac.after_cells(self.nodes[id].cell))
            .collect()
    }

    // --- Time-aware traversal ---

    /// Nature of a node; [`NodeType::Invalid`] for missing nodes.
    #[must_use]
    pub fn node_type(&self, id: NodeId, vac: &Vac) -> NodeType {
        self.nodes
            .get(id)
            .map_or(NodeType::Invalid, |node| NodeType::of(node.cell, vac))
    }

    /// Returns `true` if the node's cell exists at `time`.
    #[must_use]
    pub fn exists(&self, id: NodeId, time: Time, vac: &Vac) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| vac.exists(node.cell, time))
    }

    /// Shape of the ring through `id` at a time where its cell exists.
    ///
    /// The shape only depends on the node and its `next` link, so any time
    /// the node's cell exists at gives the same answer.
    #[must_use]
    pub fn cycle_type(&self, id: NodeId, _time: Time, vac: &Vac) -> CycleType {
        match self.node_type(id, vac) {
            NodeType::Invalid => CycleType::Invalid,
            NodeType::KeyVertex | NodeType::InbetweenVertex => {
                let node = &self.nodes[id];
                match node.next.and_then(|next| self.nodes.get(next)) {
                    Some(next) if next.cell == node.cell => CycleType::Steiner,
                    Some(_) => CycleType::NonSimple,
                    None => {
                        warn!(?id, "invalid animated cycle: vertex node without next");
                        CycleType::Invalid
                    }
                }
            }
            NodeType::KeyClosedEdge | NodeType::InbetweenClosedEdge => CycleType::Simple,
            NodeType::KeyOpenEdge | NodeType::InbetweenOpenEdge => CycleType::NonSimple,
        }
    }

    /// Previous node around the ring at `time`.
    ///
    /// For inbetween open edge nodes, the plain `previous` link is followed
    /// by `before` links until a node existing at `time` is found.
    #[must_use]
    pub fn previous_at(&self, id: NodeId, time: Time, vac: &Vac) -> Option<NodeId> {
        let previous = self.nodes.get(id)?.previous;
        match self.node_type(id, vac) {
            NodeType::Invalid => None,
            NodeType::InbetweenOpenEdge => self.skip_to_existing(previous, time, vac, false),
            _ => previous,
        }
    }

    /// Next node around the ring at `time`.
    ///
    /// For inbetween open edge nodes, the plain `next` link is followed by
    /// `after` links until a node existing at `time` is found.
    #[must_use]
    pub fn next_at(&self, id: NodeId, time: Time, vac: &Vac) -> Option<NodeId> {
        let next = self.nodes.get(id)?.next;
        match self.node_type(id, vac) {
            NodeType::Invalid => None,
            NodeType::InbetweenOpenEdge => self.skip_to_existing(next, time, vac, true),
            _ => next,
        }
    }

    /// Follows `after` (or `before`) links from `start` until a node alive at
    /// `time`. The walk is bounded by the number of nodes.
    pub(crate) fn skip_to_existing(
        &self,
        start: Option<NodeId>,
        time: Time,
        vac: &Vac,
        forward: bool,
    ) -> Option<NodeId> {
        let Some(mut current) = start else {
            warn!("animated cycle is invalid: missing spatial link");
            return None;
        };
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(current)?;
            if vac.exists(node.cell, time) {
                return Some(current);
            }
            let link = if forward { node.after } else { node.before };
            match link {
                Some(id) => current = id,
                None => {
                    warn!(?current, forward, "animated cycle is invalid: missing temporal link");
                    return None;
                }
            }
        }
        warn!(%time, "animated cycle is invalid: temporal links loop without reaching time");
        None
    }

    /// The node to start from at `time`: `first`, or the first node reached
    /// through `after` links whose cell exists at `time`.
    #[must_use]
    pub fn get_node(&self, time: Time, vac: &Vac) -> Option<NodeId> {
        let Some(first) = self.first else {
            warn!("node at time not found: no first node");
            return None;
        };
        self.skip_to_existing(Some(first), time, vac, true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn steiner(vac: &mut Vac) -> (AnimatedCycle, NodeId, CellId) {
        let v = vac.add_key_vertex(Time::from_frame(0), Point2::new(2.0, 3.0));
        let mut cycle = AnimatedCycle::new();
        let n = cycle.add_node(AnimatedCycleNode::new(v));
        cycle.link_spatial(n, n);
        cycle.set_first(n);
        (cycle, n, v)
    }

    #[test]
    fn self_looping_vertex_is_steiner() {
        let mut vac = Vac::new();
        let (cycle, n, v) = steiner(&mut vac);
        assert_eq!(cycle.node_type(n, &vac), NodeType::KeyVertex);
        assert_eq!(cycle.cycle_type(n, Time::from_frame(0), &vac), CycleType::Steiner);
        assert_eq!(cycle.nodes(), vec![n]);
        assert_eq!(cycle.cells(), HashSet::from([v]));
        assert_eq!(cycle.get_node(Time::from_frame(0), &vac), Some(n));
        assert_eq!(cycle.get_node(Time::from_frame(1), &vac), None);
    }

    #[test]
    fn cycle_type_is_the_same_across_the_lifetime() {
        let mut vac = Vac::new();
        let start = vac.add_key_vertex(Time::from_frame(0), Point2::origin());
        let end = vac.add_key_vertex(Time::from_frame(10), Point2::new(4.0, 0.0));
        let v = vac.add_inbetween_vertex(start, end).unwrap();
        let mut cycle = AnimatedCycle::new();
        let n = cycle.add_node(AnimatedCycleNode::new(v));
        cycle.link_spatial(n, n);

        for frame in [1, 5, 9] {
            let time = Time::from_frame(frame);
            assert!(cycle.exists(n, time, &vac));
            assert_eq!(cycle.cycle_type(n, time, &vac), CycleType::Steiner);
        }
    }

    #[test]
    fn clone_is_deep() {
        let mut vac = Vac::new();
        let (cycle, n, _) = steiner(&mut vac);
        let mut copy = cycle.clone();
        copy.node_mut(n).unwrap().side = false;
        assert!(cycle.node(n).unwrap().side);
    }

    #[test]
    fn removed_nodes_become_missing_links() {
        let mut vac = Vac::new();
        let a = vac.add_key_vertex(Time::from_frame(0), Point2::origin());
        let b = vac.add_key_vertex(Time::from_frame(0), Point2::new(1.0, 0.0));
        let mut cycle = AnimatedCycle::new();
        let na = cycle.add_node(AnimatedCycleNode::new(a));
        let nb = cycle.add_node(AnimatedCycleNode::new(b));
        cycle.link_spatial(na, nb);
        cycle.set_first(na);
        assert_eq!(cycle.nodes().len(), 2);

        cycle.remove_node(nb);
        assert_eq!(cycle.nodes(), vec![na]);
        assert_eq!(cycle.cycle_type(na, Time::from_frame(0), &vac), CycleType::Invalid);

        cycle.clear();
        assert!(cycle.is_empty());
        assert_eq!(cycle.first(), None);
    }

    #[test]
    fn temporal_skip_is_bounded() {
        let mut vac = Vac::new();
        let a = vac.add_key_vertex(Time::from_frame(0), Point2::origin());
        let b = vac.add_key_vertex(Time::from_frame(5), Point2::origin());
        let mut cycle = AnimatedCycle::new();
        let na = cycle.add_node(AnimatedCycleNode::new(a));
        let nb = cycle.add_node(AnimatedCycleNode::new(b));
        // malformed: after links loop
        cycle.link_temporal(na, nb);
        cycle.link_temporal(nb, na);
        cycle.set_first(na);
        assert_eq!(cycle.get_node(Time::from_frame(5), &vac), Some(nb));
        assert_eq!(cycle.get_node(Time::from_frame(3), &vac), None);
    }
}
