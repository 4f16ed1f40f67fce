//! In-place rewiring of an animated cycle when the cells it references are
//! substituted or split.
//!
//! Every operation repairs `first` when it pointed to a removed node and
//! removes the replaced nodes from the arena. Cross references are only
//! redirected when they pointed to the replaced node; the four link kinds
//! are not assumed to be symmetric.

use tracing::{debug, warn};

use crate::error::{Result, TopologyError, VacError};
use crate::math::Time;
use crate::topology::{CellId, CellKind, Halfedge, Vac};

use super::{AnimatedCycle, AnimatedCycleNode, NodeId, NodeType};

fn violated(message: impl Into<String>) -> VacError {
    TopologyError::InvariantViolated(message.into()).into()
}

#[derive(Debug, Clone, Copy)]
enum Link {
    Previous,
    Next,
    Before,
    After,
}

impl Link {
    fn of(self, node: &AnimatedCycleNode) -> Option<NodeId> {
        match self {
            Self::Previous => node.previous,
            Self::Next => node.next,
            Self::Before => node.before,
            Self::After => node.after,
        }
    }

    fn slot(self, node: &mut AnimatedCycleNode) -> &mut Option<NodeId> {
        match self {
            Self::Previous => &mut node.previous,
            Self::Next => &mut node.next,
            Self::Before => &mut node.before,
            Self::After => &mut node.after,
        }
    }
}

/// Ordered edges and the vertex reached at the end of each, for one
/// traversal direction of the replaced edge.
fn replacement_chain(
    new_edges: &[CellId],
    side: bool,
    vac: &Vac,
) -> Result<(Vec<CellId>, Vec<CellId>)> {
    let edges: Vec<CellId> = if side {
        new_edges.to_vec()
    } else {
        new_edges.iter().rev().copied().collect()
    };
    let vertices = edges
        .iter()
        .map(|&edge| {
            let vertex = if side {
                vac.edge_end_vertex(edge)
            } else {
                vac.edge_start_vertex(edge)
            };
            vertex.ok_or_else(|| violated("replacement edges must be open key edges"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((edges, vertices))
}

impl AnimatedCycle {
    /// Retargets every node on `old` to `new`.
    pub fn replace_vertex(&mut self, old: CellId, new: CellId) {
        for id in self.get_nodes(old) {
            self.nodes[id].cell = new;
        }
    }

    /// Retargets every node on `old.edge` to `new.edge`, composing the
    /// traversal directions.
    pub fn replace_halfedge(&mut self, old: Halfedge, new: Halfedge) {
        for id in self.get_nodes(old.edge) {
            let node = &mut self.nodes[id];
            node.cell = new.edge;
            node.side = (node.side == old.side) == new.side;
        }
    }

    /// Replaces the key edge `old` by the ordered chain `new_edges`.
    ///
    /// `old` must still be in `vac`. A closed edge ring of `n` nodes becomes
    /// a ring of `n * new_edges.len()` edge nodes interleaved with vertex
    /// nodes, unless the single replacement is itself closed. Each node on an
    /// open edge is replaced by a chain spliced between its neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvariantViolated`] if the chain is empty,
    /// its edges are not open key edges, or the nodes on `old` are not
    /// linked as expected. The cycle is left untouched in that case.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId], vac: &Vac) -> Result<()> {
        if vac.kind(old) != Some(CellKind::KeyEdge) {
            return Err(TopologyError::WrongCellKind { expected: "key edge" }.into());
        }
        if new_edges.is_empty() {
            return Err(violated("edge replaced by an empty chain"));
        }
        let old_nodes = self.get_nodes(old);
        if old_nodes.is_empty() {
            return Ok(());
        }
        if vac.is_closed_edge(old) {
            self.replace_closed_edge(old, &old_nodes, new_edges, vac)
        } else {
            self.replace_open_edge(&old_nodes, new_edges, vac)
        }
    }

    fn replace_closed_edge(
        &mut self,
        old: CellId,
        old_nodes: &[NodeId],
        new_edges: &[CellId],
        vac: &Vac,
    ) -> Result<()> {
        if let [edge] = new_edges {
            if vac.is_closed_edge(*edge) {
                for &id in old_nodes {
                    self.nodes[id].cell = *edge;
                }
                return Ok(());
            }
        }

        let ring = self.ring_of(old_nodes[0], old)?;
        let before_ring = match self.nodes[ring[0]].before {
            Some(id) => self.ring(id).ok_or_else(|| violated("broken ring before closed edge"))?,
            None => Vec::new(),
        };
        let after_ring = match self.nodes[ring[0]].after {
            Some(id) => self.ring(id).ok_or_else(|| violated("broken ring after closed edge"))?,
            None => Vec::new(),
        };
        let chains = ring
            .iter()
            .map(|&id| replacement_chain(new_edges, self.nodes[id].side, vac))
            .collect::<Result<Vec<_>>>()?;

        let k = new_edges.len();
        let m = ring.len() * k;
        let mut edge_nodes = Vec::with_capacity(m);
        let mut vertex_nodes = Vec::with_capacity(m);
        for (&id, (edges, vertices)) in ring.iter().zip(&chains) {
            let old_node = self.nodes[id].clone();
            for (&edge, &vertex) in edges.iter().zip(vertices) {
                edge_nodes.push(self.add_node(AnimatedCycleNode {
                    before: old_node.before,
                    after: old_node.after,
                    ..AnimatedCycleNode::with_side(edge, old_node.side)
                }));
                vertex_nodes.push(self.add_node(AnimatedCycleNode {
                    before: old_node.before,
                    after: old_node.after,
                    ..AnimatedCycleNode::new(vertex)
                }));
            }
        }
        for i in 0..m {
            self.link_spatial(edge_nodes[i], vertex_nodes[i]);
            self.link_spatial(vertex_nodes[i], edge_nodes[(i + 1) % m]);
        }

        // Neighbor rings point to the first new node of each old segment.
        for (neighbors, link) in [(&before_ring, Link::After), (&after_ring, Link::Before)] {
            let ratio = ring.len() / neighbors.len().max(1);
            for (i, &id) in neighbors.iter().enumerate() {
                let target = edge_nodes[(i * ratio * k).min(m - 1)];
                *link.slot(&mut self.nodes[id]) = Some(target);
            }
        }

        if self.first.is_some_and(|first| ring.contains(&first)) {
            self.first = Some(edge_nodes[0]);
        }
        for id in &ring {
            self.nodes.remove(*id);
        }
        debug!(old_ring = ring.len(), new_ring = 2 * m, "split closed edge ring");
        Ok(())
    }

    fn replace_open_edge(
        &mut self,
        old_nodes: &[NodeId],
        new_edges: &[CellId],
        vac: &Vac,
    ) -> Result<()> {
        let mut plans = Vec::with_capacity(old_nodes.len());
        for &id in old_nodes {
            let node = &self.nodes[id];
            if node.previous.is_none() || node.next.is_none() {
                return Err(violated("open edge node without spatial neighbors"));
            }
            plans.push((id, replacement_chain(new_edges, node.side, vac)?));
        }

        let n = new_edges.len();
        for (id, (edges, vertices)) in plans {
            let old_node = self.nodes[id].clone();
            let edge_nodes: Vec<NodeId> = edges
                .iter()
                .map(|&edge| {
                    self.add_node(AnimatedCycleNode {
                        before: old_node.before,
                        after: old_node.after,
                        ..AnimatedCycleNode::with_side(edge, old_node.side)
                    })
                })
                .collect();
            let vertex_nodes: Vec<NodeId> = vertices[..n - 1]
                .iter()
                .map(|&vertex| {
                    self.add_node(AnimatedCycleNode {
                        before: old_node.before,
                        after: old_node.after,
                        ..AnimatedCycleNode::new(vertex)
                    })
                })
                .collect();
            for i in 0..n - 1 {
                self.link_spatial(edge_nodes[i], vertex_nodes[i]);
                self.link_spatial(vertex_nodes[i], edge_nodes[i + 1]);
            }
            let (head, tail) = (edge_nodes[0], edge_nodes[n - 1]);
            self.nodes[head].previous = old_node.previous;
            self.nodes[tail].next = old_node.next;

            self.redirect(old_node.previous, Link::Next, id, head);
            self.redirect(old_node.next, Link::Previous, id, tail);
            self.redirect(old_node.before, Link::After, id, head);
            self.redirect(old_node.after, Link::Before, id, tail);

            if self.first == Some(id) {
                self.first = Some(head);
            }
            self.nodes.remove(id);
        }
        debug!(nodes = old_nodes.len(), edges = n, "split open edge");
        Ok(())
    }

    /// Splits every node on the inbetween vertex `old` at the instant of
    /// `key_vertex` into three nodes on `before`, `key_vertex` and `after`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvariantViolated`] if a node on `old` that
    /// is not a Steiner loop misses a spatial neighbor. The cycle is left
    /// untouched in that case.
    pub fn replace_inbetween_vertex(
        &mut self,
        old: CellId,
        before: CellId,
        key_vertex: CellId,
        after: CellId,
    ) -> Result<()> {
        let old_nodes = self.get_nodes(old);
        for &id in &old_nodes {
            let node = &self.nodes[id];
            if node.next != Some(id) && (node.previous.is_none() || node.next.is_none()) {
                return Err(violated("inbetween vertex node without spatial neighbors"));
            }
        }

        for &id in &old_nodes {
            let old_node = self.nodes[id].clone();
            let first_part = self.add_node(AnimatedCycleNode {
                before: old_node.before,
                ..AnimatedCycleNode::new(before)
            });
            let key = self.add_node(AnimatedCycleNode::new(key_vertex));
            let last_part = self.add_node(AnimatedCycleNode {
                after: old_node.after,
                ..AnimatedCycleNode::new(after)
            });
            self.link_temporal(first_part, key);
            self.link_temporal(key, last_part);

            if old_node.next == Some(id) {
                for part in [first_part, key, last_part] {
                    self.link_spatial(part, part);
                }
            } else {
                for part in [first_part, key, last_part] {
                    let node = &mut self.nodes[part];
                    node.previous = old_node.previous;
                    node.next = old_node.next;
                }
                self.redirect(old_node.previous, Link::Next, id, first_part);
                self.redirect(old_node.next, Link::Previous, id, last_part);
            }
            self.redirect(old_node.before, Link::After, id, first_part);
            self.redirect(old_node.after, Link::Before, id, last_part);

            if self.first == Some(id) {
                self.first = Some(first_part);
            }
            self.nodes.remove(id);
        }
        debug!(nodes = old_nodes.len(), "split inbetween vertex");
        Ok(())
    }

    /// Splits every node on the inbetween edge `old` at the instant of
    /// `key_edge` into three nodes on `before`, `key_edge` and `after`.
    ///
    /// `old` must still be in `vac`. For open edges, the inbetween vertices
    /// bounding `old` must already have been split, so that key vertex nodes
    /// exist at the instant of `key_edge` on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if `key_edge` is not a key edge, if a closed edge's
    /// nodes do not form a ring, or if an open edge node is not bounded by
    /// key vertex nodes at the split time. The cycle is left untouched in
    /// that case.
    pub fn replace_inbetween_edge(
        &mut self,
        old: CellId,
        before: CellId,
        key_edge: CellId,
        after: CellId,
        vac: &Vac,
    ) -> Result<()> {
        let Some(time) = vac.key_time(key_edge) else {
            return Err(TopologyError::WrongCellKind { expected: "key edge" }.into());
        };
        let old_nodes = self.get_nodes(old);
        if old_nodes.is_empty() {
            return Ok(());
        }
        if vac.is_closed_edge(old) {
            self.split_closed_inbetween_edge(old, &old_nodes, [before, key_edge, after])
        } else {
            self.split_open_inbetween_edge(&old_nodes, [before, key_edge, after], time, vac)
        }
    }

    fn split_closed_inbetween_edge(
        &mut self,
        old: CellId,
        old_nodes: &[NodeId],
        [before, key_edge, after]: [CellId; 3],
    ) -> Result<()> {
        let ring = self.ring_of(old_nodes[0], old)?;
        let n = ring.len();
        let side = self.nodes[ring[0]].side;

        let mut parts = Vec::with_capacity(n);
        for &id in &ring {
            let old_node = self.nodes[id].clone();
            let first_part = self.add_node(AnimatedCycleNode {
                before: old_node.before,
                ..AnimatedCycleNode::with_side(before, side)
            });
            let key = self.add_node(AnimatedCycleNode::with_side(key_edge, side));
            let last_part = self.add_node(AnimatedCycleNode {
                after: old_node.after,
                ..AnimatedCycleNode::with_side(after, side)
            });
            self.link_temporal(first_part, key);
            self.link_temporal(key, last_part);
            parts.push([first_part, key, last_part]);
        }
        for i in 0..n {
            for layer in 0..3 {
                self.link_spatial(parts[i][layer], parts[(i + 1) % n][layer]);
            }
        }

        for (&id, &[first_part, _, last_part]) in ring.iter().zip(&parts) {
            let old_node = self.nodes[id].clone();
            self.redirect_quasi(old_node.before, Link::After, id, first_part, Link::Previous);
            self.redirect_quasi(old_node.after, Link::Before, id, last_part, Link::Next);
            if self.first == Some(id) {
                self.first = Some(first_part);
            }
        }
        for id in &ring {
            self.nodes.remove(*id);
        }
        debug!(ring = n, "split closed inbetween edge");
        Ok(())
    }

    fn split_open_inbetween_edge(
        &mut self,
        old_nodes: &[NodeId],
        [before, key_edge, after]: [CellId; 3],
        time: Time,
        vac: &Vac,
    ) -> Result<()> {
        for &id in old_nodes {
            self.bounding_key_vertices(id, time, vac)?;
        }

        for &id in old_nodes {
            let (key_previous, key_next) = self.bounding_key_vertices(id, time, vac)?;
            let old_node = self.nodes[id].clone();
            let side = old_node.side;

            let first_previous = self.nodes[key_previous].before;
            let last_next = self.nodes[key_next].after;
            let first_part = self.add_node(AnimatedCycleNode {
                previous: first_previous,
                next: old_node.next,
                before: old_node.before,
                ..AnimatedCycleNode::with_side(before, side)
            });
            let key = self.add_node(AnimatedCycleNode {
                previous: Some(key_previous),
                next: Some(key_next),
                ..AnimatedCycleNode::with_side(key_edge, side)
            });
            let last_part = self.add_node(AnimatedCycleNode {
                previous: old_node.previous,
                next: last_next,
                after: old_node.after,
                ..AnimatedCycleNode::with_side(after, side)
            });
            self.link_temporal(first_part, key);
            self.link_temporal(key, last_part);

            // Nodes on the previous side: those after the key vertex now lead
            // to the last part, the key vertex to the key edge, and those
            // before it to the first part.
            let mut current = old_node.previous;
            let mut target = last_part;
            for _ in 0..=self.nodes.len() {
                let Some(quasi) = current.filter(|&q| self.link(q, Link::Next) == Some(id)) else {
                    break;
                };
                if quasi == key_previous {
                    self.nodes[quasi].next = Some(key);
                    target = first_part;
                } else {
                    self.nodes[quasi].next = Some(target);
                }
                current = self.nodes[quasi].before;
            }

            let mut current = old_node.next;
            let mut target = first_part;
            for _ in 0..=self.nodes.len() {
                let Some(quasi) = current.filter(|&q| self.link(q, Link::Previous) == Some(id))
                else {
                    break;
                };
                if quasi == key_next {
                    self.nodes[quasi].previous = Some(key);
                    target = last_part;
                } else {
                    self.nodes[quasi].previous = Some(target);
                }
                current = self.nodes[quasi].after;
            }

            self.redirect_quasi(old_node.before, Link::After, id, first_part, Link::Previous);
            self.redirect_quasi(old_node.after, Link::Before, id, last_part, Link::Next);

            if self.first == Some(id) {
                self.first = Some(first_part);
            }
            self.nodes.remove(id);
        }
        debug!(nodes = old_nodes.len(), %time, "split open inbetween edge");
        Ok(())
    }

    /// Retargets every node to the cell with the same integer id in `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if a referenced cell is
    /// missing from `from`, or its id from `to`. The cycle is left
    /// untouched in that case.
    pub fn remap_cells(&mut self, from: &Vac, to: &Vac) -> Result<()> {
        let targets = self
            .nodes
            .iter()
            .map(|(id, node)| {
                let key = from
                    .id(node.cell)
                    .ok_or_else(|| TopologyError::EntityNotFound(format!("{:?}", node.cell)))?;
                let cell = to
                    .get_cell(key)
                    .ok_or_else(|| TopologyError::EntityNotFound(format!("cell {key}")))?;
                Ok((id, cell))
            })
            .collect::<Result<Vec<_>>>()?;
        for (id, cell) in targets {
            self.nodes[id].cell = cell;
        }
        Ok(())
    }

    // --- Helpers ---

    fn link(&self, id: NodeId, link: Link) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| link.of(node))
    }

    /// Points `holder`'s `link` at `to` if it pointed at `from`.
    fn redirect(&mut self, holder: Option<NodeId>, link: Link, from: NodeId, to: NodeId) {
        if let Some(node) = holder.and_then(|id| self.nodes.get_mut(id)) {
            let slot = link.slot(node);
            if *slot == Some(from) {
                *slot = Some(to);
            }
        }
    }

    /// Redirects `link` from `from` to `to` on `start`, then on the nodes
    /// reached through `step` for as long as they also pointed at `from`.
    fn redirect_quasi(
        &mut self,
        start: Option<NodeId>,
        link: Link,
        from: NodeId,
        to: NodeId,
        step: Link,
    ) {
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            let Some(id) = current.filter(|&id| self.link(id, link) == Some(from)) else {
                return;
            };
            *link.slot(&mut self.nodes[id]) = Some(to);
            current = step.of(&self.nodes[id]);
        }
        warn!(?from, "quasi-neighbor walk did not terminate");
    }

    /// Nodes met following `next` from `start` until coming back to it.
    fn ring(&self, start: NodeId) -> Option<Vec<NodeId>> {
        let mut ring = Vec::new();
        let mut current = start;
        for _ in 0..self.nodes.len() {
            ring.push(current);
            current = self.link(current, Link::Next)?;
            if current == start {
                return Some(ring);
            }
        }
        warn!(?start, "ring walk does not come back to its start");
        None
    }

    /// The ring through `start`, which must only hold nodes on `cell`.
    fn ring_of(&self, start: NodeId, cell: CellId) -> Result<Vec<NodeId>> {
        let ring = self
            .ring(start)
            .ok_or_else(|| violated("closed edge nodes do not form a ring"))?;
        if ring.iter().any(|&id| self.nodes[id].cell != cell) {
            return Err(violated("closed edge ring mixes several cells"));
        }
        Ok(ring)
    }

    /// Key vertex nodes bounding an open inbetween edge node at `time`.
    fn bounding_key_vertices(&self, id: NodeId, time: Time, vac: &Vac) -> Result<(NodeId, NodeId)> {
        let key_vertex = |found: Option<NodeId>| {
            found.filter(|&node| self.node_type(node, vac) == NodeType::KeyVertex)
        };
        match (
            key_vertex(self.previous_at(id, time, vac)),
            key_vertex(self.next_at(id, time, vac)),
        ) {
            (Some(previous), Some(next)) => Ok((previous, next)),
            _ => Err(violated(format!(
                "inbetween edge is not bounded by key vertices at {time}"
            ))),
        }
    }
}
