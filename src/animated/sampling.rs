//! Polyline sampling of an animated cycle at a given time.

use tracing::warn;

use crate::math::{Point2, Time};
use crate::topology::Vac;

use super::{AnimatedCycle, CycleType, NodeId};

impl AnimatedCycle {
    /// Samples the ring alive at `time` as a closed polyline.
    ///
    /// A Steiner ring gives its single vertex position. Simple and
    /// non-simple rings give a polyline whose last point repeats the first.
    /// Malformed rings log a warning and give the points gathered before the
    /// fault.
    #[must_use]
    pub fn sample(&self, time: Time, vac: &Vac) -> Vec<Point2> {
        let mut out = Vec::new();
        let Some(node) = self.get_node(time, vac) else {
            warn!(%time, "cannot sample animated cycle: no node alive at time");
            return out;
        };
        match self.cycle_type(node, time, vac) {
            CycleType::Steiner => {
                let cell = self.nodes[node].cell;
                match vac.vertex_pos(cell, time) {
                    Some(pos) => out.push(pos),
                    None => warn!(?cell, "Steiner vertex has no position"),
                }
            }
            CycleType::Simple => {
                if self.sample_simple(node, time, vac, &mut out) {
                    close(&mut out);
                }
            }
            CycleType::NonSimple => {
                if self.sample_non_simple(node, time, vac, &mut out) {
                    close(&mut out);
                }
            }
            CycleType::Invalid => warn!(%time, "cannot sample invalid animated cycle"),
        }
        out
    }

    /// Closed edges all of the same kind, each followed by the next.
    fn sample_simple(&self, start: NodeId, time: Time, vac: &Vac, out: &mut Vec<Point2>) -> bool {
        let kind = self.node_type(start, vac);
        let mut current = start;
        for _ in 0..=self.nodes.len() {
            if self.node_type(current, vac) != kind {
                warn!(?current, "simple ring mixes key and inbetween closed edges");
                return false;
            }
            self.append_edge(current, time, vac, out);
            let Some(next) = self.next_at(current, time, vac) else {
                warn!(?current, "simple ring is broken: missing next node");
                return false;
            };
            current = next;
            if current == start {
                return true;
            }
        }
        warn!("simple ring does not come back to its start");
        false
    }

    /// Open edges separated by vertices, starting from the first edge.
    fn sample_non_simple(
        &self,
        node: NodeId,
        time: Time,
        vac: &Vac,
        out: &mut Vec<Point2>,
    ) -> bool {
        let start = if self.node_type(node, vac).is_vertex() {
            match self.next_at(node, time, vac) {
                Some(next) => next,
                None => {
                    warn!(?node, "non-simple ring is broken: vertex without next");
                    return false;
                }
            }
        } else {
            node
        };

        let mut current = start;
        for _ in 0..=self.nodes.len() {
            if !self.node_type(current, vac).is_open_edge() {
                warn!(?current, "non-simple ring expected an open edge node");
                return false;
            }
            self.append_edge(current, time, vac, out);

            let Some(vertex) = self.next_at(current, time, vac) else {
                warn!(?current, "non-simple ring is broken: edge without next");
                return false;
            };
            let Some(next) = self.next_at(vertex, time, vac) else {
                warn!(?vertex, "non-simple ring is broken: vertex without next");
                return false;
            };
            current = next;
            if current == start {
                return true;
            }
        }
        warn!("non-simple ring does not come back to its start");
        false
    }

    /// Appends the edge centerline along the node's side, without its last
    /// point.
    fn append_edge(&self, id: NodeId, time: Time, vac: &Vac, out: &mut Vec<Point2>) {
        let node = &self.nodes[id];
        let sampling = vac.edge_sampling(node.cell, time);
        let Some(kept) = sampling.len().checked_sub(1) else {
            warn!(cell = ?node.cell, %time, "edge has no sampling");
            return;
        };
        if node.side {
            out.extend_from_slice(&sampling[..kept]);
        } else {
            out.extend(sampling[1..].iter().rev());
        }
    }
}

fn close(out: &mut Vec<Point2>) {
    if let Some(&first) = out.first() {
        out.push(first);
    }
}
