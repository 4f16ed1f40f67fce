//! Halfedge chaining and sampling shared by the boundary types.

use std::collections::{HashSet, VecDeque};

use crate::geometry::EdgeSample;
use crate::math::Time;
use crate::topology::{CellId, Halfedge, Vac};

/// Removes duplicates while keeping the first occurrence of each edge.
fn dedup(edges: &[CellId]) -> Vec<CellId> {
    let mut seen = HashSet::new();
    edges.iter().copied().filter(|e| seen.insert(*e)).collect()
}

/// Returns the shared time of a set of key edges, or `None` if the set is
/// empty, holds a non-key-edge cell, or spans several times.
pub(crate) fn common_time(edges: &[CellId], vac: &Vac) -> Option<Time> {
    let mut time = None;
    for &e in edges {
        let t = vac.key_edge(e).ok()?.time;
        match time {
            None => time = Some(t),
            Some(t0) if t0 != t => return None,
            Some(_) => {}
        }
    }
    time
}

/// Chains an unordered set of key edges into a simple closed loop.
///
/// Returns an empty list when the edges do not form exactly one simple loop.
pub(crate) fn chain_loop(edges: &[CellId], vac: &Vac) -> Vec<Halfedge> {
    let mut remaining = dedup(edges);
    if remaining.is_empty() || common_time(&remaining, vac).is_none() {
        return Vec::new();
    }

    let first = remaining.remove(0);
    let seed = Halfedge::new(first, true);
    if vac.is_closed_edge(first) {
        return if remaining.is_empty() {
            vec![seed]
        } else {
            Vec::new()
        };
    }

    let mut chain = vec![seed];
    while !remaining.is_empty() {
        let Some(last) = chain.last().and_then(|he| he.end_vertex(vac)) else {
            return Vec::new();
        };
        let found = remaining.iter().enumerate().find_map(|(i, &e)| {
            if vac.edge_start_vertex(e) == Some(last) {
                Some((i, Halfedge::new(e, true)))
            } else if vac.edge_end_vertex(e) == Some(last) {
                Some((i, Halfedge::new(e, false)))
            } else {
                None
            }
        });
        let Some((i, he)) = found else {
            return Vec::new();
        };
        remaining.remove(i);
        chain.push(he);
    }

    if !closes(&chain, vac) {
        return Vec::new();
    }
    let mut starts = HashSet::new();
    if !chain.iter().all(|he| starts.insert(he.start_vertex(vac))) {
        return Vec::new();
    }
    chain
}

/// Chains an unordered set of open key edges into an open path, growing it
/// from both ends.
///
/// Returns an empty list when the set holds a closed edge or cannot be
/// walked in one piece. When `allow_looping` is `false`, chains whose last
/// vertex equals their first vertex are rejected as well.
pub(crate) fn chain_path(edges: &[CellId], vac: &Vac, allow_looping: bool) -> Vec<Halfedge> {
    let mut remaining = dedup(edges);
    if remaining.is_empty() || common_time(&remaining, vac).is_none() {
        return Vec::new();
    }
    if remaining.iter().any(|&e| vac.is_closed_edge(e)) {
        return Vec::new();
    }

    let first = remaining.remove(0);
    let mut chain = VecDeque::from([Halfedge::new(first, true)]);
    while !remaining.is_empty() {
        let last = chain.back().and_then(|he| he.end_vertex(vac));
        let start = chain.front().and_then(|he| he.start_vertex(vac));

        let appended = remaining.iter().enumerate().find_map(|(i, &e)| {
            if last.is_some() && vac.edge_start_vertex(e) == last {
                Some((i, Halfedge::new(e, true)))
            } else if last.is_some() && vac.edge_end_vertex(e) == last {
                Some((i, Halfedge::new(e, false)))
            } else {
                None
            }
        });
        if let Some((i, he)) = appended {
            remaining.remove(i);
            chain.push_back(he);
            continue;
        }

        let prepended = remaining.iter().enumerate().find_map(|(i, &e)| {
            if start.is_some() && vac.edge_end_vertex(e) == start {
                Some((i, Halfedge::new(e, true)))
            } else if start.is_some() && vac.edge_start_vertex(e) == start {
                Some((i, Halfedge::new(e, false)))
            } else {
                None
            }
        });
        let Some((i, he)) = prepended else {
            return Vec::new();
        };
        remaining.remove(i);
        chain.push_front(he);
    }

    let chain: Vec<Halfedge> = chain.into();
    if !allow_looping && closes(&chain, vac) {
        return Vec::new();
    }
    chain
}

/// Returns `true` if consecutive halfedges share their end/start vertex.
pub(crate) fn is_continuous(halfedges: &[Halfedge], vac: &Vac) -> bool {
    halfedges.windows(2).all(|w| {
        let end = w[0].end_vertex(vac);
        end.is_some() && end == w[1].start_vertex(vac)
    })
}

/// Returns `true` if the last halfedge ends where the first one starts.
pub(crate) fn closes(halfedges: &[Halfedge], vac: &Vac) -> bool {
    match (halfedges.first(), halfedges.last()) {
        (Some(first), Some(last)) => {
            let start = first.start_vertex(vac);
            start.is_some() && start == last.end_vertex(vac)
        }
        _ => false,
    }
}

/// Start vertices and edges of a chain, each once.
pub(crate) fn chain_cells(halfedges: &[Halfedge], vac: &Vac) -> HashSet<CellId> {
    let mut cells = HashSet::new();
    for he in halfedges {
        if let Some(v) = he.start_vertex(vac) {
            cells.insert(v);
        }
        cells.insert(he.edge);
    }
    cells
}

/// Replaces every halfedge over `old` by the ordered `new_edges`, reversed
/// for halfedges traversing `old` backwards.
pub(crate) fn splice_edges(halfedges: &[Halfedge], old: CellId, new_edges: &[CellId]) -> Vec<Halfedge> {
    let mut res = Vec::with_capacity(halfedges.len() + new_edges.len());
    for &he in halfedges {
        if he.edge != old {
            res.push(he);
        } else if he.side {
            res.extend(new_edges.iter().map(|&e| Halfedge::new(e, true)));
        } else {
            res.extend(new_edges.iter().rev().map(|&e| Halfedge::new(e, false)));
        }
    }
    res
}

/// Retargets halfedges over `old.edge` to `new.edge`, composing orientations.
pub(crate) fn replace_halfedge(halfedges: &mut [Halfedge], old: Halfedge, new: Halfedge) {
    for he in halfedges.iter_mut().filter(|he| he.edge == old.edge) {
        he.edge = new.edge;
        he.side = (he.side == old.side) == new.side;
    }
}

/// Reverses a chain and flips every halfedge.
pub(crate) fn reversed(halfedges: &[Halfedge]) -> Vec<Halfedge> {
    halfedges.iter().rev().map(|he| he.opposite()).collect()
}

/// Sum of the halfedge lengths.
pub(crate) fn length(halfedges: &[Halfedge], vac: &Vac) -> f64 {
    halfedges.iter().map(|he| he.length(vac)).sum()
}

/// `n` samples evenly spaced by arclength from the start of the chain to
/// its end, both included.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample(halfedges: &[Halfedge], n: usize, vac: &Vac) -> Vec<EdgeSample> {
    let Some(&first) = halfedges.first() else {
        return Vec::new();
    };
    let ds = if n > 1 {
        length(halfedges, vac) / (n - 1) as f64
    } else {
        0.0
    };

    let mut out = Vec::with_capacity(n);
    let mut cumulative = 0.0;
    let mut index = 0;
    let mut he = first;
    let mut he_length = he.length(vac);
    for i in 0..n {
        let s = i as f64 * ds;
        while s > cumulative + he_length && index + 1 < halfedges.len() {
            cumulative += he_length;
            index += 1;
            he = halfedges[index];
            he_length = he.length(vac);
        }
        out.push(he.sample(vac, s - cumulative));
    }
    out
}
