use std::collections::{HashMap, HashSet};

use crate::math::Time;
use crate::topology::{CellId, Vac};

use super::chain;
use super::{ProperCycle, ProperPath};

/// Decomposition of a connected set of key edges into simple loops plus
/// leftover one-edge paths, as used for the holes of a face.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CycleHelper {
    #[default]
    Invalid,
    /// A hole pinched to one key vertex.
    SingleVertex(CellId),
    Loops {
        loops: Vec<ProperCycle>,
        paths: Vec<ProperPath>,
    },
}

/// Local copy of the edge graph, consumed while loops are extracted.
struct EdgeGraph {
    edges: Vec<LocalEdge>,
    incident: Vec<Vec<usize>>,
}

#[derive(Clone, Copy)]
struct LocalEdge {
    cell: CellId,
    start: usize,
    end: usize,
}

impl LocalEdge {
    fn other(&self, vertex: usize) -> usize {
        if self.start == vertex {
            self.end
        } else {
            self.start
        }
    }
}

impl EdgeGraph {
    /// Builds the graph; `None` if an edge is closed.
    fn new(edges: &[CellId], vac: &Vac) -> Option<Self> {
        let mut index = HashMap::new();
        let mut graph = Self {
            edges: Vec::with_capacity(edges.len()),
            incident: Vec::new(),
        };
        for &cell in edges {
            let start = vac.edge_start_vertex(cell)?;
            let end = vac.edge_end_vertex(cell)?;
            let mut vertex_index = |v: CellId| {
                *index.entry(v).or_insert_with(|| {
                    graph.incident.push(Vec::new());
                    graph.incident.len() - 1
                })
            };
            let (start, end) = (vertex_index(start), vertex_index(end));
            let e = graph.edges.len();
            graph.edges.push(LocalEdge { cell, start, end });
            graph.incident[start].push(e);
            if end != start {
                graph.incident[end].push(e);
            }
        }
        Some(graph)
    }

    fn num_vertices(&self) -> usize {
        self.incident.len()
    }

    fn is_connected(&self) -> bool {
        let mut seen = vec![false; self.num_vertices()];
        let mut stack = vec![0];
        seen[0] = true;
        while let Some(v) = stack.pop() {
            for &e in &self.incident[v] {
                let w = self.edges[e].other(v);
                if !seen[w] {
                    seen[w] = true;
                    stack.push(w);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }

    fn remove_edge(&mut self, e: usize) {
        let LocalEdge { start, end, .. } = self.edges[e];
        self.incident[start].retain(|&x| x != e);
        self.incident[end].retain(|&x| x != e);
    }

    fn remaining_edges(&self) -> Vec<usize> {
        let mut edges: Vec<usize> = self.incident.iter().flatten().copied().collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Depth-first search for one loop of the residual graph.
    ///
    /// Returns the local indices of the loop edges.
    fn find_loop(&self) -> Option<Vec<usize>> {
        let n = self.num_vertices();
        let mut visited = vec![false; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];

        for root in 0..n {
            if visited[root] || self.incident[root].is_empty() {
                continue;
            }
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                if visited[node] {
                    continue;
                }
                visited[node] = true;
                for &e in &self.incident[node] {
                    if Some(e) == parent[node] {
                        continue;
                    }
                    let child = self.edges[e].other(node);
                    if visited[child] {
                        return Some(self.close_loop(e, node, child, &parent));
                    }
                    parent[child] = Some(e);
                    stack.push(child);
                }
            }
        }
        None
    }

    /// Edge `e` joins `node` to the already visited `child`: the loop is `e`
    /// plus the tree paths from both ends up to their common ancestor.
    fn close_loop(&self, e: usize, node: usize, child: usize, parent: &[Option<usize>]) -> Vec<usize> {
        let ancestors_of = |mut v: usize| {
            let mut chain = vec![v];
            while let Some(pe) = parent[v] {
                v = self.edges[pe].other(v);
                chain.push(v);
            }
            chain
        };
        let from_node = ancestors_of(node);
        let from_child = ancestors_of(child);
        let on_node_side: HashSet<usize> = from_node.iter().copied().collect();
        let common = from_child
            .iter()
            .copied()
            .find(|v| on_node_side.contains(v))
            .unwrap_or(node);

        let mut edges = vec![e];
        for start in [node, child] {
            let mut v = start;
            while v != common {
                let Some(pe) = parent[v] else { break };
                edges.push(pe);
                v = self.edges[pe].other(v);
            }
        }
        edges
    }
}

impl CycleHelper {
    /// A hole reduced to one key vertex.
    #[must_use]
    pub fn from_vertex(vertex: CellId) -> Self {
        Self::SingleVertex(vertex)
    }

    /// Decomposes a connected set of key edges at one time.
    ///
    /// Loops are extracted one at a time from the residual graph, each
    /// extraction restarting the search. Edges left over become one-edge
    /// paths. The result is invalid when the set is empty, spans several
    /// times, mixes a closed edge with others, is disconnected, or fails the
    /// Euler characteristic check.
    #[must_use]
    pub fn from_edges(edges: &[CellId], vac: &Vac) -> Self {
        let mut seen = HashSet::new();
        let edges: Vec<CellId> = edges.iter().copied().filter(|e| seen.insert(*e)).collect();
        if edges.is_empty() || chain::common_time(&edges, vac).is_none() {
            return Self::Invalid;
        }

        if let [single] = edges.as_slice() {
            if vac.is_closed_edge(*single) {
                let lone = ProperCycle::from_edges(&edges, vac);
                return Self::Loops {
                    loops: vec![lone],
                    paths: Vec::new(),
                };
            }
        }

        let Some(mut graph) = EdgeGraph::new(&edges, vac) else {
            return Self::Invalid;
        };
        if !graph.is_connected() {
            return Self::Invalid;
        }
        let num_vertices = graph.num_vertices();

        let mut loops = Vec::new();
        while let Some(loop_edges) = graph.find_loop() {
            let cells: Vec<CellId> = loop_edges.iter().map(|&e| graph.edges[e].cell).collect();
            for &e in &loop_edges {
                graph.remove_edge(e);
            }
            loops.push(ProperCycle::from_edges(&cells, vac));
        }
        let paths: Vec<ProperPath> = graph
            .remaining_edges()
            .into_iter()
            .map(|e| ProperPath::from_edges(&[graph.edges[e].cell], vac))
            .collect();

        if euler_characteristic(&loops, &paths, num_vertices) != 0 {
            return Self::Invalid;
        }
        Self::Loops { loops, paths }
    }

    /// Returns `true` for single-vertex and non-empty loop decompositions.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Invalid => false,
            Self::SingleVertex(_) => true,
            Self::Loops { loops, paths } => !loops.is_empty() || !paths.is_empty(),
        }
    }

    /// Returns `true` for a hole pinched to one vertex.
    #[must_use]
    pub fn is_single_vertex(&self) -> bool {
        matches!(self, Self::SingleVertex(_))
    }

    /// The vertex of a single-vertex hole.
    #[must_use]
    pub fn vertex(&self) -> Option<CellId> {
        match self {
            Self::SingleVertex(v) => Some(*v),
            _ => None,
        }
    }

    /// The extracted loops.
    #[must_use]
    pub fn loops(&self) -> &[ProperCycle] {
        match self {
            Self::Loops { loops, .. } => loops,
            _ => &[],
        }
    }

    /// The leftover one-edge paths.
    #[must_use]
    pub fn paths(&self) -> &[ProperPath] {
        match self {
            Self::Loops { paths, .. } => paths,
            _ => &[],
        }
    }

    /// Time of the decomposition, `None` when invalid.
    #[must_use]
    pub fn time(&self, vac: &Vac) -> Option<Time> {
        match self {
            Self::Invalid => None,
            Self::SingleVertex(v) => vac.key_time(*v),
            Self::Loops { loops, paths } => loops
                .first()
                .and_then(|l| l.time(vac))
                .or_else(|| paths.first().and_then(|p| p.time(vac))),
        }
    }

    /// Key cells of every loop and path.
    #[must_use]
    pub fn cells(&self, vac: &Vac) -> HashSet<CellId> {
        match self {
            Self::Invalid => HashSet::new(),
            Self::SingleVertex(v) => HashSet::from([*v]),
            Self::Loops { loops, paths } => loops
                .iter()
                .map(|l| l.cells(vac))
                .chain(paths.iter().map(|p| p.cells(vac)))
                .flatten()
                .collect(),
        }
    }

    /// Replaces `old` by the ordered chain `new_edges` in every loop and path.
    pub fn replace_edges(&mut self, old: CellId, new_edges: &[CellId]) {
        if let Self::Loops { loops, paths } = self {
            for l in loops {
                l.replace_edges(old, new_edges);
            }
            for p in paths {
                p.replace_edges(old, new_edges);
            }
        }
    }
}

/// `1 + Σ|loop| + Σ(|path| + 1) − V − L − P`; zero for a connected set split
/// into loops and paths without leftover.
#[allow(clippy::cast_possible_wrap)]
fn euler_characteristic(loops: &[ProperCycle], paths: &[ProperPath], num_vertices: usize) -> i64 {
    let loop_vertices: usize = loops.iter().map(ProperCycle::len).sum();
    let path_vertices: usize = paths.iter().map(|p| p.len() + 1).sum();
    1 + loop_vertices as i64 + path_vertices as i64
        - num_vertices as i64
        - loops.len() as i64
        - paths.len() as i64
}
