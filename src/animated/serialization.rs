//! Text form of animated cycles.
//!
//! A cycle is written as `[1:(15+,2,5,_,_) 2:(12,1,2,3,4)]`: each node gets
//! a local id, followed by its cell id (with a side suffix for edges) and the
//! local ids of its previous, next, before and after nodes, `_` standing for
//! a missing link.

use std::collections::HashMap;
use std::str::FromStr;

use crate::boundary::text::{parse_cell_ref, parse_id};
use crate::error::{ParseError, Result, TopologyError};
use crate::topology::Vac;

use super::{AnimatedCycle, AnimatedCycleNode, NodeId};

const FIELDS_PER_NODE: usize = 6;

impl AnimatedCycle {
    /// Writes the reachable nodes, numbered from 1 in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if a node refers to a cell
    /// that is no longer in `vac`.
    pub fn to_text(&self, vac: &Vac) -> Result<String> {
        let order = self.nodes();
        let local: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i + 1)).collect();
        let link = |target: Option<NodeId>| {
            target
                .and_then(|id| local.get(&id))
                .map_or_else(|| "_".to_owned(), ToString::to_string)
        };

        let tokens = order
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let node = &self.nodes[id];
                let cell = vac.require_id(node.cell)?;
                let side = match vac.kind(node.cell) {
                    Some(kind) if kind.is_edge() && node.side => "+",
                    Some(kind) if kind.is_edge() => "-",
                    _ => "",
                };
                Ok(format!(
                    "{}:({cell}{side},{},{},{},{})",
                    i + 1,
                    link(node.previous),
                    link(node.next),
                    link(node.before),
                    link(node.after)
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("[{}]", tokens.join(" ")))
    }
}

/// One node read from text, links given as indices into the node list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedNode {
    pub cell: u32,
    pub side: bool,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub before: Option<usize>,
    pub after: Option<usize>,
}

/// An animated cycle read from text whose cell ids are not yet looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnresolvedAnimatedCycle {
    pub nodes: Vec<UnresolvedNode>,
}

impl UnresolvedAnimatedCycle {
    /// Parses the text form. Brackets, parentheses, commas, colons and
    /// whitespace all separate fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the field count is not a multiple of six, a
    /// token is malformed, a node id is declared twice, or a link names a
    /// node id that is not declared.
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        let tokens: Vec<&str> = text
            .split(|c: char| "[](),:".contains(c) || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() % FIELDS_PER_NODE != 0 {
            return Err(ParseError::WrongFieldCount {
                expected: FIELDS_PER_NODE,
                found: tokens.len(),
            });
        }

        let groups: Vec<&[&str]> = tokens.chunks(FIELDS_PER_NODE).collect();
        let mut index = HashMap::with_capacity(groups.len());
        for (i, group) in groups.iter().enumerate() {
            let id = parse_id(group[0])?;
            if index.insert(id, i).is_some() {
                return Err(ParseError::DuplicateNodeId(id));
            }
        }
        let link = |token: &str| -> std::result::Result<Option<usize>, ParseError> {
            if token == "_" {
                return Ok(None);
            }
            let id = parse_id(token)?;
            index.get(&id).copied().map(Some).ok_or(ParseError::UnknownNodeId(id))
        };

        let nodes = groups
            .iter()
            .map(|group| {
                let (cell, side) = parse_cell_ref(group[1])?;
                Ok(UnresolvedNode {
                    cell,
                    side,
                    previous: link(group[2])?,
                    next: link(group[3])?,
                    before: link(group[4])?,
                    after: link(group[5])?,
                })
            })
            .collect::<std::result::Result<Vec<_>, ParseError>>()?;
        Ok(Self { nodes })
    }

    /// Looks the cell ids up in `vac` and builds the node graph.
    ///
    /// The first node of the result is reached from the first listed node
    /// by following `before` links as far as they go.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if a cell id is unknown.
    pub fn resolve(&self, vac: &Vac) -> Result<AnimatedCycle> {
        let mut cycle = AnimatedCycle::new();
        let ids = self
            .nodes
            .iter()
            .map(|node| {
                let cell = vac
                    .get_cell(node.cell)
                    .ok_or_else(|| TopologyError::EntityNotFound(format!("cell {}", node.cell)))?;
                Ok(cycle.add_node(AnimatedCycleNode::with_side(cell, node.side)))
            })
            .collect::<Result<Vec<_>>>()?;

        for (node, &id) in self.nodes.iter().zip(&ids) {
            if let Some(resolved) = cycle.node_mut(id) {
                resolved.previous = node.previous.map(|i| ids[i]);
                resolved.next = node.next.map(|i| ids[i]);
                resolved.before = node.before.map(|i| ids[i]);
                resolved.after = node.after.map(|i| ids[i]);
            }
        }

        if !self.nodes.is_empty() {
            let mut first = 0;
            for _ in 0..self.nodes.len() {
                match self.nodes[first].before {
                    Some(before) => first = before,
                    None => break,
                }
            }
            cycle.set_first(ids[first]);
        }
        Ok(cycle)
    }
}

impl FromStr for UnresolvedAnimatedCycle {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}
