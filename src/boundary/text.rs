use std::str::FromStr;

use crate::error::ParseError;
use crate::topology::{CellKind, Halfedge, Vac};

use super::{Cycle, Path};

/// A boundary read from text whose cell ids are not yet looked up.
///
/// Cells may be declared after the boundaries referencing them, so reading
/// happens in two steps: [`UnresolvedBoundary::parse`], then
/// [`UnresolvedBoundary::resolve_cycle`] or
/// [`UnresolvedBoundary::resolve_path`] once every cell exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedBoundary {
    Vertex(u32),
    Halfedges(Vec<(u32, bool)>),
}

impl UnresolvedBoundary {
    /// Parses `[e1+ e2- ...]` or `[v]`. Commas are accepted as separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the text holds no id or a token is malformed.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = text
            .split(|c: char| c == '[' || c == ']' || c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        let Some(first) = tokens.first() else {
            return Err(ParseError::Empty);
        };

        if tokens.len() == 1 && !first.ends_with(['+', '-']) {
            return parse_id(first).map(Self::Vertex);
        }
        tokens
            .iter()
            .map(|token| parse_halfedge(token))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Halfedges)
    }

    /// Looks the ids up in `vac` and builds a cycle.
    ///
    /// Unknown ids or cells of the wrong kind give an invalid cycle.
    #[must_use]
    pub fn resolve_cycle(&self, vac: &Vac) -> Cycle {
        match self {
            Self::Vertex(id) => match vac.get_cell(*id) {
                Some(v) if vac.kind(v) == Some(CellKind::KeyVertex) => Cycle::from_vertex(v),
                _ => Cycle::default(),
            },
            Self::Halfedges(list) => resolve_halfedges(list, vac)
                .map(|hes| Cycle::from_halfedges(hes, vac))
                .unwrap_or_default(),
        }
    }

    /// Looks the ids up in `vac` and builds a path.
    ///
    /// Unknown ids or cells of the wrong kind give an invalid path.
    #[must_use]
    pub fn resolve_path(&self, vac: &Vac) -> Path {
        match self {
            Self::Vertex(id) => match vac.get_cell(*id) {
                Some(v) if vac.kind(v) == Some(CellKind::KeyVertex) => Path::from_vertex(v),
                _ => Path::default(),
            },
            Self::Halfedges(list) => resolve_halfedges(list, vac)
                .map(|hes| Path::from_halfedges(hes, vac))
                .unwrap_or_default(),
        }
    }
}

impl FromStr for UnresolvedBoundary {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn resolve_halfedges(list: &[(u32, bool)], vac: &Vac) -> Option<Vec<Halfedge>> {
    list.iter()
        .map(|&(id, side)| {
            let edge = vac.get_cell(id)?;
            (vac.kind(edge) == Some(CellKind::KeyEdge)).then(|| Halfedge::new(edge, side))
        })
        .collect()
}

pub(crate) fn parse_id(token: &str) -> Result<u32, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::MalformedToken(token.to_owned()))
}

/// Splits `12+` into `(12, true)`. A token without sign reads as `true`.
pub(crate) fn parse_cell_ref(token: &str) -> Result<(u32, bool), ParseError> {
    if let Some(id) = token.strip_suffix('+') {
        Ok((parse_id(id)?, true))
    } else if let Some(id) = token.strip_suffix('-') {
        Ok((parse_id(id)?, false))
    } else {
        Ok((parse_id(token)?, true))
    }
}

fn parse_halfedge(token: &str) -> Result<(u32, bool), ParseError> {
    if token.ends_with(['+', '-']) {
        parse_cell_ref(token)
    } else {
        Err(ParseError::MalformedToken(token.to_owned()))
    }
}
