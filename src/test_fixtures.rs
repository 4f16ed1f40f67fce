//! Small complexes shared by unit tests.
#![allow(clippy::unwrap_used)]

use std::f64::consts::TAU;

use crate::geometry::EdgeGeometry;
use crate::math::{Point2, Time};
use crate::topology::{CellId, Vac};

pub(crate) fn straight_edge(vac: &mut Vac, a: CellId, b: CellId) -> CellId {
    let pa = vac.key_vertex(a).unwrap().pos;
    let pb = vac.key_vertex(b).unwrap().pos;
    let geometry = EdgeGeometry::from_points(&[pa, pb], false).unwrap();
    vac.add_key_edge(a, b, geometry).unwrap()
}

/// Regular polygon of radius 10 with `n` vertices, edge `i` going from
/// vertex `i` to vertex `i + 1`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn polygon(vac: &mut Vac, time: Time, n: usize) -> (Vec<CellId>, Vec<CellId>) {
    let vertices: Vec<CellId> = (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            vac.add_key_vertex(time, Point2::new(10.0 * angle.cos(), 10.0 * angle.sin()))
        })
        .collect();
    let edges = (0..n)
        .map(|i| straight_edge(vac, vertices[i], vertices[(i + 1) % n]))
        .collect();
    (vertices, edges)
}

/// Closed key edge along the 20x20 square centered on the origin.
pub(crate) fn closed_loop(vac: &mut Vac, time: Time) -> CellId {
    let geometry = EdgeGeometry::from_points(
        &[
            Point2::new(-10.0, -10.0),
            Point2::new(10.0, -10.0),
            Point2::new(10.0, 10.0),
            Point2::new(-10.0, 10.0),
        ],
        true,
    )
    .unwrap();
    vac.add_closed_key_edge(time, geometry)
}

/// Two triangles sharing one vertex.
pub(crate) fn figure_eight(vac: &mut Vac, time: Time) -> Vec<CellId> {
    let c = vac.add_key_vertex(time, Point2::origin());
    let a1 = vac.add_key_vertex(time, Point2::new(-10.0, 5.0));
    let b1 = vac.add_key_vertex(time, Point2::new(-10.0, -5.0));
    let a2 = vac.add_key_vertex(time, Point2::new(10.0, 5.0));
    let b2 = vac.add_key_vertex(time, Point2::new(10.0, -5.0));
    vec![
        straight_edge(vac, c, a1),
        straight_edge(vac, a1, b1),
        straight_edge(vac, b1, c),
        straight_edge(vac, c, a2),
        straight_edge(vac, a2, b2),
        straight_edge(vac, b2, c),
    ]
}

/// Three distinct edges joining the same two vertices.
pub(crate) fn theta(vac: &mut Vac, time: Time) -> Vec<CellId> {
    let p = vac.add_key_vertex(time, Point2::new(-10.0, 0.0));
    let q = vac.add_key_vertex(time, Point2::new(10.0, 0.0));
    [-5.0, 0.0, 5.0]
        .into_iter()
        .map(|y| {
            let geometry = EdgeGeometry::from_points(
                &[Point2::new(-10.0, 0.0), Point2::new(0.0, y), Point2::new(10.0, 0.0)],
                false,
            )
            .unwrap();
            vac.add_key_edge(p, q, geometry).unwrap()
        })
        .collect()
}
