#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

use vac_cycles::animated::{
    AnimatedCycle, AnimatedCycleNode, CycleType, NodeId, UnresolvedAnimatedCycle,
};
use vac_cycles::boundary::{Cycle, Path};
use vac_cycles::geometry::EdgeGeometry;
use vac_cycles::math::polyline_2d::polyline_length;
use vac_cycles::math::{Point2, Time, Vector2};
use vac_cycles::topology::{CellId, InbetweenEdgeData, InbetweenFace, Vac};

// --- Warning capture ---

struct WarningCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarningCounter(Arc::clone(&count)));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}

// --- Fixtures ---

/// Two vertices joined by two bulging edges: `edges[0]` goes from
/// `vertices[0]` to `vertices[1]`, `edges[1]` comes back.
struct Ring {
    vertices: [CellId; 2],
    edges: [CellId; 2],
}

fn key_ring(vac: &mut Vac, time: Time, a: Point2, b: Point2) -> Ring {
    let va = vac.add_key_vertex(time, a);
    let vb = vac.add_key_vertex(time, b);
    let mid = Point2::from((a.coords + b.coords) / 2.0);
    let bulge = Vector2::new(0.0, 5.0);
    let there = EdgeGeometry::from_points(&[a, mid - bulge, b], false).unwrap();
    let back = EdgeGeometry::from_points(&[b, mid + bulge, a], false).unwrap();
    Ring {
        vertices: [va, vb],
        edges: [
            vac.add_key_edge(va, vb, there).unwrap(),
            vac.add_key_edge(vb, va, back).unwrap(),
        ],
    }
}

fn inbetween_ring(vac: &mut Vac, before: &Ring, after: &Ring) -> Ring {
    let vertices = [0, 1].map(|i| {
        vac.add_inbetween_vertex(before.vertices[i], after.vertices[i])
            .unwrap()
    });
    let edges = [0, 1].map(|i| {
        let data = InbetweenEdgeData::Open {
            before: Path::from_edges(&[before.edges[i]], vac),
            after: Path::from_edges(&[after.edges[i]], vac),
        };
        vac.add_inbetween_edge(data).unwrap()
    });
    Ring { vertices, edges }
}

/// Nodes in ring order: edge 0, vertex 1, edge 1, vertex 0.
fn add_ring(cycle: &mut AnimatedCycle, ring: &Ring) -> [NodeId; 4] {
    let ids = [
        ring.edges[0],
        ring.vertices[1],
        ring.edges[1],
        ring.vertices[0],
    ]
    .map(|cell| cycle.add_node(AnimatedCycleNode::new(cell)));
    for i in 0..4 {
        cycle.link_spatial(ids[i], ids[(i + 1) % 4]);
    }
    ids
}

struct Scenario {
    vac: Vac,
    cycle: AnimatedCycle,
    key0: Ring,
    inbetween: Ring,
    key1: Ring,
}

/// A non-simple animated cycle over `[0, 10]`: key rings at both ends and
/// an inbetween ring of two edges and two vertices in between.
fn scenario() -> Scenario {
    let mut vac = Vac::new();
    let key0 = key_ring(
        &mut vac,
        Time::from_frame(0),
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
    );
    let key1 = key_ring(
        &mut vac,
        Time::from_frame(10),
        Point2::new(0.0, 10.0),
        Point2::new(20.0, 10.0),
    );
    let inbetween = inbetween_ring(&mut vac, &key0, &key1);

    let mut cycle = AnimatedCycle::new();
    let n0 = add_ring(&mut cycle, &key0);
    let ni = add_ring(&mut cycle, &inbetween);
    let n1 = add_ring(&mut cycle, &key1);
    for i in 0..4 {
        cycle.link_temporal(n0[i], ni[i]);
        cycle.link_temporal(ni[i], n1[i]);
    }
    cycle.set_first(n0[0]);
    Scenario {
        vac,
        cycle,
        key0,
        inbetween,
        key1,
    }
}

fn assert_closed(points: &[Point2]) {
    assert!(points.len() >= 3, "{points:?}");
    assert_abs_diff_eq!(points[0], points[points.len() - 1], epsilon = 1e-9);
}

// --- Tests ---

#[test]
fn steiner_cycle_samples_one_point() {
    let mut vac = Vac::new();
    let k0 = vac.add_key_vertex(Time::from_frame(0), Point2::new(1.0, 1.0));
    let k1 = vac.add_key_vertex(Time::from_frame(4), Point2::new(5.0, 3.0));
    let iv = vac.add_inbetween_vertex(k0, k1).unwrap();

    let mut cycle = AnimatedCycle::new();
    let nodes = [k0, iv, k1].map(|cell| cycle.add_node(AnimatedCycleNode::new(cell)));
    for &id in &nodes {
        cycle.link_spatial(id, id);
    }
    cycle.link_temporal(nodes[0], nodes[1]);
    cycle.link_temporal(nodes[1], nodes[2]);
    cycle.set_first(nodes[0]);

    let points = cycle.sample(Time::from_frame(1), &vac);
    assert_eq!(points.len(), 1);
    assert_abs_diff_eq!(points[0], Point2::new(2.0, 1.5), epsilon = 1e-12);
    assert_eq!(cycle.sample(Time::from_frame(4), &vac), vec![Point2::new(5.0, 3.0)]);
}

#[test]
fn non_simple_scenario_samples_closed_polylines_without_warnings() {
    let s = scenario();
    let face = InbetweenFace::new(vec![s.cycle.clone()]);
    for frame in [0, 5, 10] {
        let time = Time::from_frame(frame);
        let (points, warnings) = count_warnings(|| s.cycle.sample(time, &s.vac));
        assert_eq!(warnings, 0, "frame {frame}");
        assert_closed(&points);
        assert_eq!(face.sample(time, &s.vac), vec![points]);
    }

    let first = s.cycle.get_node(Time::from_frame(5), &s.vac).unwrap();
    assert_eq!(s.cycle.node(first).unwrap().cell, s.inbetween.edges[0]);
    assert_eq!(s.cycle.cycle_type(first, Time::from_frame(5), &s.vac), CycleType::NonSimple);

    // key nodes bound the cycle themselves
    assert!(s.cycle.before_cells(&s.vac).is_empty());
}

#[test]
fn inbetween_ring_reports_bounding_key_cells() {
    let s = scenario();
    let mut cycle = AnimatedCycle::new();
    let ids = add_ring(&mut cycle, &s.inbetween);
    cycle.set_first(ids[0]);

    let before = cycle.before_cells(&s.vac);
    assert_eq!(before.len(), 4);
    assert!(before.contains(&s.key0.edges[1]));
    assert!(before.contains(&s.key0.vertices[0]));
    let after = cycle.after_cells(&s.vac);
    assert_eq!(after.len(), 4);
    assert!(after.contains(&s.key1.vertices[0]));
    assert_closed(&cycle.sample(Time::from_frame(3), &s.vac));
}

#[test]
fn malformed_cycle_logs_warnings() {
    let mut s = scenario();
    let vertex = s.cycle.get_nodes(s.inbetween.vertices[1])[0];
    s.cycle.node_mut(vertex).unwrap().next = None;
    let (_, warnings) = count_warnings(|| s.cycle.sample(Time::from_frame(5), &s.vac));
    assert!(warnings > 0);
}

#[test]
fn simple_cycle_round_trips_through_text() {
    let mut vac = Vac::new();
    let square = |half: f64| {
        EdgeGeometry::from_points(
            &[
                Point2::new(-half, -half),
                Point2::new(half, -half),
                Point2::new(half, half),
                Point2::new(-half, half),
            ],
            true,
        )
        .unwrap()
    };
    let k0 = vac.add_closed_key_edge(Time::from_frame(0), square(10.0));
    let k1 = vac.add_closed_key_edge(Time::from_frame(10), square(20.0));
    let edge = vac
        .add_inbetween_edge(InbetweenEdgeData::Closed {
            before: Cycle::from_edges(&[k0], &vac),
            after: Cycle::from_edges(&[k1], &vac),
        })
        .unwrap();

    // the same closed edge traversed twice
    let mut cycle = AnimatedCycle::new();
    let a = cycle.add_node(AnimatedCycleNode::new(edge));
    let b = cycle.add_node(AnimatedCycleNode::new(edge));
    cycle.link_spatial(a, b);
    cycle.link_spatial(b, a);
    cycle.set_first(a);

    let text = cycle.to_text(&vac).unwrap();
    let restored = text
        .parse::<UnresolvedAnimatedCycle>()
        .unwrap()
        .resolve(&vac)
        .unwrap();

    assert_eq!(restored.len(), 2);
    assert_eq!(restored.to_text(&vac).unwrap(), text);
    for frame in [1, 5, 9] {
        let time = Time::from_frame(frame);
        let points = cycle.sample(time, &vac);
        assert_closed(&points);
        assert_eq!(restored.sample(time, &vac), points);
    }
}

#[test]
fn splitting_closed_edge_multiplies_ring() {
    let mut vac = Vac::new();
    let t = Time::from_frame(0);
    let closed = vac.add_closed_key_edge(
        t,
        EdgeGeometry::from_points(
            &[
                Point2::new(-10.0, -10.0),
                Point2::new(10.0, -10.0),
                Point2::new(10.0, 10.0),
                Point2::new(-10.0, 10.0),
            ],
            true,
        )
        .unwrap(),
    );

    // ring of two nodes: the loop is traversed twice
    let mut cycle = AnimatedCycle::new();
    let a = cycle.add_node(AnimatedCycleNode::new(closed));
    let b = cycle.add_node(AnimatedCycleNode::new(closed));
    cycle.link_spatial(a, b);
    cycle.link_spatial(b, a);
    cycle.set_first(a);
    let before = cycle.sample(t, &vac);

    let corners = [(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0)]
        .map(|(x, y)| vac.add_key_vertex(t, Point2::new(x, y)));
    let straight = |from: Point2, to: Point2| EdgeGeometry::from_points(&[from, to], false).unwrap();
    let e1 = vac
        .add_key_edge(corners[0], corners[1], straight(Point2::new(-10.0, -10.0), Point2::new(10.0, -10.0)))
        .unwrap();
    let e2 = vac
        .add_key_edge(corners[1], corners[2], straight(Point2::new(10.0, -10.0), Point2::new(10.0, 10.0)))
        .unwrap();
    let e3 = vac
        .add_key_edge(
            corners[2],
            corners[0],
            EdgeGeometry::from_points(
                &[Point2::new(10.0, 10.0), Point2::new(-10.0, 10.0), Point2::new(-10.0, -10.0)],
                false,
            )
            .unwrap(),
        )
        .unwrap();

    cycle.replace_edges(closed, &[e1, e2, e3], &vac).unwrap();

    let edge_nodes = cycle
        .nodes()
        .into_iter()
        .filter(|&id| [e1, e2, e3].contains(&cycle.node(id).unwrap().cell))
        .count();
    assert_eq!(edge_nodes, 2 * 3);
    assert_eq!(cycle.len(), 2 * 3 * 2);
    assert!(cycle.get_nodes(closed).is_empty());

    let after = cycle.sample(t, &vac);
    assert_closed(&after);
    assert_abs_diff_eq!(polyline_length(&after), polyline_length(&before), epsilon = 1e-9);
    assert_abs_diff_eq!(polyline_length(&after), 160.0, epsilon = 1e-9);
}

#[test]
fn splitting_closed_edge_retargets_neighbor_ring() {
    let mut vac = Vac::new();
    let square = |half: f64| {
        EdgeGeometry::from_points(
            &[
                Point2::new(-half, -half),
                Point2::new(half, -half),
                Point2::new(half, half),
                Point2::new(-half, half),
            ],
            true,
        )
        .unwrap()
    };
    let k0 = vac.add_closed_key_edge(Time::from_frame(0), square(5.0));
    let k1 = vac.add_closed_key_edge(Time::from_frame(10), square(10.0));
    let between = vac
        .add_inbetween_edge(InbetweenEdgeData::Closed {
            before: Cycle::from_edges(&[k0], &vac),
            after: Cycle::from_edges(&[k1], &vac),
        })
        .unwrap();

    let mut cycle = AnimatedCycle::new();
    let nodes = [k0, between, k1].map(|cell| cycle.add_node(AnimatedCycleNode::new(cell)));
    for &id in &nodes {
        cycle.link_spatial(id, id);
    }
    cycle.link_temporal(nodes[0], nodes[1]);
    cycle.link_temporal(nodes[1], nodes[2]);
    cycle.set_first(nodes[0]);

    let t = Time::from_frame(10);
    let p = vac.add_key_vertex(t, Point2::new(-10.0, -10.0));
    let q = vac.add_key_vertex(t, Point2::new(10.0, 10.0));
    let lower = EdgeGeometry::from_points(
        &[Point2::new(-10.0, -10.0), Point2::new(10.0, -10.0), Point2::new(10.0, 10.0)],
        false,
    )
    .unwrap();
    let upper = EdgeGeometry::from_points(
        &[Point2::new(10.0, 10.0), Point2::new(-10.0, 10.0), Point2::new(-10.0, -10.0)],
        false,
    )
    .unwrap();
    let lower = vac.add_key_edge(p, q, lower).unwrap();
    let upper = vac.add_key_edge(q, p, upper).unwrap();

    let (result, warnings) = count_warnings(|| cycle.replace_edges(k1, &[lower, upper], &vac));
    result.unwrap();
    assert_eq!(warnings, 0);

    let retargeted = cycle.node(nodes[1]).unwrap().after.unwrap();
    assert_eq!(cycle.node(retargeted).unwrap().cell, lower);
    let points = cycle.sample(t, &vac);
    assert_closed(&points);
    assert_abs_diff_eq!(polyline_length(&points), 80.0, epsilon = 1e-9);
    assert_closed(&cycle.sample(Time::from_frame(5), &vac));
}

#[test]
fn splitting_inbetween_cells_at_a_key_time() {
    let mut s = scenario();
    let mid = Time::from_frame(5);
    let key_mid = key_ring(&mut s.vac, mid, Point2::new(0.0, 5.0), Point2::new(15.0, 5.0));
    let first_half = inbetween_ring(&mut s.vac, &s.key0, &key_mid);
    let second_half = inbetween_ring(&mut s.vac, &key_mid, &s.key1);

    let (results, warnings) = count_warnings(|| {
        let mut results = Vec::new();
        for i in 0..2 {
            results.push(s.cycle.replace_inbetween_vertex(
                s.inbetween.vertices[i],
                first_half.vertices[i],
                key_mid.vertices[i],
                second_half.vertices[i],
            ));
        }
        for i in 0..2 {
            results.push(s.cycle.replace_inbetween_edge(
                s.inbetween.edges[i],
                first_half.edges[i],
                key_mid.edges[i],
                second_half.edges[i],
                &s.vac,
            ));
        }
        results
    });
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(warnings, 0);

    assert_eq!(s.cycle.len(), 20);
    assert_eq!(s.cycle.nodes().len(), 20);
    for cell in s.inbetween.vertices.iter().chain(&s.inbetween.edges) {
        assert!(s.cycle.get_nodes(*cell).is_empty());
    }

    for frame in [0, 2, 5, 8, 10] {
        let time = Time::from_frame(frame);
        let (points, warnings) = count_warnings(|| s.cycle.sample(time, &s.vac));
        assert_eq!(warnings, 0, "frame {frame}");
        assert_closed(&points);
    }

    let at_key = s.cycle.sample(mid, &s.vac);
    assert_abs_diff_eq!(at_key[0], Point2::new(0.0, 5.0), epsilon = 1e-12);
    let start = s.cycle.get_node(mid, &s.vac).unwrap();
    assert_eq!(s.cycle.node(start).unwrap().cell, key_mid.edges[0]);
}

#[test]
fn split_with_unbounded_edge_is_rejected() {
    let mut s = scenario();
    let mid = Time::from_frame(5);
    let key_mid = key_ring(&mut s.vac, mid, Point2::new(0.0, 5.0), Point2::new(15.0, 5.0));
    let first_half = inbetween_ring(&mut s.vac, &s.key0, &key_mid);
    let second_half = inbetween_ring(&mut s.vac, &key_mid, &s.key1);

    // vertices were not split first
    let snapshot = s.cycle.to_text(&s.vac).unwrap();
    let result = s.cycle.replace_inbetween_edge(
        s.inbetween.edges[0],
        first_half.edges[0],
        key_mid.edges[0],
        second_half.edges[0],
        &s.vac,
    );
    assert!(result.is_err());
    assert_eq!(s.cycle.to_text(&s.vac).unwrap(), snapshot);
}
