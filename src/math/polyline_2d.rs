use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A repeated closing
/// point contributes nothing.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the total length of an open polyline.
#[must_use]
pub fn polyline_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Signed angle turned when going from segment `ab` to segment `bc`.
///
/// Zero if either segment is degenerate.
#[must_use]
pub fn turn_angle(a: Point2, b: Point2, c: Point2) -> f64 {
    let ab = b - a;
    let bc = c - b;
    if ab.norm_squared() < TOLERANCE * TOLERANCE || bc.norm_squared() < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    let dot = ab.x * bc.x + ab.y * bc.y;
    let det = ab.x * bc.y - ab.y * bc.x;
    det.atan2(dot)
}

/// Sums the signed turn angles of a closed sampled loop whose last sample
/// duplicates the first.
///
/// Loops with 4 samples or fewer are considered too coarse and yield `0`.
#[must_use]
pub fn closed_loop_turning(samples: &[Point2]) -> f64 {
    let n = samples.len();
    if n <= 4 {
        return 0.0;
    }
    let m = n - 1;
    (0..m)
        .map(|i| {
            let a = samples[(m + i - 1) % m];
            let b = samples[i % m];
            let c = samples[(i + 1) % m];
            turn_angle(a, b, c)
        })
        .sum()
}
