use crate::error::{GeometryError, Result};
use crate::math::{Point2, TOLERANCE};

use super::EdgeSample;

/// Centerline of an edge, stored as a polyline parameterized by arclength.
///
/// For a closed geometry the last sample connects back to the first one;
/// the closing point is not stored twice.
#[derive(Debug, Clone)]
pub struct EdgeGeometry {
    samples: Vec<EdgeSample>,
    closed: bool,
    // arclength at each sample; for closed geometries one extra entry holds
    // the total length including the closing segment
    arclengths: Vec<f64>,
}

impl EdgeGeometry {
    /// Creates a geometry from samples.
    ///
    /// # Errors
    ///
    /// Returns an error if an open geometry has fewer than 2 samples or a
    /// closed one fewer than 3.
    pub fn new(samples: Vec<EdgeSample>, closed: bool) -> Result<Self> {
        let min = if closed { 3 } else { 2 };
        if samples.len() < min {
            return Err(GeometryError::Degenerate(format!(
                "edge geometry needs at least {min} samples, got {}",
                samples.len()
            ))
            .into());
        }
        let mut arclengths = Vec::with_capacity(samples.len() + 1);
        let mut acc = 0.0;
        arclengths.push(acc);
        for w in samples.windows(2) {
            acc += w[0].distance_to(&w[1]);
            arclengths.push(acc);
        }
        if closed {
            acc += samples[samples.len() - 1].distance_to(&samples[0]);
            arclengths.push(acc);
        }
        Ok(Self {
            samples,
            closed,
            arclengths,
        })
    }

    /// Creates a zero-width geometry from plain points.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EdgeGeometry::new`].
    pub fn from_points(points: &[Point2], closed: bool) -> Result<Self> {
        Self::new(points.iter().copied().map(EdgeSample::at).collect(), closed)
    }

    /// Returns `true` if the geometry is a loop.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the stored samples (without closing duplicate).
    #[must_use]
    pub fn samples(&self) -> &[EdgeSample] {
        &self.samples
    }

    /// Total arclength.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.arclengths.last().copied().unwrap_or(0.0)
    }

    /// Sample at arclength `s`.
    ///
    /// `s` is clamped to `[0, length]` for open geometries and wrapped for
    /// closed ones.
    #[must_use]
    pub fn pos(&self, s: f64) -> EdgeSample {
        let length = self.length();
        if length < TOLERANCE {
            return self.samples[0];
        }
        let s = if self.closed {
            s.rem_euclid(length)
        } else {
            s.clamp(0.0, length)
        };

        // index of the segment containing s
        let i = match self
            .arclengths
            .binary_search_by(|a| a.partial_cmp(&s).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => i.min(self.arclengths.len() - 2),
            Err(i) => i.saturating_sub(1).min(self.arclengths.len() - 2),
        };
        let a = self.samples[i];
        let b = self.samples[(i + 1) % self.samples.len()];
        let seg = self.arclengths[i + 1] - self.arclengths[i];
        if seg < TOLERANCE {
            return a;
        }
        a.lerp((s - self.arclengths[i]) / seg, &b)
    }

    /// Position at arclength `s`.
    #[must_use]
    pub fn pos2d(&self, s: f64) -> Point2 {
        self.pos(s).pos()
    }

    /// Sample at the start of the geometry.
    #[must_use]
    pub fn left_pos(&self) -> EdgeSample {
        self.samples[0]
    }

    /// Sample at the end of the geometry (equal to the start when closed).
    #[must_use]
    pub fn right_pos(&self) -> EdgeSample {
        if self.closed {
            self.samples[0]
        } else {
            self.samples[self.samples.len() - 1]
        }
    }

    /// Returns the centerline as points. Closed geometries repeat their first
    /// point at the end.
    #[must_use]
    pub fn sampling(&self) -> Vec<Point2> {
        let mut points: Vec<Point2> = self.samples.iter().map(EdgeSample::pos).collect();
        if self.closed {
            points.push(self.samples[0].pos());
        }
        points
    }
}
