use crate::math::Point2;

/// A sample of an edge centerline: a 2D position plus a stroke width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeSample {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl EdgeSample {
    /// Creates a new sample.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self { x, y, width }
    }

    /// Creates a zero-width sample at the given point.
    #[must_use]
    pub fn at(p: Point2) -> Self {
        Self::new(p.x, p.y, 0.0)
    }

    /// Returns the position of the sample.
    #[must_use]
    pub fn pos(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Linear interpolation towards `other`, width included.
    #[must_use]
    pub fn lerp(&self, u: f64, other: &EdgeSample) -> EdgeSample {
        EdgeSample::new(
            self.x + u * (other.x - self.x),
            self.y + u * (other.y - self.y),
            self.width + u * (other.width - self.width),
        )
    }

    /// Distance in the plane between two samples (width ignored).
    #[must_use]
    pub fn distance_to(&self, other: &EdgeSample) -> f64 {
        (other.pos() - self.pos()).norm()
    }
}
