pub mod edge_geometry;
pub mod edge_sample;

pub use edge_geometry::EdgeGeometry;
pub use edge_sample::EdgeSample;

/// Parameters controlling how boundaries are resampled.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    /// Target arclength between samples when sampling a whole cycle.
    pub cycle_spacing: f64,
    /// Target arclength between samples when interpolating inbetween edges.
    pub inbetween_spacing: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            cycle_spacing: 3.0,
            inbetween_spacing: 5.0,
        }
    }
}
