use std::cmp::Ordering;
use std::fmt;

/// A point on the animation timeline.
///
/// Key cells live at one exact `Time`; inbetween cells live on the open
/// interval between the times of their bounding key cells. Times built from
/// the same frame number compare exactly equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Time(f64);

impl Time {
    /// Creates a time from a floating-point value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Creates a time located exactly at an integer frame.
    #[must_use]
    pub fn from_frame(frame: i32) -> Self {
        Self(f64::from(frame))
    }

    /// Returns the time as a floating-point value.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Returns where `self` lies in `[start, end]` as a ratio in `[0, 1]`.
    ///
    /// Degenerate intervals clamp to `0` before `start` and `1` otherwise.
    #[must_use]
    pub fn ratio_between(self, start: Time, end: Time) -> f64 {
        let dt = end.0 - start.0;
        if dt > 0.0 {
            (self.0 - start.0) / dt
        } else if self.0 < start.0 {
            0.0
        } else {
            1.0
        }
    }

    /// Returns `true` if `self` lies strictly between `start` and `end`.
    #[must_use]
    pub fn is_strictly_between(self, start: Time, end: Time) -> bool {
        self.partial_cmp(&start) == Some(Ordering::Greater)
            && self.partial_cmp(&end) == Some(Ordering::Less)
    }
}

impl From<i32> for Time {
    fn from(frame: i32) -> Self {
        Self::from_frame(frame)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
