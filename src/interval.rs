//! Interval arithmetic for ray parameter ranges.

/// Interval [min, max] of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with its upper bound pulled in to `max`.
    pub fn with_max(self, max: f32) -> Self {
        Self { min: self.min, max }
    }
}

/// Hit distances accepted by the intersection engine.
impl Interval {
    /// Strictly positive distances, with a small lower bound against
    /// self-intersection at the ray origin.
    pub const FORWARD: Interval = Interval {
        min: 1.0e-4,
        max: f32::INFINITY,
    };
}
