//! Per-pixel path state and per-depth intersection records.

use glam::Vec3A;

use crate::material::Color;
use crate::ray::Ray;

/// Sentinel distance for "no hit".
pub const NO_HIT: f32 = -1.0;

/// Mutable state of one pixel's path through a single iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub ray: Ray,
    /// Nearest hit point found by the last intersection pass; the shader
    /// starts scattered rays from here.
    pub hit_point: Vec3A,
    /// Multiplicative color weight, starts at (1, 1, 1).
    pub throughput: Color,
    /// Destination pixel. Never changes after generation.
    pub pixel_index: u32,
    /// Bounces left; zero means the path is resolved.
    pub remaining_bounces: u32,
}

impl PathSegment {
    pub fn new(ray: Ray, pixel_index: u32, trace_depth: u32) -> Self {
        Self {
            ray,
            hit_point: ray.origin,
            throughput: Color::ONE,
            pixel_index,
            remaining_bounces: trace_depth,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_bounces > 0
    }

    /// Resolve the path with its current throughput scaled by `weight`.
    pub fn terminate(&mut self, weight: Color) {
        self.throughput *= weight;
        self.remaining_bounces = 0;
    }
}

impl Default for PathSegment {
    fn default() -> Self {
        Self::new(Ray::new(Vec3A::ZERO, Vec3A::Z), 0, 0)
    }
}

/// Nearest hit for one active path at one depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Hit distance, or [`NO_HIT`].
    pub t: f32,
    pub material_id: usize,
    pub surface_normal: Vec3A,
    /// Which side of the surface was hit, needed for refraction.
    pub outside: bool,
}

impl Intersection {
    pub const MISS: Intersection = Intersection {
        t: NO_HIT,
        material_id: 0,
        surface_normal: Vec3A::ZERO,
        outside: true,
    };

    pub fn is_hit(&self) -> bool {
        self.t > 0.0
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::MISS
    }
}
