//! Ray-object intersection capability.
//!
//! Defines the Hittable trait implemented by every primitive variant and
//! SurfaceHit for the data a single ray test produces.

use glam::Vec3A;

use crate::interval::Interval;
use crate::ray::Ray;

/// Result of one successful ray-primitive test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Point where the ray intersects the object
    pub point: Vec3A,
    /// Unit surface normal, always pointing against the incident ray
    pub normal: Vec3A,
    /// True if the ray arrived from outside the surface
    pub outside: bool,
}

impl SurfaceHit {
    /// Build a hit from an outward normal, flipping it to face the ray.
    pub fn facing(r: &Ray, t: f32, point: Vec3A, outward_normal: Vec3A) -> Self {
        let outside = r.direction.dot(outward_normal) < 0.0;
        Self {
            t,
            point,
            normal: if outside { outward_normal } else { -outward_normal },
            outside,
        }
    }
}

/// Trait for objects that can be intersected by rays.
///
/// Must be Sync so the intersection engine can share primitives across
/// rayon workers.
pub trait Hittable: Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<SurfaceHit>;
}
