//! Sphere primitive for ray tracing.
//!
//! The sphere is unit-diameter in object space; placement, size and
//! squashing all come from its transform.

use glam::{Vec3, Vec3A};

use crate::geometry::Transform;
use crate::hittable::{Hittable, SurfaceHit};
use crate::interval::Interval;
use crate::ray::Ray;

const OBJECT_RADIUS: f32 = 0.5;

/// Transformed sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub transform: Transform,
    pub material_id: usize,
}

impl Sphere {
    /// Round sphere at `center` with the given world radius.
    ///
    /// Negative radius values are clamped to 0.0, which makes the
    /// transform degenerate and is rejected by scene validation.
    pub fn new(center: Vec3A, radius: f32, material_id: usize) -> Self {
        let diameter = 2.0 * radius.max(0.0);
        Self {
            transform: Transform::new(center.into(), Vec3::ZERO, Vec3::splat(diameter)),
            material_id,
        }
    }
}

/// Object-space test against the sphere of radius 0.5 at the origin.
fn hit_unit_sphere(r: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let oc = -r.origin;

    let a = r.direction.length_squared();
    let h = r.direction.dot(oc);
    let c = oc.length_squared() - OBJECT_RADIUS * OBJECT_RADIUS;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Find the nearest root that lies in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = r.at(root);
    Some(SurfaceHit::facing(r, root, p, p / OBJECT_RADIUS))
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        self.transform.hit_object_space(r, ray_t, hit_unit_sphere)
    }
}
