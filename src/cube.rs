//! Box primitive: the unit cube [-0.5, 0.5]^3 under an arbitrary transform.

use glam::{Vec3, Vec3A};

use crate::bounds::Aabb;
use crate::geometry::Transform;
use crate::hittable::{Hittable, SurfaceHit};
use crate::interval::Interval;
use crate::ray::Ray;

/// Transformed box primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub transform: Transform,
    pub material_id: usize,
}

impl Cube {
    pub fn new(center: Vec3A, rotation_degrees: Vec3, size: Vec3, material_id: usize) -> Self {
        Self {
            transform: Transform::new(center.into(), rotation_degrees, size),
            material_id,
        }
    }
}

impl Hittable for Cube {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        self.transform
            .hit_object_space(r, ray_t, |local, ray_t| Aabb::UNIT.hit(local, ray_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_wall() {
        // A thin wall at z = -3 spanning x, y in [-5, 5].
        let wall = Cube::new(
            Vec3A::new(0.0, 0.0, -3.0),
            Vec3::ZERO,
            Vec3::new(10.0, 10.0, 0.01),
            1,
        );
        let r = Ray::new(Vec3A::ZERO, -Vec3A::Z);
        let hit = wall.hit(&r, Interval::FORWARD).unwrap();
        assert!((hit.t - 2.995).abs() < 1e-4);
        assert!(hit.normal.abs_diff_eq(Vec3A::Z, 1e-5));
        assert!(hit.outside);
    }

    #[test]
    fn rotated_cube_hits_slanted_face() {
        let c = Cube::new(Vec3A::ZERO, Vec3::new(0.0, 45.0, 0.0), Vec3::ONE, 0);
        let r = Ray::new(Vec3A::new(0.1, 0.0, 5.0), -Vec3A::Z);
        let hit = c.hit(&r, Interval::FORWARD).unwrap();
        // Rotated 45 degrees about y, the front faces satisfy |x| + z = sqrt(2)/2.
        let expected = 5.0 - (std::f32::consts::FRAC_1_SQRT_2 - 0.1);
        assert!((hit.t - expected).abs() < 1e-3);
        assert!(hit.normal.z > 0.0 && hit.normal.x > 0.0);
    }

    #[test]
    fn miss_beside_cube() {
        let c = Cube::new(Vec3A::ZERO, Vec3::ZERO, Vec3::ONE, 0);
        let r = Ray::new(Vec3A::new(2.0, 0.0, 5.0), -Vec3A::Z);
        assert!(c.hit(&r, Interval::FORWARD).is_none());
    }
}
