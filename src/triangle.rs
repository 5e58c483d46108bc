//! Triangle primitive, stored in its own collection and reached only
//! through bounding-volume nodes.

use glam::Vec3A;

use crate::hittable::{Hittable, SurfaceHit};
use crate::interval::Interval;
use crate::ray::Ray;

const PARALLEL_EPSILON: f32 = 1.0e-8;

/// World-space triangle with optional per-vertex normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3A; 3],
    /// Vertex normals for smooth shading; the face normal is used if absent.
    pub normals: Option<[Vec3A; 3]>,
    pub material_id: usize,
}

impl Triangle {
    pub fn new(vertices: [Vec3A; 3], material_id: usize) -> Self {
        Self {
            vertices,
            normals: None,
            material_id,
        }
    }

    pub fn with_normals(mut self, normals: [Vec3A; 3]) -> Self {
        self.normals = Some(normals.map(Vec3A::normalize));
        self
    }
}

impl Hittable for Triangle {
    /// Möller–Trumbore.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        let [v0, v1, v2] = self.vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let p = r.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = r.origin - v0;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = r.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        if !ray_t.surrounds(t) {
            return None;
        }

        let normal = match self.normals {
            Some([n0, n1, n2]) => {
                let flat = e1.cross(e2).normalize();
                ((1.0 - u - v) * n0 + u * n1 + v * n2).normalize_or(flat)
            }
            None => e1.cross(e2).normalize(),
        };
        Some(SurfaceHit::facing(r, t, r.at(t), normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            [
                Vec3A::new(-1.0, 0.0, -1.0),
                Vec3A::new(1.0, 0.0, -1.0),
                Vec3A::new(0.0, 0.0, 1.0),
            ],
            3,
        )
    }

    #[test]
    fn hit_from_above() {
        let r = Ray::new(Vec3A::new(0.0, 2.0, 0.0), -Vec3A::Y);
        let hit = floor_triangle().hit(&r, Interval::FORWARD).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!(hit.point.abs_diff_eq(Vec3A::ZERO, 1e-5));
        assert!(hit.normal.abs_diff_eq(Vec3A::Y, 1e-5));
    }

    #[test]
    fn miss_outside_edges() {
        let r = Ray::new(Vec3A::new(1.0, 2.0, 1.0), -Vec3A::Y);
        assert!(floor_triangle().hit(&r, Interval::FORWARD).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let r = Ray::new(Vec3A::new(-5.0, 0.0, 0.0), Vec3A::X);
        assert!(floor_triangle().hit(&r, Interval::FORWARD).is_none());
    }

    #[test]
    fn interpolated_normals_face_ray() {
        let tri = floor_triangle().with_normals([Vec3A::Y, Vec3A::Y, Vec3A::new(0.0, 1.0, 1.0)]);
        let r = Ray::new(Vec3A::new(0.0, -2.0, 0.0), Vec3A::Y);
        let hit = tri.hit(&r, Interval::FORWARD).unwrap();
        assert!(!hit.outside);
        assert!(hit.normal.y < 0.0);
    }
}
