//! Scene geometry: object transforms and the closed set of analytic
//! primitive variants scanned by the intersection engine.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::bounds::BoundingVolume;
use crate::cube::Cube;
use crate::hittable::SurfaceHit;
use crate::interval::Interval;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Object-to-world transform with cached inverses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
    pub inverse: Mat4,
    pub inverse_transpose: Mat4,
}

impl Transform {
    /// Translation, then XYZ Euler rotation in degrees, then scale.
    pub fn new(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rotation_degrees.x.to_radians(),
            rotation_degrees.y.to_radians(),
            rotation_degrees.z.to_radians(),
        );
        Self::from_matrix(Mat4::from_scale_rotation_translation(scale, rotation, translation))
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let inverse = matrix.inverse();
        Self {
            matrix,
            inverse,
            inverse_transpose: inverse.transpose(),
        }
    }

    /// True when the matrix is invertible and finite.
    pub fn is_valid(&self) -> bool {
        self.matrix.is_finite() && self.inverse.is_finite() && self.matrix.determinant() != 0.0
    }

    /// Intersect a unit object-space shape and bring the hit back to world
    /// space. Object-space `t` equals world-space `t` because the ray
    /// direction is mapped without renormalizing.
    pub(crate) fn hit_object_space(
        &self,
        r: &Ray,
        ray_t: Interval,
        object: impl FnOnce(&Ray, Interval) -> Option<SurfaceHit>,
    ) -> Option<SurfaceHit> {
        let local = r.transformed(&self.inverse);
        let hit = object(&local, ray_t)?;
        let normal = self
            .inverse_transpose
            .transform_vector3a(hit.normal)
            .normalize_or_zero();
        Some(SurfaceHit {
            t: hit.t,
            point: r.at(hit.t),
            normal,
            outside: hit.outside,
        })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

/// Analytic-collection entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Cube(Cube),
    /// Gate for a range of the triangle collection; carries no material.
    BoundingVolume(BoundingVolume),
}

impl Geometry {
    /// Material of a directly shaded primitive.
    pub fn material_id(&self) -> Option<usize> {
        match self {
            Geometry::Sphere(s) => Some(s.material_id),
            Geometry::Cube(c) => Some(c.material_id),
            Geometry::BoundingVolume(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere(_) => "sphere",
            Geometry::Cube(_) => "cube",
            Geometry::BoundingVolume(_) => "bounding volume",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;

    #[test]
    fn inverse_round_trips_points() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(30.0, 45.0, 0.0),
            Vec3::new(2.0, 1.0, 0.5),
        );
        assert!(t.is_valid());
        let p = Vec3A::new(0.3, -0.2, 0.1);
        let back = t.inverse.transform_point3a(t.matrix.transform_point3a(p));
        assert!(back.abs_diff_eq(p, 1e-5));
    }

    #[test]
    fn zero_scale_is_invalid() {
        let t = Transform::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert!(!t.is_valid());
    }

    #[test]
    fn bounding_volume_has_no_material() {
        let g = Geometry::BoundingVolume(BoundingVolume {
            bounds: crate::bounds::Aabb::UNIT,
            triangles: 0..0,
        });
        assert_eq!(g.material_id(), None);
        assert_eq!(g.kind(), "bounding volume");
    }
}
