//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction. Rays produced by the
//! camera and by the shader always carry a unit-length direction, so `t`
//! is a world-space distance.

use glam::{Mat4, Vec3A};

/// Ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position (or a lens sample) for primary rays, an offset
    /// surface point for scattered rays.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Map the ray into another space. The direction is not renormalized,
    /// so `t` values stay comparable between both spaces.
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3a(self.origin),
            direction: matrix.transform_vector3a(self.direction),
        }
    }
}
