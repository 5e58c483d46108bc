//! Axis-aligned boxes and the bounding-volume nodes that gate triangle scans.

use std::ops::Range;

use glam::Vec3A;

use crate::hittable::{Hittable, SurfaceHit};
use crate::interval::Interval;
use crate::ray::Ray;
use crate::triangle::Triangle;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3A,
    pub max: Vec3A,
}

impl Aabb {
    /// The unit cube [-0.5, 0.5]^3 used as the object-space box primitive.
    pub const UNIT: Aabb = Aabb {
        min: Vec3A::splat(-0.5),
        max: Vec3A::splat(0.5),
    };

    pub fn new(min: Vec3A, max: Vec3A) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box enclosing all points. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3A>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    /// Box grown by `margin` on every side.
    pub fn padded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3A::splat(margin),
            max: self.max + Vec3A::splat(margin),
        }
    }
}

/// Parametric extent of a ray inside a box.
struct Slabs {
    t_enter: f32,
    enter_axis: usize,
    t_exit: f32,
    exit_axis: usize,
}

impl Aabb {
    fn slabs(&self, r: &Ray) -> Option<Slabs> {
        let inv = r.direction.recip();
        let t0 = (self.min - r.origin) * inv;
        let t1 = (self.max - r.origin) * inv;
        let near = t0.min(t1);
        let far = t0.max(t1);

        let mut s = Slabs {
            t_enter: f32::NEG_INFINITY,
            enter_axis: 0,
            t_exit: f32::INFINITY,
            exit_axis: 0,
        };
        for axis in 0..3 {
            if near[axis] > s.t_enter {
                s.t_enter = near[axis];
                s.enter_axis = axis;
            }
            if far[axis] < s.t_exit {
                s.t_exit = far[axis];
                s.exit_axis = axis;
            }
        }
        (s.t_enter <= s.t_exit).then_some(s)
    }

    /// True if any part of the ray inside `ray_t` passes through the box.
    pub fn overlaps(&self, r: &Ray, ray_t: Interval) -> bool {
        self.slabs(r)
            .is_some_and(|s| s.t_enter < ray_t.max && s.t_exit > ray_t.min)
    }
}

impl Hittable for Aabb {
    /// Slab test. Reports the entering face, or the exit face when the ray
    /// starts inside the box.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        let s = self.slabs(r)?;
        let axis_normal = |axis: usize, sign: f32| {
            let mut n = Vec3A::ZERO;
            n[axis] = sign;
            n
        };
        let (t, outward) = if ray_t.surrounds(s.t_enter) {
            (s.t_enter, axis_normal(s.enter_axis, -r.direction[s.enter_axis].signum()))
        } else if ray_t.surrounds(s.t_exit) {
            (s.t_exit, axis_normal(s.exit_axis, r.direction[s.exit_axis].signum()))
        } else {
            return None;
        };
        Some(SurfaceHit::facing(r, t, r.at(t), outward))
    }
}

const BOUNDS_MARGIN: f32 = 1.0e-4;

/// Coarse world-space box gating a contiguous range of the triangle
/// collection. Rays that miss the box skip those triangles entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingVolume {
    pub bounds: Aabb,
    pub triangles: Range<usize>,
}

impl BoundingVolume {
    /// Node enclosing `triangles[range]`, or `None` if the range is empty
    /// or out of bounds.
    pub fn enclosing(triangles: &[Triangle], range: Range<usize>) -> Option<Self> {
        let bounds = Aabb::from_points(
            triangles
                .get(range.clone())?
                .iter()
                .flat_map(|tri| tri.vertices),
        )?;
        // Flat meshes would otherwise get a zero-thickness box.
        Some(Self {
            bounds: bounds.padded(BOUNDS_MARGIN),
            triangles: range,
        })
    }

    /// Gate for the triangle scan: could any triangle of this node lie
    /// within `ray_t` along the ray?
    pub fn admits(&self, r: &Ray, ray_t: Interval) -> bool {
        self.bounds.overlaps(r, ray_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_box_from_outside() {
        let r = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::Z);
        let hit = Aabb::UNIT.hit(&r, Interval::FORWARD).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-5);
        assert!(hit.outside);
        assert_eq!(hit.normal, -Vec3A::Z);
    }

    #[test]
    fn unit_box_from_inside_reports_exit() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::X);
        let hit = Aabb::UNIT.hit(&r, Interval::FORWARD).unwrap();
        assert!((hit.t - 0.5).abs() < 1e-5);
        assert!(!hit.outside);
        assert_eq!(hit.normal, -Vec3A::X);
    }

    #[test]
    fn axis_parallel_miss() {
        let r = Ray::new(Vec3A::new(2.0, 0.0, -5.0), Vec3A::Z);
        assert!(Aabb::UNIT.hit(&r, Interval::FORWARD).is_none());
    }

    #[test]
    fn box_behind_ray_is_missed() {
        let r = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::Z);
        assert!(Aabb::UNIT.hit(&r, Interval::FORWARD).is_none());
    }

    #[test]
    fn overlap_from_inside_and_beyond_nearest() {
        let inside = Ray::new(Vec3A::ZERO, Vec3A::Z);
        assert!(Aabb::UNIT.overlaps(&inside, Interval::FORWARD));
        // Starting inside still overlaps even when the exit lies past the
        // current nearest hit.
        assert!(Aabb::UNIT.overlaps(&inside, Interval::FORWARD.with_max(0.1)));

        let outside = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::Z);
        assert!(Aabb::UNIT.overlaps(&outside, Interval::FORWARD));
        assert!(!Aabb::UNIT.overlaps(&outside, Interval::FORWARD.with_max(4.0)));
        let behind = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::Z);
        assert!(!Aabb::UNIT.overlaps(&behind, Interval::FORWARD));
    }

    #[test]
    fn enclosing_rejects_bad_ranges() {
        let tri = Triangle::new([Vec3A::ZERO, Vec3A::X, Vec3A::Y], 0);
        let tris = vec![tri];
        let node = BoundingVolume::enclosing(&tris, 0..1).unwrap();
        let exact = Aabb::new(Vec3A::ZERO, Vec3A::new(1.0, 1.0, 0.0));
        assert_eq!(node.bounds, exact.padded(BOUNDS_MARGIN));
        assert!(BoundingVolume::enclosing(&tris, 0..2).is_none());
        assert!(BoundingVolume::enclosing(&tris, 1..1).is_none());
    }
}
