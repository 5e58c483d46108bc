//! Intersection engine: nearest positive hit per active path.
//!
//! Every ray scans the analytic collection linearly. Bounding-volume nodes
//! open a scan over their triangle range; with culling on, only rays whose
//! span overlaps the node's box get that far. All primitive kinds share one
//! nearest-distance comparison, so scan order never decides a hit.

use rayon::prelude::*;

use crate::geometry::Geometry;
use crate::hittable::{Hittable, SurfaceHit};
use crate::interval::Interval;
use crate::path::{Intersection, PathSegment};
use crate::ray::Ray;
use crate::scene::Scene;

/// Nearest hit along `ray` and the material that owns it.
pub fn nearest_hit(scene: &Scene, ray: &Ray, culling: bool) -> Option<(SurfaceHit, usize)> {
    let mut nearest = None;
    let mut range = Interval::FORWARD;
    let mut closer = |hit: Option<SurfaceHit>, material_id: usize, range: &mut Interval| {
        if let Some(hit) = hit {
            *range = range.with_max(hit.t);
            nearest = Some((hit, material_id));
        }
    };

    for geometry in &scene.geometries {
        match geometry {
            Geometry::Sphere(sphere) => {
                closer(sphere.hit(ray, range), sphere.material_id, &mut range)
            }
            Geometry::Cube(cube) => closer(cube.hit(ray, range), cube.material_id, &mut range),
            // The node's box is a gate, never a surface.
            Geometry::BoundingVolume(node) => {
                if culling && !node.admits(ray, range) {
                    continue;
                }
                for triangle in &scene.triangles[node.triangles.clone()] {
                    closer(triangle.hit(ray, range), triangle.material_id, &mut range);
                }
            }
        }
    }
    nearest
}

/// Write one intersection per active path and cache hit points on the
/// paths. `paths` and `intersections` are the active prefix, same length.
pub fn compute_intersections(
    scene: &Scene,
    culling: bool,
    paths: &mut [PathSegment],
    intersections: &mut [Intersection],
) {
    debug_assert_eq!(paths.len(), intersections.len());
    paths
        .par_iter_mut()
        .zip(intersections.par_iter_mut())
        .for_each(|(path, isect)| {
            *isect = match nearest_hit(scene, &path.ray, culling) {
                Some((hit, material_id)) => {
                    path.hit_point = hit.point;
                    Intersection {
                        t: hit.t,
                        material_id,
                        surface_normal: hit.normal,
                        outside: hit.outside,
                    }
                }
                None => Intersection::MISS,
            };
        });
}

/// Re-derive cached hit points from reused intersections.
pub fn restore_hit_points(paths: &mut [PathSegment], intersections: &[Intersection]) {
    paths
        .par_iter_mut()
        .zip(intersections.par_iter())
        .filter(|(_, isect)| isect.is_hit())
        .for_each(|(path, isect)| path.hit_point = path.ray.at(isect.t));
}
