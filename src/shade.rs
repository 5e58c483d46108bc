//! Shader stage: resolve or scatter every active path in place.

use rayon::prelude::*;

use crate::hittable::SurfaceHit;
use crate::material::Color;
use crate::path::{Intersection, PathSegment};
use crate::random::RandomStream;
use crate::scene::Scene;

/// Shade the paths of one depth.
///
/// Lights absorb and terminate, misses go black and terminate, anything
/// else scatters and spends one bounce. Resolved paths are left alone.
/// Random streams are keyed by pixel index so reordering the active array
/// never changes what a path samples.
pub fn shade_paths(
    scene: &Scene,
    iteration: u32,
    depth: u32,
    paths: &mut [PathSegment],
    intersections: &[Intersection],
) {
    debug_assert_eq!(paths.len(), intersections.len());
    paths
        .par_iter_mut()
        .zip(intersections.par_iter())
        .for_each(|(path, isect)| shade_path(scene, iteration, depth, path, isect));
}

fn shade_path(
    scene: &Scene,
    iteration: u32,
    depth: u32,
    path: &mut PathSegment,
    isect: &Intersection,
) {
    if !path.is_active() {
        return;
    }
    if !isect.is_hit() {
        path.terminate(Color::ZERO);
        return;
    }

    let material = &scene.materials[isect.material_id];
    if material.is_emissive() {
        path.terminate(material.emitted());
        return;
    }

    let hit = SurfaceHit {
        t: isect.t,
        point: path.hit_point,
        normal: isect.surface_normal,
        outside: isect.outside,
    };
    // Depth 0 of the stream belongs to the ray generator.
    let mut rng = RandomStream::new(iteration, path.pixel_index, depth + 1);
    let scatter = material.scatter(&path.ray, &hit, &mut rng);
    path.ray = scatter.ray;
    path.throughput *= scatter.attenuation;
    path.remaining_bounces -= 1;
}

/// Group active paths and their intersections by material, misses last.
///
/// `scratch` is reused between calls to avoid reallocating every depth.
pub fn sort_by_material(
    paths: &mut [PathSegment],
    intersections: &mut [Intersection],
    scratch: &mut Vec<(Intersection, PathSegment)>,
) {
    debug_assert_eq!(paths.len(), intersections.len());
    scratch.clear();
    scratch.par_extend(
        intersections
            .par_iter()
            .copied()
            .zip(paths.par_iter().copied()),
    );
    scratch.par_sort_unstable_by_key(|(isect, _)| material_key(isect));
    scratch
        .par_iter()
        .zip(intersections.par_iter_mut().zip(paths.par_iter_mut()))
        .for_each(|(&(isect, path), (isect_slot, path_slot))| {
            *isect_slot = isect;
            *path_slot = path;
        });
}

fn material_key(isect: &Intersection) -> usize {
    if isect.is_hit() {
        isect.material_id
    } else {
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::material::Material;
    use crate::ray::Ray;
    use glam::Vec3A;

    fn scene() -> Scene {
        let mut scene = Scene::new(Camera::look_at(Vec3A::ZERO, -Vec3A::Z, Vec3A::Y, 45.0, 2, 2));
        scene.add_material(Material::diffuse(Vec3A::new(0.5, 0.25, 1.0)));
        scene.add_material(Material::light(Vec3A::new(1.0, 0.8, 0.6), 5.0));
        scene
    }

    fn path(pixel_index: u32, bounces: u32) -> PathSegment {
        let mut p = PathSegment::new(Ray::new(Vec3A::ZERO, -Vec3A::Z), pixel_index, bounces);
        p.hit_point = Vec3A::new(0.0, 0.0, -2.0);
        p
    }

    fn hit(material_id: usize) -> Intersection {
        Intersection {
            t: 2.0,
            material_id,
            surface_normal: Vec3A::Z,
            outside: true,
        }
    }

    #[test]
    fn light_absorbs_and_terminates() {
        let mut paths = vec![path(0, 5)];
        shade_paths(&scene(), 1, 0, &mut paths, &[hit(1)]);
        assert_eq!(paths[0].remaining_bounces, 0);
        assert!(paths[0].throughput.abs_diff_eq(Vec3A::new(5.0, 4.0, 3.0), 1e-5));
    }

    #[test]
    fn light_scales_the_carried_throughput() {
        let mut scene = scene();
        let dim = scene.add_material(Material::light(Vec3A::new(1.0, 0.5, 0.5), 2.0));
        let mut carried = path(0, 5);
        carried.throughput = Vec3A::splat(0.5);
        let mut paths = vec![carried];
        shade_paths(&scene, 1, 2, &mut paths, &[hit(dim)]);
        assert_eq!(paths[0].remaining_bounces, 0);
        assert!(paths[0].throughput.abs_diff_eq(Vec3A::new(1.0, 0.5, 0.5), 1e-6));
    }

    #[test]
    fn miss_goes_black_and_terminates() {
        let mut paths = vec![path(0, 5)];
        shade_paths(&scene(), 1, 0, &mut paths, &[Intersection::MISS]);
        assert_eq!(paths[0].remaining_bounces, 0);
        assert_eq!(paths[0].throughput, Vec3A::ZERO);
    }

    #[test]
    fn diffuse_scatters_and_spends_one_bounce() {
        let mut paths = vec![path(0, 5)];
        shade_paths(&scene(), 1, 0, &mut paths, &[hit(0)]);
        let p = paths[0];
        assert_eq!(p.remaining_bounces, 4);
        assert_eq!(p.throughput, Vec3A::new(0.5, 0.25, 1.0));
        assert!(p.ray.direction.dot(Vec3A::Z) >= 0.0);
        assert!(p.ray.origin.z > -2.0);
    }

    #[test]
    fn resolved_paths_are_untouched() {
        let mut done = path(3, 0);
        done.throughput = Vec3A::new(0.1, 0.2, 0.3);
        let mut paths = vec![done];
        shade_paths(&scene(), 1, 2, &mut paths, &[hit(1)]);
        assert_eq!(paths[0], done);
    }

    #[test]
    fn shading_depends_on_pixel_not_slot() {
        let s = scene();
        let mut a = vec![path(7, 3), path(9, 3)];
        let mut b = vec![path(9, 3), path(7, 3)];
        shade_paths(&s, 4, 1, &mut a, &[hit(0), hit(0)]);
        shade_paths(&s, 4, 1, &mut b, &[hit(0), hit(0)]);
        assert_eq!(a[0], b[1]);
        assert_eq!(a[1], b[0]);
    }

    #[test]
    fn sort_groups_by_material_and_keeps_pairs() {
        let mut paths: Vec<PathSegment> = (0..6).map(|i| path(i, 2)).collect();
        let materials = [1, 0, usize::MAX, 1, 0, 0];
        let mut isects: Vec<Intersection> = materials
            .iter()
            .map(|&m| if m == usize::MAX { Intersection::MISS } else { hit(m) })
            .collect();
        let pairing: Vec<(u32, f32, usize)> = paths
            .iter()
            .zip(&isects)
            .map(|(p, i)| (p.pixel_index, i.t, i.material_id))
            .collect();

        let mut scratch = Vec::new();
        sort_by_material(&mut paths, &mut isects, &mut scratch);

        let keys: Vec<usize> = isects.iter().map(material_key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert!(!isects[5].is_hit());
        for (p, i) in paths.iter().zip(&isects) {
            assert!(pairing.contains(&(p.pixel_index, i.t, i.material_id)));
        }
        let mut pixels: Vec<u32> = paths.iter().map(|p| p.pixel_index).collect();
        pixels.sort_unstable();
        assert_eq!(pixels, vec![0, 1, 2, 3, 4, 5]);
    }
}
