//! Render session: owns the per-session buffers and runs the bounce loop.
//!
//! One call to [`Renderer::path_trace`] is one iteration: generate a
//! primary path per pixel, then repeat intersect / shade / compact on the
//! shrinking active prefix until the trace depth is spent or no path is
//! left, then add every path of the iteration into the image.

use log::{debug, info, trace, warn};

use crate::camera::generate_camera_rays;
use crate::compact::compact_paths;
use crate::error::{RenderError, Result};
use crate::intersect::{compute_intersections, restore_hit_points};
use crate::material::Color;
use crate::path::{Intersection, PathSegment};
use crate::scene::Scene;
use crate::settings::RenderSettings;
use crate::shade::{shade_paths, sort_by_material};

/// What one iteration did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationStats {
    /// Intersect/shade passes executed.
    pub bounces: u32,
    /// Active path count after each pass.
    pub active_after_depth: Vec<usize>,
}

/// Progressive renderer bound to one scene for its whole lifetime.
pub struct Renderer<'s> {
    scene: &'s Scene,
    settings: RenderSettings,
    /// Fixed capacity of one path per pixel; the active prefix shrinks
    /// within an iteration and is reset by ray generation.
    paths: Vec<PathSegment>,
    intersections: Vec<Intersection>,
    sort_scratch: Vec<(Intersection, PathSegment)>,
    first_bounce: Option<Vec<Intersection>>,
    /// Running sum of every iteration's radiance, one entry per pixel.
    image: Vec<Color>,
    iterations: u32,
}

impl<'s> Renderer<'s> {
    /// Start a session. Validates the scene and settings and sizes every
    /// buffer from the camera resolution.
    pub fn new(scene: &'s Scene, settings: RenderSettings) -> Result<Self> {
        if settings.trace_depth == 0 {
            return Err(RenderError::ZeroTraceDepth);
        }
        if settings.enable_depth_of_field {
            let lens = settings.lens;
            if !(lens.radius.is_finite() && lens.radius >= 0.0) {
                return Err(RenderError::InvalidLens(format!(
                    "radius {} must be non-negative",
                    lens.radius
                )));
            }
            if !(lens.focal_distance.is_finite() && lens.focal_distance > 0.0) {
                return Err(RenderError::InvalidLens(format!(
                    "focal distance {} must be positive",
                    lens.focal_distance
                )));
            }
        }
        scene.validate()?;

        let overridden = settings.enable_antialiasing || settings.enable_depth_of_field;
        if settings.enable_first_bounce_cache && overridden {
            warn!("First bounce cache enabled: primary rays skip jitter and lens sampling");
        }

        let pixel_count = scene.camera.pixel_count();
        info!(
            "Render session: {}x{} pixels, {} geometries, {} triangles, {} materials, \
             trace depth {}",
            scene.camera.width,
            scene.camera.height,
            scene.geometries.len(),
            scene.triangles.len(),
            scene.materials.len(),
            settings.trace_depth
        );
        debug!("Render settings: {:?}", settings);

        Ok(Self {
            scene,
            settings,
            paths: vec![PathSegment::default(); pixel_count],
            intersections: vec![Intersection::MISS; pixel_count],
            sort_scratch: Vec::new(),
            first_bounce: None,
            image: vec![Color::ZERO; pixel_count],
            iterations: 0,
        })
    }

    /// Run one full iteration and add its radiance to the image.
    pub fn path_trace(&mut self, frame: u32, iteration: u32) -> IterationStats {
        let scene = self.scene;
        let settings = self.settings;
        let pixel_count = self.paths.len();

        generate_camera_rays(&scene.camera, &settings, iteration, &mut self.paths);

        let mut stats = IterationStats::default();
        let mut depth = 0;
        let mut active = pixel_count;
        while depth < settings.trace_depth && active > 0 {
            let paths = &mut self.paths[..active];
            let intersections = &mut self.intersections[..active];
            intersections.fill(Intersection::MISS);

            // Depth 0 covers every pixel in generation order, so the cache
            // lines up slot for slot.
            let use_cache = depth == 0 && settings.enable_first_bounce_cache;
            let cached = if use_cache { self.first_bounce.as_deref() } else { None };
            if let Some(cached) = cached {
                intersections.copy_from_slice(cached);
                restore_hit_points(paths, intersections);
            } else {
                let culling = settings.enable_bounding_volume_culling;
                compute_intersections(scene, culling, paths, intersections);
                if use_cache {
                    self.first_bounce = Some(intersections.to_vec());
                }
            }

            if settings.enable_material_sort {
                sort_by_material(paths, intersections, &mut self.sort_scratch);
            }
            shade_paths(scene, iteration, depth, paths, intersections);
            active = compact_paths(paths);
            depth += 1;

            trace!("frame {frame} iteration {iteration} depth {depth}: {active} active paths");
            stats.active_after_depth.push(active);
        }
        stats.bounces = depth;

        // Every path issued this iteration is accumulated, however early
        // the loop stopped.
        accumulate(&mut self.image, &self.paths);
        self.iterations += 1;

        debug!(
            "frame {frame} iteration {iteration}: {} bounces, {} paths still active",
            stats.bounces, active
        );
        stats
    }

    /// Clear the image, iteration count and first bounce cache.
    pub fn reset(&mut self) {
        self.image.fill(Color::ZERO);
        self.iterations = 0;
        self.first_bounce = None;
    }

    /// Accumulated radiance, row-major, not divided by the iteration count.
    pub fn image(&self) -> &[Color] {
        &self.image
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn width(&self) -> u32 {
        self.scene.camera.width
    }

    pub fn height(&self) -> u32 {
        self.scene.camera.height
    }

    /// Paths of the last iteration, one per pixel, in compacted order.
    pub fn paths(&self) -> &[PathSegment] {
        &self.paths
    }
}

/// Add each path's throughput into its pixel, exactly once.
///
/// `paths` must hold one path per pixel in any order. The scatter is a
/// single linear pass; the path array is left as compaction arranged it.
pub fn accumulate(image: &mut [Color], paths: &[PathSegment]) {
    debug_assert_eq!(image.len(), paths.len());
    for path in paths {
        image[path.pixel_index as usize] += path.throughput;
    }
}
