//! Camera parameters and primary ray generation.

use glam::{Vec2, Vec3A};
use rayon::prelude::*;

use crate::path::PathSegment;
use crate::random::RandomStream;
use crate::ray::Ray;
use crate::settings::RenderSettings;

/// Pinhole camera with an orthonormal basis and per-pixel angular
/// footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub width: u32,
    /// Rendered image height in pixel count
    pub height: u32,
    /// Camera position in world space
    pub position: Vec3A,
    /// Unit forward vector
    pub view: Vec3A,
    /// Unit vector toward the top of the image
    pub up: Vec3A,
    /// Unit vector toward the right of the image
    pub right: Vec3A,
    /// Footprint of one pixel on the plane one unit along `view`
    pub pixel_length: Vec2,
}

impl Camera {
    /// Camera at `lookfrom` aimed at `lookat`.
    ///
    /// `vfov` is the full vertical field of view in degrees.
    pub fn look_at(
        lookfrom: Vec3A,
        lookat: Vec3A,
        vup: Vec3A,
        vfov: f32,
        width: u32,
        height: u32,
    ) -> Self {
        let view = (lookat - lookfrom).normalize();
        let right = view.cross(vup).normalize();
        let up = right.cross(view);

        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = half_height * (width as f32 / height.max(1) as f32);

        Self {
            width,
            height,
            position: lookfrom,
            view,
            up,
            right,
            pixel_length: Vec2::new(
                2.0 * half_width / width.max(1) as f32,
                2.0 * half_height / height.max(1) as f32,
            ),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reasons the basis cannot generate rays, if any.
    pub fn check(&self) -> Result<(), String> {
        let basis = [("view", self.view), ("up", self.up), ("right", self.right)];
        for (name, v) in basis {
            if !v.is_finite() || (v.length() - 1.0).abs() > 1e-3 {
                return Err(format!("{name} vector {v} is not a unit vector"));
            }
        }
        if !self.position.is_finite() {
            return Err(format!("position {} is not finite", self.position));
        }
        if !self.pixel_length.is_finite() || self.pixel_length.min_element() <= 0.0 {
            return Err(format!("pixel footprint {} must be positive", self.pixel_length));
        }
        Ok(())
    }

    /// Unit direction through image position (x + jx, y + jy); row 0 is
    /// the top of the image.
    pub fn direction(&self, x: f32, y: f32) -> Vec3A {
        let half_w = self.width as f32 * 0.5;
        let half_h = self.height as f32 * 0.5;
        (self.view + self.right * self.pixel_length.x * (x - half_w)
            - self.up * self.pixel_length.y * (y - half_h))
            .normalize()
    }

    /// Primary ray for one pixel of one iteration.
    ///
    /// Jitter and lens samples come from the stream keyed by
    /// (iteration, pixel, depth 0); with both disabled the ray goes through
    /// the pixel center and is identical in every iteration.
    pub fn primary_ray(&self, x: u32, y: u32, iteration: u32, settings: &RenderSettings) -> Ray {
        let pixel_index = y * self.width + x;
        let mut rng = RandomStream::new(iteration, pixel_index, 0);

        let (jx, jy) = if settings.jitter_enabled() {
            rng.jitter()
        } else {
            (0.0, 0.0)
        };
        // Pixel centers sit at half-integer image coordinates.
        let direction = self.direction(x as f32 + 0.5 + jx, y as f32 + 0.5 + jy);

        if !settings.depth_of_field_enabled() {
            return Ray::new(self.position, direction);
        }

        // Thin lens: move the origin across the aperture and re-aim through
        // the point where the pinhole ray meets the focal plane.
        let lens = rng.in_unit_disk() * settings.lens.radius;
        let origin = self.position + self.right * lens.x + self.up * lens.y;
        let focus_t = settings.lens.focal_distance / direction.dot(self.view);
        let focus = self.position + direction * focus_t;
        Ray::new(origin, (focus - origin).normalize())
    }
}

/// Fill `paths` with one fresh path per pixel, slot `y * width + x`.
pub fn generate_camera_rays(
    camera: &Camera,
    settings: &RenderSettings,
    iteration: u32,
    paths: &mut [PathSegment],
) {
    debug_assert_eq!(paths.len(), camera.pixel_count());
    let width = camera.width;
    paths.par_iter_mut().enumerate().for_each(|(index, path)| {
        let index = index as u32;
        let ray = camera.primary_ray(index % width, index / width, iteration, settings);
        *path = PathSegment::new(ray, index, settings.trace_depth);
    });
}
