//! Render configuration resolved before a session starts.

/// Lens parameters for depth of field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Radius of the aperture disk in world units.
    pub radius: f32,
    /// Distance from the camera to the plane of perfect focus.
    pub focal_distance: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            radius: 0.1,
            focal_distance: 10.0,
        }
    }
}

/// Options of the trace loop. Each toggle selects an algorithmic path
/// without changing what a session computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Maximum bounces per path per iteration.
    pub trace_depth: u32,
    /// Jitter primary rays inside their pixel.
    pub enable_antialiasing: bool,
    /// Sample the lens disk when generating primary rays.
    pub enable_depth_of_field: bool,
    pub lens: Lens,
    /// Skip a node's triangles when its bounding box is missed.
    pub enable_bounding_volume_culling: bool,
    /// Reuse depth-0 intersections across iterations.
    pub enable_first_bounce_cache: bool,
    /// Group active paths by material before shading.
    pub enable_material_sort: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            trace_depth: 8,
            enable_antialiasing: true,
            enable_depth_of_field: false,
            lens: Lens::default(),
            enable_bounding_volume_culling: true,
            enable_first_bounce_cache: false,
            enable_material_sort: false,
        }
    }
}

impl RenderSettings {
    pub fn jitter_enabled(&self) -> bool {
        self.enable_antialiasing && !self.enable_first_bounce_cache
    }

    pub fn depth_of_field_enabled(&self) -> bool {
        self.enable_depth_of_field && !self.enable_first_bounce_cache
    }
}
