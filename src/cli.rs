use clap::{Parser, ValueEnum};
use log::LevelFilter;

use wavepath::settings::{Lens, RenderSettings};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "wavepath")]
#[command(about = "Progressive wavefront path tracer")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "800", help = "Image height in pixels")]
    pub height: u32,

    /// Number of progressive iterations (one sample per pixel each)
    #[arg(long, short = 'i', default_value = "500", help = "Number of progressive iterations")]
    pub iterations: u32,

    /// Maximum bounces per path per iteration
    #[arg(long, short = 'd', default_value = "8", help = "Maximum bounces per path per iteration")]
    pub trace_depth: u32,

    /// Disable sub-pixel jitter of primary rays
    #[arg(long, help = "Disable sub-pixel jitter of primary rays")]
    pub no_antialiasing: bool,

    /// Enable thin-lens depth of field
    #[arg(long, help = "Enable thin-lens depth of field")]
    pub depth_of_field: bool,

    /// Lens aperture radius used with --depth-of-field. These lens
    /// defaults are tuned for the built-in demo scene and focus on its
    /// center; `Lens::default()` is the library's scene-agnostic choice.
    #[arg(long, default_value = "0.2", help = "Lens aperture radius used with --depth-of-field")]
    pub lens_radius: f32,

    /// Focal plane distance used with --depth-of-field
    #[arg(long, default_value = "10.5", help = "Focal plane distance used with --depth-of-field")]
    pub focal_distance: f32,

    /// Scan every triangle even when its bounding volume is missed
    #[arg(long, help = "Scan every triangle even when its bounding volume is missed")]
    pub no_culling: bool,

    /// Reuse first-bounce intersections across iterations (disables jitter and lens sampling)
    #[arg(
        long,
        help = "Reuse first-bounce intersections across iterations (disables jitter and lens sampling)"
    )]
    pub cache_first_bounce: bool,

    /// Group paths by material before shading
    #[arg(long, help = "Group paths by material before shading")]
    pub sort_materials: bool,

    /// Send image to TEV for real-time visualization
    #[arg(long, help = "Send image to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Iterations between TEV refreshes
    #[arg(long, default_value = "25", help = "Iterations between TEV refreshes")]
    pub tev_every: u32,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(
        short,
        long,
        default_value = "output.png",
        help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)"
    )]
    pub output: String,
}

impl From<&Args> for RenderSettings {
    fn from(args: &Args) -> Self {
        Self {
            trace_depth: args.trace_depth,
            enable_antialiasing: !args.no_antialiasing,
            enable_depth_of_field: args.depth_of_field,
            lens: Lens {
                radius: args.lens_radius,
                focal_distance: args.focal_distance,
            },
            enable_bounding_volume_culling: !args.no_culling,
            enable_first_bounce_cache: args.cache_first_bounce,
            enable_material_sort: args.sort_materials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let args = Args::parse_from(["wavepath"]);
        let settings = RenderSettings::from(&args);
        assert_eq!(settings.trace_depth, RenderSettings::default().trace_depth);
        assert!(settings.enable_antialiasing);
        assert!(settings.enable_bounding_volume_culling);
        assert!(!settings.enable_material_sort);
    }

    #[test]
    fn toggles() {
        let args = Args::parse_from([
            "wavepath",
            "--no-antialiasing",
            "--depth-of-field",
            "--no-culling",
            "--cache-first-bounce",
            "--sort-materials",
            "-d",
            "3",
        ]);
        let settings = RenderSettings::from(&args);
        assert_eq!(settings.trace_depth, 3);
        assert!(!settings.enable_antialiasing);
        assert!(settings.enable_depth_of_field);
        assert!(!settings.enable_bounding_volume_culling);
        assert!(settings.enable_first_bounce_cache);
        assert!(settings.enable_material_sort);
    }
}
