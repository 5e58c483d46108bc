//! Wavepath progressive path tracer
//!
//! The core is a wavefront bounce loop: one primary path per pixel per
//! iteration, then intersect / shade / compact over a shrinking active
//! array, then accumulate every path into a running image. Generation,
//! intersection and shading run data-parallel on rayon with the stage
//! boundary as the barrier.

#![warn(rustdoc::broken_intra_doc_links)]

pub mod bounds;
pub mod camera;
pub mod compact;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod hittable;
pub mod intersect;
pub mod interval;
pub mod material;
pub mod path;
pub mod random;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod shade;
pub mod sphere;
pub mod triangle;

pub use error::{RenderError, Result};
pub use renderer::{IterationStats, Renderer};
pub use scene::Scene;
pub use settings::RenderSettings;
