//! Read-only scene description handed to a render session.

use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::triangle::Triangle;

/// Geometry, triangles, materials and camera of one rendering session.
///
/// Owned by the caller; a session only ever borrows it immutably.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Analytic primitives and bounding-volume nodes, scanned linearly.
    pub geometries: Vec<Geometry>,
    /// Triangles, reachable only through bounding-volume nodes.
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
    pub camera: Camera,
}

impl Scene {
    /// Empty scene seen through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            geometries: Vec::new(),
            triangles: Vec::new(),
            materials: Vec::new(),
            camera,
        }
    }

    /// Append a material and return its id.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add(&mut self, geometry: Geometry) {
        self.geometries.push(geometry);
    }

    /// Append triangles and return their index range in the collection.
    pub fn add_triangles(
        &mut self,
        triangles: impl IntoIterator<Item = Triangle>,
    ) -> std::ops::Range<usize> {
        let start = self.triangles.len();
        self.triangles.extend(triangles);
        start..self.triangles.len()
    }

    /// Check every cross reference and physical range the trace loop
    /// relies on.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if camera.width == 0 || camera.height == 0 {
            return Err(RenderError::EmptyImage {
                width: camera.width,
                height: camera.height,
            });
        }
        if u32::try_from(camera.pixel_count()).is_err() {
            return Err(RenderError::ImageTooLarge {
                width: camera.width,
                height: camera.height,
            });
        }
        camera.check().map_err(RenderError::InvalidCamera)?;

        if self.materials.is_empty() && !(self.geometries.is_empty() && self.triangles.is_empty()) {
            return Err(RenderError::NoMaterials);
        }
        for (material_id, material) in self.materials.iter().enumerate() {
            material
                .check()
                .map_err(|reason| RenderError::InvalidMaterial { material_id, reason })?;
        }

        let count = self.materials.len();
        for (index, geometry) in self.geometries.iter().enumerate() {
            match geometry {
                Geometry::Sphere(s) if !s.transform.is_valid() => {
                    return Err(RenderError::DegenerateTransform { kind: geometry.kind(), index });
                }
                Geometry::Cube(c) if !c.transform.is_valid() => {
                    return Err(RenderError::DegenerateTransform { kind: geometry.kind(), index });
                }
                Geometry::BoundingVolume(node) => {
                    let range = &node.triangles;
                    if range.start > range.end || range.end > self.triangles.len() {
                        return Err(RenderError::TriangleRangeOutOfBounds {
                            node: index,
                            start: range.start,
                            end: range.end,
                            count: self.triangles.len(),
                        });
                    }
                }
                _ => {}
            }
            if let Some(material_id) = geometry.material_id().filter(|&id| id >= count) {
                return Err(RenderError::MissingMaterial {
                    kind: geometry.kind(),
                    index,
                    material_id,
                    count,
                });
            }
        }
        for (index, triangle) in self.triangles.iter().enumerate() {
            if triangle.material_id >= count {
                return Err(RenderError::MissingMaterial {
                    kind: "triangle",
                    index,
                    material_id: triangle.material_id,
                    count,
                });
            }
        }
        Ok(())
    }
}
