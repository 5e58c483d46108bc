//! Material system for ray tracing.
//!
//! A material mixes three BSDF lobes: Lambertian diffuse, specular
//! reflection (mirror or Phong-glossy) and dielectric refraction, selected
//! stochastically by their weights. A positive emittance turns the surface
//! into a light.

use glam::Vec3A;

use crate::hittable::SurfaceHit;
use crate::random::RandomStream;
use crate::ray::Ray;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Offset applied to scattered ray origins to escape the surface.
pub const RAY_EPSILON: f32 = 1.0e-3;

/// Surface description consumed by the shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color: diffuse albedo, glass tint, light color.
    pub color: Color,
    /// Color of the reflective lobe.
    pub specular_color: Color,
    /// Phong exponent of the reflective lobe; 0 means a perfect mirror.
    pub specular_exponent: f32,
    /// Probability of the reflective lobe.
    pub reflective: f32,
    /// Probability of the refractive lobe.
    pub refractive: f32,
    pub index_of_refraction: f32,
    /// Values above zero mark a light source.
    pub emittance: f32,
}

/// Outcome of sampling the BSDF once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    pub ray: Ray,
    pub attenuation: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::splat(0.5),
            specular_color: Color::ONE,
            specular_exponent: 0.0,
            reflective: 0.0,
            refractive: 0.0,
            index_of_refraction: 1.0,
            emittance: 0.0,
        }
    }
}

impl Material {
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn mirror(specular_color: Color) -> Self {
        Self {
            specular_color,
            reflective: 1.0,
            ..Self::default()
        }
    }

    pub fn glossy(color: Color, specular_color: Color, exponent: f32, reflective: f32) -> Self {
        Self {
            color,
            specular_color,
            specular_exponent: exponent,
            reflective,
            ..Self::default()
        }
    }

    pub fn glass(tint: Color, index_of_refraction: f32) -> Self {
        Self {
            color: tint,
            refractive: 1.0,
            index_of_refraction,
            ..Self::default()
        }
    }

    pub fn light(color: Color, emittance: f32) -> Self {
        Self {
            color,
            emittance,
            ..Self::default()
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.emittance > 0.0
    }

    /// Radiance picked up by a path that ends on this surface.
    pub fn emitted(&self) -> Color {
        self.color * self.emittance
    }

    /// Check the physical ranges that keep path throughput non-negative
    /// and non-increasing. Returns a reason on failure.
    pub fn check(&self) -> Result<(), String> {
        for (name, c) in [("color", self.color), ("specular color", self.specular_color)] {
            if !c.is_finite() || c.min_element() < 0.0 || c.max_element() > 1.0 {
                return Err(format!("{name} {c} must lie in [0, 1]"));
            }
        }
        if !self.emittance.is_finite() || self.emittance < 0.0 {
            return Err(format!("emittance {} must be finite and non-negative", self.emittance));
        }
        let weights_ok = (0.0..=1.0).contains(&self.reflective)
            && (0.0..=1.0).contains(&self.refractive)
            && self.reflective + self.refractive <= 1.0 + 1e-6;
        if !weights_ok {
            return Err(format!(
                "lobe weights reflective={} refractive={} must be in [0, 1] and sum to at most 1",
                self.reflective, self.refractive
            ));
        }
        if self.refractive > 0.0 && !(self.index_of_refraction > 0.0) {
            return Err(format!(
                "index of refraction {} must be positive",
                self.index_of_refraction
            ));
        }
        if !(self.specular_exponent >= 0.0) {
            return Err(format!(
                "specular exponent {} must be non-negative",
                self.specular_exponent
            ));
        }
        Ok(())
    }

    /// Sample one outgoing direction.
    ///
    /// Lobes are picked with probability equal to their weight, so the
    /// attenuation is just the lobe color.
    pub fn scatter(&self, r_in: &Ray, hit: &SurfaceHit, rng: &mut RandomStream) -> Scatter {
        let pick = rng.next_f32();
        let (direction, attenuation) = if pick < self.reflective {
            (self.sample_specular(r_in, hit, rng), self.specular_color)
        } else if pick < self.reflective + self.refractive {
            (self.sample_dielectric(r_in, hit, rng), self.color)
        } else {
            (rng.cosine_hemisphere(hit.normal), self.color)
        };

        // Push the origin off the surface on the side the ray leaves from.
        let side = if direction.dot(hit.normal) >= 0.0 { 1.0 } else { -1.0 };
        Scatter {
            ray: Ray::new(hit.point + side * RAY_EPSILON * hit.normal, direction),
            attenuation,
        }
    }

    fn sample_specular(&self, r_in: &Ray, hit: &SurfaceHit, rng: &mut RandomStream) -> Vec3A {
        let mirror = reflect(r_in.direction.normalize(), hit.normal);
        if self.specular_exponent <= 0.0 {
            return mirror;
        }
        let glossy = rng.phong_lobe(mirror, self.specular_exponent);
        if glossy.dot(hit.normal) > 0.0 {
            glossy
        } else {
            mirror
        }
    }

    /// Fresnel-weighted choice between reflection and refraction.
    fn sample_dielectric(&self, r_in: &Ray, hit: &SurfaceHit, rng: &mut RandomStream) -> Vec3A {
        let ri = if hit.outside {
            1.0 / self.index_of_refraction
        } else {
            self.index_of_refraction
        };

        let unit_direction = r_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;
        if cannot_refract || reflectance(cos_theta, ri) > rng.next_f32() {
            reflect(unit_direction, hit.normal)
        } else {
            refract(unit_direction, hit.normal, ri).normalize()
        }
    }
}

/// Reflect a vector off a surface using the law of reflection.
fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through an interface using Snell's law.
fn refract(uv: Vec3A, n: Vec3A, etai_over_etat: f32) -> Vec3A {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Compute Fresnel reflectance using Schlick's approximation.
fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_hit() -> SurfaceHit {
        SurfaceHit {
            t: 1.0,
            point: Vec3A::ZERO,
            normal: Vec3A::Y,
            outside: true,
        }
    }

    fn incoming() -> Ray {
        Ray::new(Vec3A::new(-1.0, 1.0, 0.0), Vec3A::new(1.0, -1.0, 0.0).normalize())
    }

    #[test]
    fn diffuse_scatters_above_surface() {
        let m = Material::diffuse(Color::new(0.8, 0.4, 0.2));
        for i in 0..64 {
            let s = m.scatter(&incoming(), &floor_hit(), &mut RandomStream::new(0, i, 1));
            assert!(s.ray.direction.dot(Vec3A::Y) >= 0.0);
            assert!(s.ray.origin.y > 0.0);
            assert_eq!(s.attenuation, m.color);
        }
    }

    #[test]
    fn mirror_reflects_exactly() {
        let m = Material::mirror(Color::ONE);
        let s = m.scatter(&incoming(), &floor_hit(), &mut RandomStream::new(0, 0, 0));
        let expected = Vec3A::new(1.0, 1.0, 0.0).normalize();
        assert!(s.ray.direction.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn glass_refracts_below_or_reflects_above() {
        let m = Material::glass(Color::ONE, 1.5);
        let mut below = 0;
        for i in 0..128 {
            let s = m.scatter(&incoming(), &floor_hit(), &mut RandomStream::new(1, i, 2));
            assert!((s.ray.direction.length() - 1.0).abs() < 1e-4);
            if s.ray.direction.y < 0.0 {
                below += 1;
                assert!(s.ray.origin.y < 0.0);
            }
        }
        // Schlick reflectance at 45 degrees is small; most samples refract.
        assert!(below > 64);
    }

    #[test]
    fn total_internal_reflection() {
        let m = Material::glass(Color::ONE, 1.5);
        let mut hit = floor_hit();
        hit.outside = false;
        let grazing = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, -0.2, 0.0).normalize());
        for i in 0..16 {
            let s = m.scatter(&grazing, &hit, &mut RandomStream::new(0, i, 0));
            assert!(s.ray.direction.y > 0.0);
        }
    }

    #[test]
    fn check_rejects_gain() {
        assert!(Material::diffuse(Color::splat(0.5)).check().is_ok());
        assert!(Material::diffuse(Color::new(1.2, 0.5, 0.5)).check().is_err());
        assert!(Material::light(Color::ONE, -1.0).check().is_err());
        let mut m = Material::mirror(Color::ONE);
        m.refractive = 0.5;
        assert!(m.check().is_err());
    }

    #[test]
    fn light_emission() {
        let m = Material::light(Color::new(1.0, 0.5, 0.25), 4.0);
        assert!(m.is_emissive());
        assert_eq!(m.emitted(), Color::new(4.0, 2.0, 1.0));
        assert!(!Material::diffuse(Color::ONE).is_emissive());
    }
}
