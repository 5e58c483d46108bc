//! Random number generation for ray tracing.
//!
//! Every stream is derived functionally from an (iteration, index, depth)
//! key, so parallel stages never share generator state. The key is hashed
//! into a seed for a ChaCha PRNG; successive draws from one stream are
//! independent uniforms.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec3A;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Keyed, stateless-by-construction random source.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha8Rng,
}

/// SplitMix64 finalizer.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

impl RandomStream {
    /// Stream for one (iteration, path, depth) triple. `index` is the pixel
    /// index of the path, never its slot in the active array.
    pub fn new(iteration: u32, index: u32, depth: u32) -> Self {
        let seed = mix(iteration as u64 ^ mix(((index as u64) << 16) ^ mix(depth as u64)));
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform f32 in [0.0, 1.0)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random()
    }

    /// Pair of independent offsets in [-0.5, 0.5) for pixel jitter.
    pub fn jitter(&mut self) -> (f32, f32) {
        (self.next_f32() - 0.5, self.next_f32() - 0.5)
    }

    /// Point in the unit disk (z = 0), concentric mapping.
    pub fn in_unit_disk(&mut self) -> Vec3A {
        let a = 2.0 * self.next_f32() - 1.0;
        let b = 2.0 * self.next_f32() - 1.0;
        if a == 0.0 && b == 0.0 {
            return Vec3A::ZERO;
        }
        let (r, theta) = if a.abs() > b.abs() {
            (a, FRAC_PI_4 * (b / a))
        } else {
            (b, 2.0 * FRAC_PI_4 - FRAC_PI_4 * (a / b))
        };
        Vec3A::new(r * theta.cos(), r * theta.sin(), 0.0)
    }

    /// Cosine-weighted direction in the hemisphere around `normal`.
    pub fn cosine_hemisphere(&mut self, normal: Vec3A) -> Vec3A {
        let up = self.next_f32().sqrt(); // cos(theta)
        let over = (1.0 - up * up).sqrt(); // sin(theta)
        let around = self.next_f32() * 2.0 * PI;
        let (t, b) = normal.any_orthonormal_pair();
        (up * normal + around.cos() * over * t + around.sin() * over * b).normalize()
    }

    /// Direction around `axis` following a Phong lobe of the given exponent.
    pub fn phong_lobe(&mut self, axis: Vec3A, exponent: f32) -> Vec3A {
        let cos_theta = self.next_f32().powf(1.0 / (exponent + 1.0));
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = self.next_f32() * 2.0 * PI;
        let (t, b) = axis.any_orthonormal_pair();
        (cos_theta * axis + phi.cos() * sin_theta * t + phi.sin() * sin_theta * b).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_sequence() {
        let mut a = RandomStream::new(3, 1234, 2);
        let mut b = RandomStream::new(3, 1234, 2);
        for _ in 0..8 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn neighbouring_keys_differ() {
        let base = RandomStream::new(1, 10, 0).next_f32();
        assert_ne!(base, RandomStream::new(2, 10, 0).next_f32());
        assert_ne!(base, RandomStream::new(1, 11, 0).next_f32());
        assert_ne!(base, RandomStream::new(1, 10, 1).next_f32());
    }

    #[test]
    fn jitter_in_range() {
        for i in 0..256 {
            let (x, y) = RandomStream::new(0, i, 0).jitter();
            assert!((-0.5..0.5).contains(&x));
            assert!((-0.5..0.5).contains(&y));
        }
    }

    #[test]
    fn disk_and_hemisphere_samples() {
        let n = Vec3A::new(0.0, 0.0, 1.0);
        for i in 0..256 {
            let mut s = RandomStream::new(7, i, 1);
            let d = s.in_unit_disk();
            assert!(d.length_squared() <= 1.0 + 1e-5);
            assert_eq!(d.z, 0.0);
            let h = s.cosine_hemisphere(n);
            assert!(h.dot(n) >= -1e-5);
            assert!((h.length() - 1.0).abs() < 1e-4);
            let l = s.phong_lobe(n, 50.0);
            assert!(l.dot(n) > 0.0);
        }
    }
}
