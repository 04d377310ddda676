//! Deterministic coherent noise over world coordinates.
//!
//! Wraps `noise::Perlin` and remaps its native `[-1, 1]` output to `[0, 1]`.

use noise::{NoiseFn, Perlin};

/// A deterministic 2D/3D coherent noise service, seeded once at construction.
///
/// `noise2`/`noise3` are pure functions of `(seed, x, z, freq)`: identical
/// inputs yield identical outputs across runs and threads, since `Perlin`
/// itself performs no interior mutation.
pub struct NoiseService {
    perlin: Perlin,
}

impl NoiseService {
    /// Construct a noise service seeded from the world seed.
    pub fn new(seed: u64) -> Self {
        Self {
            perlin: Perlin::new(seed as u32),
        }
    }

    /// Single-octave 2D noise remapped to `[0, 1]`.
    pub fn noise2(&self, x: f64, z: f64, freq: f64) -> f64 {
        let raw = self.perlin.get([x * freq, z * freq]);
        (raw + 1.0) * 0.5
    }

    /// Single-octave 3D noise remapped to `[0, 1]`.
    pub fn noise3(&self, x: f64, y: f64, z: f64, freq: f64) -> f64 {
        let raw = self.perlin.get([x * freq, y * freq, z * freq]);
        (raw + 1.0) * 0.5
    }

    /// Multi-octave fractal sum, for composite terrain/biome shaping.
    /// Normalized back into `[0, 1]`.
    pub fn octaves2(&self, x: f64, z: f64, base_freq: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut freq = base_freq;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            value += self.perlin.get([x * freq, z * freq]) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            freq *= lacunarity;
        }
        ((value / max_value) + 1.0) * 0.5
    }

    /// Composite cave-carving noise: weighted sum of three 3D octaves at
    /// large/medium/small frequencies.
    pub fn cave_noise(
        &self,
        x: f64,
        y: f64,
        z: f64,
        large_freq: f64,
        medium_freq: f64,
        small_freq: f64,
    ) -> f64 {
        0.5 * self.noise3(x, y, z, large_freq)
            + 0.3 * self.noise3(x, y, z, medium_freq)
            + 0.2 * self.noise3(x, y, z, small_freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise2_is_deterministic_for_fixed_seed() {
        let a = NoiseService::new(1234);
        let b = NoiseService::new(1234);
        for i in 0..20 {
            let x = i as f64 * 3.7;
            let z = i as f64 * 1.3;
            assert_eq!(a.noise2(x, z, 0.02), b.noise2(x, z, 0.02));
        }
    }

    #[test]
    fn noise3_is_deterministic_for_fixed_seed() {
        let a = NoiseService::new(99);
        let b = NoiseService::new(99);
        assert_eq!(a.noise3(10.0, 20.0, 10.0, 0.05), b.noise3(10.0, 20.0, 10.0, 0.05));
    }

    #[test]
    fn noise_output_is_in_unit_range() {
        let n = NoiseService::new(7);
        for i in 0..50 {
            let x = i as f64 * 0.9;
            let v2 = n.noise2(x, -x, 0.02);
            assert!((0.0..=1.0).contains(&v2));
            let v3 = n.noise3(x, x * 0.5, -x, 0.03);
            assert!((0.0..=1.0).contains(&v3));
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = NoiseService::new(1);
        let b = NoiseService::new(2);
        let mut any_diff = false;
        for i in 0..30 {
            if (a.noise2(i as f64 * 0.5, 0.0, 0.1) - b.noise2(i as f64 * 0.5, 0.0, 0.1)).abs() > 1e-6 {
                any_diff = true;
                break;
            }
        }
        assert!(any_diff);
    }

    #[test]
    fn cave_noise_in_unit_range() {
        let n = NoiseService::new(424242);
        let v = n.cave_noise(10.0, 20.0, 10.0, 0.02, 0.05, 0.1);
        assert!((0.0..=1.0).contains(&v));
    }
}
