//! Thresholded ridged-multifractal noise field used for cave heightmaps

use noise::{
    Constant, MultiFractal, NoiseFn, Perlin, RidgedMulti, Select, SuperSimplex, Value,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::Heightmap;

/// Base noise used inside the ridged multifractal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseQuality {
    /// Value noise: cheapest, blocky ridges
    Low,
    /// Perlin gradient noise
    Medium,
    /// SuperSimplex gradient noise: fewest directional artifacts
    #[default]
    High,
}

/// Parameters for one terrain layer's noise field.
///
/// Both layers of a cave must be built with the same `seed` so that
/// ceiling voids line up with ground voids.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseConfig {
    pub frequency: f64,
    pub lacunarity: f64,
    pub octaves: usize,
    pub seed: u32,
    pub quality: NoiseQuality,
    /// Lower bound of the selection range applied to the raw generator output
    pub threshold_low: f64,
    /// Upper bound of the selection range
    pub threshold_high: f64,
    /// Width of the smoothing band at each edge of the selection range
    pub falloff: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            frequency: 3.0,
            lacunarity: 2.0,
            octaves: 4,
            seed: 0,
            quality: NoiseQuality::High,
            threshold_low: 0.0,
            threshold_high: 1.0,
            falloff: 0.25,
        }
    }
}

enum RidgedSource {
    Low(RidgedMulti<Value>),
    Medium(RidgedMulti<Perlin>),
    High(RidgedMulti<SuperSimplex>),
}

impl RidgedSource {
    fn new(config: &NoiseConfig) -> Self {
        match config.quality {
            NoiseQuality::Low => Self::Low(configure(RidgedMulti::<Value>::new(config.seed), config)),
            NoiseQuality::Medium => Self::Medium(configure(RidgedMulti::<Perlin>::new(config.seed), config)),
            NoiseQuality::High => Self::High(configure(RidgedMulti::<SuperSimplex>::new(config.seed), config)),
        }
    }
}

fn configure<M: MultiFractal>(source: M, config: &NoiseConfig) -> M {
    source
        .set_frequency(config.frequency)
        .set_lacunarity(config.lacunarity)
        .set_octaves(config.octaves)
}

impl NoiseFn<f64, 2> for RidgedSource {
    fn get(&self, point: [f64; 2]) -> f64 {
        match self {
            Self::Low(n) => n.get(point),
            Self::Medium(n) => n.get(point),
            Self::High(n) => n.get(point),
        }
    }
}

fn threshold_selector(
    config: &NoiseConfig,
    low: f64,
    high: f64,
) -> impl NoiseFn<f64, 2> + Send + Sync + use<> {
    Select::new(Constant::new(low), Constant::new(high), RidgedSource::new(config))
        .set_bounds(config.threshold_low, config.threshold_high)
        .set_falloff(config.falloff)
}

/// Binary cave field: outputs `low` where the ridged generator falls outside
/// the threshold range and `high` inside it, blended across the falloff band.
pub struct NoiseField {
    config: NoiseConfig,
    field: Box<dyn NoiseFn<f64, 2> + Send + Sync>,
}

impl NoiseField {
    pub fn new(config: NoiseConfig, low: f64, high: f64) -> Self {
        let field = Box::new(threshold_selector(&config, low, high));
        Self { config, field }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Raw field value at a point of the unit square
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        self.field.get([x, z])
    }

    /// Sample the unit square at `resolution x resolution` and normalize to `[0, 1]`.
    ///
    /// Cell `(i, j)` samples `(i / resolution, j / resolution)`. The grid is
    /// min-max normalized; a constant field is clamped into range instead.
    pub fn heightmap(&self, resolution: usize) -> Heightmap {
        let mut map = Heightmap::new(resolution, 0.0);
        let step = 1.0 / resolution.max(1) as f64;

        map.data_mut()
            .par_chunks_mut(resolution.max(1))
            .enumerate()
            .for_each(|(z, row)| {
                let nz = z as f64 * step;
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = self.sample(x as f64 * step, nz) as f32;
                }
            });

        normalize(&mut map);
        map
    }
}

fn normalize(map: &mut Heightmap) {
    let (lo, hi) = map.min_max();
    let range = hi - lo;
    if range > f32::EPSILON {
        for v in map.data_mut() {
            *v = ((*v - lo) / range).clamp(0.0, 1.0);
        }
    } else {
        for v in map.data_mut() {
            *v = v.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u32) -> NoiseConfig {
        NoiseConfig {
            seed,
            lacunarity: 15.0,
            octaves: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_noise_config_default() {
        let c = NoiseConfig::default();
        assert_eq!(c.frequency, 3.0);
        assert_eq!(c.threshold_low, 0.0);
        assert_eq!(c.threshold_high, 1.0);
        assert_eq!(c.falloff, 0.25);
        assert_eq!(c.quality, NoiseQuality::High);
    }

    #[test]
    fn test_field_output_between_constants() {
        let field = NoiseField::new(config(7), 0.0, 1.0);
        for i in 0..50 {
            for j in 0..50 {
                let v = field.sample(i as f64 / 50.0, j as f64 / 50.0);
                assert!((-1e-9..=1.0 + 1e-9).contains(&v), "value {} outside constants", v);
            }
        }
    }

    #[test]
    fn test_heightmap_normalized() {
        for quality in [NoiseQuality::Low, NoiseQuality::Medium, NoiseQuality::High] {
            let field = NoiseField::new(NoiseConfig { quality, ..config(99) }, 1.0, 0.0);
            let map = field.heightmap(33);
            assert_eq!(map.data().len(), 33 * 33);
            for &v in map.data() {
                assert!((0.0..=1.0).contains(&v), "{:?}: {} out of range", quality, v);
            }
        }
    }

    #[test]
    fn test_heightmap_deterministic() {
        let a = NoiseField::new(config(1234), 0.0, 1.0).heightmap(65);
        let b = NoiseField::new(config(1234), 0.0, 1.0).heightmap(65);
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_constant_field_clamped() {
        // Identical constants produce a flat field regardless of the control noise
        let field = NoiseField::new(config(5), 0.75, 0.75);
        let map = field.heightmap(9);
        assert!(map.data().iter().all(|&v| v == 0.75));

        let field = NoiseField::new(config(5), 3.0, 3.0);
        let map = field.heightmap(9);
        assert!(map.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_inverted_constants_mirror() {
        let ground = NoiseField::new(config(42), 0.0, 1.0);
        let ceiling = NoiseField::new(config(42), 1.0, 0.0);
        for i in 0..20 {
            let x = i as f64 / 20.0;
            let g = ground.sample(x, 0.3);
            let c = ceiling.sample(x, 0.3);
            assert!((g + c - 1.0).abs() < 1e-9, "ground {} + ceiling {} != 1", g, c);
        }
    }
}
