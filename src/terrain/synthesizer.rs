//! Writes noise-driven heightmaps into terrains

use std::time::Instant;

use crate::core::types::Result;

use super::noise_field::{NoiseConfig, NoiseField};
use super::Terrain;

/// Drives a [`NoiseField`] over a terrain's full heightmap.
///
/// Holds the parameters shared by every layer (frequency, quality,
/// threshold range, falloff); per-layer lacunarity/octaves and the run
/// seed are supplied on each call.
#[derive(Clone, Debug, Default)]
pub struct TerrainHeightSynthesizer {
    base: NoiseConfig,
}

impl TerrainHeightSynthesizer {
    pub fn new(base: NoiseConfig) -> Self {
        Self { base }
    }

    /// Noise configuration for one layer
    pub fn layer_config(&self, seed: u32, lacunarity: f64, octaves: usize) -> NoiseConfig {
        NoiseConfig {
            seed,
            lacunarity,
            octaves,
            ..self.base.clone()
        }
    }

    /// Populate `terrain`'s heightmap at its own resolution.
    ///
    /// `low` is written where the ridged generator falls outside the
    /// threshold range and `high` inside it.
    pub fn synthesize(
        &self,
        terrain: &mut dyn Terrain,
        seed: u32,
        lacunarity: f64,
        octaves: usize,
        low: f64,
        high: f64,
    ) -> Result<()> {
        let config = self.layer_config(seed, lacunarity, octaves);
        let resolution = terrain.heightmap_resolution();

        let start = Instant::now();
        let field = NoiseField::new(config, low, high);
        let heights = field.heightmap(resolution);
        terrain.set_heights(0, 0, &heights)?;

        log::debug!(
            "Synthesized {}x{} heightmap (seed {}, lacunarity {}, octaves {}) in {:.1}ms",
            resolution,
            resolution,
            seed,
            lacunarity,
            octaves,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::terrain::grid::GridTerrain;

    fn terrain(resolution: usize) -> GridTerrain {
        GridTerrain::new(Vec3::ZERO, Vec3::new(100.0, 50.0, 100.0), resolution).unwrap()
    }

    #[test]
    fn test_layer_config_threads_seed() {
        let synth = TerrainHeightSynthesizer::default();
        let ground = synth.layer_config(77, 15.0, 4);
        let ceiling = synth.layer_config(77, 10.0, 2);
        assert_eq!(ground.seed, ceiling.seed);
        assert_eq!(ground.frequency, ceiling.frequency);
        assert_ne!(ground.lacunarity, ceiling.lacunarity);
        assert_eq!(ceiling.octaves, 2);
    }

    #[test]
    fn test_synthesize_cells_in_unit_range() {
        let synth = TerrainHeightSynthesizer::default();
        let mut ground = terrain(65);
        synth.synthesize(&mut ground, 321, 15.0, 4, 0.0, 1.0).unwrap();
        for &v in ground.heights().data() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_synthesize_reproducible() {
        let synth = TerrainHeightSynthesizer::default();
        let mut a = terrain(65);
        let mut b = terrain(65);
        synth.synthesize(&mut a, 999, 10.0, 2, 1.0, 0.0).unwrap();
        synth.synthesize(&mut b, 999, 10.0, 2, 1.0, 0.0).unwrap();
        let bits_a: Vec<u32> = a.heights().data().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u32> = b.heights().data().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_synthesize_different_seeds_differ() {
        let synth = TerrainHeightSynthesizer::default();
        let mut a = terrain(65);
        let mut b = terrain(65);
        synth.synthesize(&mut a, 1, 15.0, 4, 0.0, 1.0).unwrap();
        synth.synthesize(&mut b, 2, 15.0, 4, 0.0, 1.0).unwrap();
        assert_ne!(a.heights().data(), b.heights().data());
    }
}
