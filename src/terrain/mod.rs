//! Terrain collaborators and procedural heightmap synthesis

pub mod grid;
pub mod noise_field;
pub mod synthesizer;

pub use grid::{GridTerrain, Heightmap};
pub use noise_field::{NoiseConfig, NoiseField, NoiseQuality};
pub use synthesizer::TerrainHeightSynthesizer;

use crate::core::types::{Result, Vec3};

/// A heightmapped terrain surface owned by the host.
///
/// Heights written through [`Terrain::set_heights`] are normalized to
/// `[0, 1]` and scaled by `size().y` when sampled.
pub trait Terrain {
    /// Footprint width (x), maximum height (y) and depth (z)
    fn size(&self) -> Vec3;

    /// Number of height samples along each side of the heightmap
    fn heightmap_resolution(&self) -> usize;

    /// Write a block of normalized heights starting at grid cell (origin_x, origin_z)
    fn set_heights(&mut self, origin_x: usize, origin_z: usize, heights: &Heightmap) -> Result<()>;

    /// Surface height at the planar position of `pos`, relative to [`Terrain::position`]
    fn sample_height(&self, pos: Vec3) -> f32;

    /// World-space origin of the terrain (min x/z corner)
    fn position(&self) -> Vec3;

    /// World-space surface point above `(local_x, local_z)` in terrain-local coordinates
    fn surface_point(&self, local_x: f32, local_z: f32) -> Vec3 {
        let origin = self.position();
        let planar = Vec3::new(origin.x + local_x, 0.0, origin.z + local_z);
        Vec3::new(planar.x, origin.y + self.sample_height(planar), planar.z)
    }

    /// World-space surface point below/above the planar position of `pos`
    fn snap_to_surface(&self, pos: Vec3) -> Vec3 {
        Vec3::new(pos.x, self.position().y + self.sample_height(pos), pos.z)
    }
}
