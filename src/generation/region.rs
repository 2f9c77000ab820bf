//! Region classification: buckets terrain cells into spawn-point pools
//!
//! A second Perlin field, sampled at a much higher spatial frequency than
//! the height noise, decides which object categories may spawn on each
//! integer cell. Categories overlap, so one cell can sit in several pools.

use std::collections::HashMap;
use std::fmt;

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::terrain::Terrain;

use super::random::RandomSource;

/// Default coordinate scale of the classification noise
pub const DEFAULT_REGION_SCALE: f64 = 50.0;

/// Offset applied to the run seed for the classification noise
const REGION_SEED_OFFSET: u32 = 1000;

/// Named spawn region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Grass,
    Rock,
    Pine,
    House,
    Stalactite,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Grass,
        Region::Rock,
        Region::Pine,
        Region::House,
        Region::Stalactite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::Grass => "grass",
            Region::Rock => "rock",
            Region::Pine => "pine",
            Region::House => "house",
            Region::Stalactite => "stalactite",
        }
    }

    /// Whether a classification sample in `[0, 1]` belongs to this region.
    ///
    /// Bands are half-open except stalactites, which cover the whole surface.
    pub fn contains(self, sample: f32) -> bool {
        match self {
            Region::Grass => (0.0..0.8).contains(&sample),
            Region::Rock => (0.0..0.2).contains(&sample),
            Region::Pine => (0.3..0.8).contains(&sample),
            Region::House => (0.9..1.0).contains(&sample),
            Region::Stalactite => (0.0..=1.0).contains(&sample),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// World-space surface point eligible for spawning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint(pub Vec3);

impl SpawnPoint {
    #[inline]
    pub fn position(self) -> Vec3 {
        self.0
    }
}

/// Spawn points per region, in cell scan order (z-major, then x)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionPools {
    pools: HashMap<Region, Vec<SpawnPoint>>,
}

impl RegionPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: Region, point: SpawnPoint) {
        self.pools.entry(region).or_default().push(point);
    }

    /// Points of a region; empty when nothing qualified
    pub fn get(&self, region: Region) -> &[SpawnPoint] {
        self.pools.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, region: Region) -> usize {
        self.get(region).len()
    }

    pub fn is_empty(&self, region: Region) -> bool {
        self.get(region).is_empty()
    }

    /// Uniform draw with replacement
    pub fn draw(&self, region: Region, rng: &mut dyn RandomSource) -> Option<SpawnPoint> {
        let pool = self.get(region);
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.index(pool.len())])
    }
}

/// Classifies terrain cells into [`RegionPools`] using Perlin noise
pub struct RegionClassifier {
    noise: Perlin,
    scale: f64,
}

impl RegionClassifier {
    pub fn new(seed: u32, scale: f64) -> Self {
        Self {
            noise: Perlin::new(seed.wrapping_add(REGION_SEED_OFFSET)),
            scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Classification sample for a terrain-local cell, in `[0, 1]`
    pub fn sample(&self, x: f32, z: f32, size: Vec3) -> f32 {
        let nx = x as f64 / size.x as f64 * self.scale;
        let nz = z as f64 / size.z as f64 * self.scale;
        // Perlin output is roughly [-1, 1]
        let v = (self.noise.get([nx, nz]) + 1.0) * 0.5;
        (v as f32).clamp(0.0, 1.0)
    }

    /// Bucket every integer cell of `[0, size.x) x [0, size.z)`
    pub fn classify(&self, terrain: &dyn Terrain) -> RegionPools {
        let size = terrain.size();
        let cells_x = size.x.max(0.0).ceil() as usize;
        let cells_z = size.z.max(0.0).ceil() as usize;

        let mut pools = RegionPools::new();
        for z in 0..cells_z {
            for x in 0..cells_x {
                let (fx, fz) = (x as f32, z as f32);
                let sample = self.sample(fx, fz, size);
                let mut point = None;
                for region in Region::ALL {
                    if region.contains(sample) {
                        let p = *point.get_or_insert_with(|| SpawnPoint(terrain.surface_point(fx, fz)));
                        pools.push(region, p);
                    }
                }
            }
        }

        log::debug!(
            "Classified {}x{} cells: grass {}, rock {}, pine {}, house {}, stalactite {}",
            cells_x,
            cells_z,
            pools.len(Region::Grass),
            pools.len(Region::Rock),
            pools.len(Region::Pine),
            pools.len(Region::House),
            pools.len(Region::Stalactite),
        );
        pools
    }
}
