//! In-memory heightmap grid and terrain

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

use super::Terrain;

/// Square grid of normalized height samples, row-major (`z * resolution + x`)
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
    resolution: usize,
    data: Vec<f32>,
}

impl Heightmap {
    /// Create a flat heightmap filled with `value`
    pub fn new(resolution: usize, value: f32) -> Self {
        Self {
            resolution,
            data: vec![value; resolution * resolution],
        }
    }

    /// Wrap existing row-major samples
    pub fn from_data(resolution: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != resolution * resolution {
            return Err(Error::InvalidResolution {
                expected: resolution * resolution,
                actual: data.len(),
            });
        }
        Ok(Self { resolution, data })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.data[z * self.resolution + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: f32) {
        self.data[z * self.resolution + x] = value;
    }

    /// Smallest and largest sample
    pub fn min_max(&self) -> (f32, f32) {
        self.data.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    }
}

/// Reference [`Terrain`] backed by a [`Heightmap`] held in memory.
///
/// Sampling is bilinear between grid samples; positions outside the
/// footprint clamp to the nearest edge.
#[derive(Clone, Debug)]
pub struct GridTerrain {
    position: Vec3,
    size: Vec3,
    heights: Heightmap,
}

impl GridTerrain {
    /// Create a flat terrain at height zero
    pub fn new(position: Vec3, size: Vec3, resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(Error::InvalidResolution { expected: 2, actual: resolution });
        }
        if !(size.x > 0.0 && size.z > 0.0 && size.y >= 0.0) {
            return Err(Error::InvalidConfig(format!("terrain size must be positive, got {size}")));
        }
        Ok(Self {
            position,
            size,
            heights: Heightmap::new(resolution, 0.0),
        })
    }

    pub fn heights(&self) -> &Heightmap {
        &self.heights
    }
}

impl Terrain for GridTerrain {
    fn size(&self) -> Vec3 {
        self.size
    }

    fn heightmap_resolution(&self) -> usize {
        self.heights.resolution()
    }

    fn set_heights(&mut self, origin_x: usize, origin_z: usize, heights: &Heightmap) -> Result<()> {
        let res = self.heights.resolution();
        let block = heights.resolution();
        if origin_x + block > res || origin_z + block > res {
            return Err(Error::InvalidResolution {
                expected: res.saturating_sub(origin_x.max(origin_z)),
                actual: block,
            });
        }

        for z in 0..block {
            for x in 0..block {
                self.heights.set(origin_x + x, origin_z + z, heights.get(x, z));
            }
        }
        Ok(())
    }

    fn sample_height(&self, pos: Vec3) -> f32 {
        let res = self.heights.resolution();
        let max = (res - 1) as f32;

        let u = ((pos.x - self.position.x) / self.size.x).clamp(0.0, 1.0) * max;
        let v = ((pos.z - self.position.z) / self.size.z).clamp(0.0, 1.0) * max;

        let x0 = (u.floor() as usize).min(res - 1);
        let z0 = (v.floor() as usize).min(res - 1);
        let x1 = (x0 + 1).min(res - 1);
        let z1 = (z0 + 1).min(res - 1);
        let tx = u - x0 as f32;
        let tz = v - z0 as f32;

        let h00 = self.heights.get(x0, z0);
        let h10 = self.heights.get(x1, z0);
        let h01 = self.heights.get(x0, z1);
        let h11 = self.heights.get(x1, z1);

        let a = h00 + (h10 - h00) * tx;
        let b = h01 + (h11 - h01) * tx;
        (a + (b - a) * tz) * self.size.y
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}
