//! Cave generation configuration
//!
//! `CaveConfig::default()` reproduces the reference cave: a settlement and
//! three clustered vegetation/rock passes on the ground, stalactites on the
//! ceiling. Configs round-trip through JSON so scenes can be tuned without
//! recompiling.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::scene::Prefab;
use crate::terrain::{NoiseConfig, NoiseQuality};

use super::policy::{Clearance, Layer};
use super::region::{Region, DEFAULT_REGION_SCALE};
use super::spawn::{SettlementSpawner, Spawner, TwoTierSpawner, UniformSpawner};

/// Noise parameters shared by both layers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub frequency: f64,
    pub threshold_low: f64,
    pub threshold_high: f64,
    pub falloff: f64,
    pub quality: NoiseQuality,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            frequency: 3.0,
            threshold_low: 0.0,
            threshold_high: 1.0,
            falloff: 0.25,
            quality: NoiseQuality::High,
        }
    }
}

impl NoiseSettings {
    /// Base noise config; seed, lacunarity and octaves are filled per layer
    pub fn base(&self) -> NoiseConfig {
        NoiseConfig {
            frequency: self.frequency,
            quality: self.quality,
            threshold_low: self.threshold_low,
            threshold_high: self.threshold_high,
            falloff: self.falloff,
            ..NoiseConfig::default()
        }
    }
}

/// Objects scattered independently over the whole surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformConfig {
    pub name: String,
    pub objects: Vec<Prefab>,
    pub count: usize,
    pub check_radius: f32,
    /// Fixed orientation as XYZ Euler angles in degrees
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default)]
    pub clearance: Clearance,
}

/// Primaries from a region pool with satellites scattered around them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwoTierConfig {
    pub name: String,
    /// Pool to draw primaries from; the whole surface when absent
    #[serde(default)]
    pub region: Option<Region>,
    pub primary: Vec<Prefab>,
    pub secondary: Vec<Prefab>,
    pub count: usize,
    pub secondary_count: usize,
    pub spawn_radius: f32,
    pub check_radius: f32,
    #[serde(default)]
    pub clearance: Clearance,
}

/// Spaced anchors ringed by objects facing them, plus inner details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    pub name: String,
    #[serde(default)]
    pub region: Option<Region>,
    pub anchors: Vec<Prefab>,
    pub ring: Vec<Prefab>,
    #[serde(default)]
    pub details: Vec<Prefab>,
    pub count: usize,
    /// Candidate ring sizes; one is drawn per spawn
    pub ring_counts: Vec<usize>,
    /// Candidate ring radii; one is drawn per spawn
    pub ring_radii: Vec<f32>,
    /// Detail objects attempted per anchor
    #[serde(default)]
    pub detail_count: usize,
    pub check_radius: f32,
}

/// One spawner pass, executed in list order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnerConfig {
    Uniform(UniformConfig),
    TwoTier(TwoTierConfig),
    Settlement(SettlementConfig),
}

impl SpawnerConfig {
    pub fn name(&self) -> &str {
        match self {
            SpawnerConfig::Uniform(c) => &c.name,
            SpawnerConfig::TwoTier(c) => &c.name,
            SpawnerConfig::Settlement(c) => &c.name,
        }
    }

    /// Validate and build the spawner
    pub fn build(&self) -> Result<Box<dyn Spawner>> {
        Ok(match self {
            SpawnerConfig::Uniform(c) => Box::new(UniformSpawner::new(c.clone())?),
            SpawnerConfig::TwoTier(c) => Box::new(TwoTierSpawner::new(c.clone())?),
            SpawnerConfig::Settlement(c) => Box::new(SettlementSpawner::new(c.clone())?),
        })
    }
}

/// Heightmap parameters, height tier and spawners of one layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub lacunarity: f64,
    pub octaves: usize,
    /// Height written where the ridged noise falls outside the threshold range
    pub low: f64,
    /// Height written inside the threshold range
    pub high: f64,
    /// Height tier: ground objects stay at or below, ceiling objects at or above
    pub ymax: f32,
    #[serde(default)]
    pub spawners: Vec<SpawnerConfig>,
}

impl LayerConfig {
    pub fn default_ground() -> Self {
        Self {
            lacunarity: 15.0,
            octaves: 4,
            low: 0.0,
            high: 1.0,
            ymax: 25.0,
            spawners: vec![
                SpawnerConfig::Settlement(SettlementConfig {
                    name: "house_trees".into(),
                    region: Some(Region::House),
                    anchors: vec![Prefab::new("house_tree", 4.0)],
                    ring: vec![Prefab::new("house_tree_small", 1.5)],
                    details: vec![Prefab::new("lantern", 0.3), Prefab::new("barrel", 0.5)],
                    count: 3,
                    ring_counts: vec![6, 8, 10],
                    ring_radii: vec![15.0, 20.0, 25.0],
                    detail_count: 4,
                    check_radius: 2.0,
                }),
                SpawnerConfig::TwoTier(TwoTierConfig {
                    name: "rocks".into(),
                    region: Some(Region::Rock),
                    primary: vec![
                        Prefab::new("rock_large", 1.5),
                        Prefab::new("rock_medium", 1.0),
                    ],
                    secondary: vec![Prefab::new("gem_blue", 0.2), Prefab::new("gem_red", 0.2)],
                    count: 40,
                    secondary_count: 3,
                    spawn_radius: 6.0,
                    check_radius: 2.0,
                    clearance: Clearance::Generic,
                }),
                SpawnerConfig::TwoTier(TwoTierConfig {
                    name: "pines".into(),
                    region: Some(Region::Pine),
                    primary: vec![Prefab::new("pine_tall", 1.2), Prefab::new("pine_short", 1.0)],
                    secondary: vec![Prefab::new("mushroom", 0.2)],
                    count: 60,
                    secondary_count: 4,
                    spawn_radius: 5.0,
                    check_radius: 2.0,
                    clearance: Clearance::Generic,
                }),
                SpawnerConfig::TwoTier(TwoTierConfig {
                    name: "grass".into(),
                    region: Some(Region::Grass),
                    primary: vec![Prefab::new("grass_tuft", 0.3)],
                    secondary: vec![Prefab::new("grass_tuft", 0.3)],
                    count: 80,
                    secondary_count: 6,
                    spawn_radius: 4.0,
                    check_radius: 1.0,
                    clearance: Clearance::Generic,
                }),
            ],
        }
    }

    pub fn default_ceiling() -> Self {
        Self {
            lacunarity: 10.0,
            octaves: 2,
            low: 1.0,
            high: 0.0,
            ymax: 60.0,
            spawners: vec![SpawnerConfig::Uniform(UniformConfig {
                name: "stalactites".into(),
                objects: vec![
                    Prefab::new("stalactite_long", 0.5),
                    Prefab::new("stalactite_short", 0.4),
                ],
                count: 150,
                check_radius: 1.0,
                rotation: [180.0, 0.0, 0.0],
                clearance: Clearance::Generic,
            })],
        }
    }

    /// Validate every spawner and build them in order
    pub fn build_spawners(&self) -> Result<Vec<Box<dyn Spawner>>> {
        self.spawners.iter().map(SpawnerConfig::build).collect()
    }
}

/// Top-level configuration of a cave generation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Run seed shared by both layers; drawn from the random source when absent
    pub seed: Option<u32>,
    pub noise: NoiseSettings,
    /// Coordinate scale of the region classification noise
    pub region_scale: f64,
    /// Candidate draws allowed per requested placement
    pub max_attempts: u32,
    /// Minimum distance between settlement anchors
    pub settlement_spacing: f32,
    pub ground: LayerConfig,
    pub ceiling: LayerConfig,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            seed: None,
            noise: NoiseSettings::default(),
            region_scale: DEFAULT_REGION_SCALE,
            max_attempts: 100,
            settlement_spacing: 75.0,
            ground: LayerConfig::default_ground(),
            ceiling: LayerConfig::default_ceiling(),
        }
    }
}

impl CaveConfig {
    pub fn layer(&self, layer: Layer) -> &LayerConfig {
        match layer {
            Layer::Ground => &self.ground,
            Layer::Ceiling => &self.ceiling,
        }
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject configurations that could never run or would produce
    /// degenerate geometry
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be at least 1".into()));
        }
        if !(self.region_scale.is_finite() && self.region_scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "region_scale must be positive, got {}",
                self.region_scale
            )));
        }
        if !(self.settlement_spacing.is_finite() && self.settlement_spacing >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "settlement_spacing must be non-negative, got {}",
                self.settlement_spacing
            )));
        }
        let noise = &self.noise;
        if noise.threshold_low > noise.threshold_high {
            return Err(Error::InvalidConfig(format!(
                "noise threshold range is inverted: [{}, {}]",
                noise.threshold_low, noise.threshold_high
            )));
        }
        if noise.falloff.is_nan() || noise.falloff < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "noise falloff must be non-negative, got {}",
                noise.falloff
            )));
        }

        for layer in [Layer::Ground, Layer::Ceiling] {
            let cfg = self.layer(layer);
            if !(1..=32).contains(&cfg.octaves) {
                return Err(Error::InvalidConfig(format!(
                    "{} octaves must be between 1 and 32, got {}",
                    layer.name(),
                    cfg.octaves
                )));
            }
            cfg.build_spawners()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = CaveConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_attempts, 100);
        assert_eq!(config.ground.ymax, 25.0);
        assert_eq!(config.ceiling.ymax, 60.0);

        let names: Vec<&str> = config.ground.spawners.iter().map(SpawnerConfig::name).collect();
        assert_eq!(names, ["house_trees", "rocks", "pines", "grass"]);
        assert!(matches!(config.ceiling.spawners[0], SpawnerConfig::Uniform(_)));
    }

    #[test]
    fn test_noise_base_keeps_shared_settings() {
        let mut settings = NoiseSettings::default();
        settings.frequency = 5.0;
        settings.quality = NoiseQuality::Low;
        let base = settings.base();
        assert_eq!(base.frequency, 5.0);
        assert_eq!(base.quality, NoiseQuality::Low);
        assert_eq!(base.falloff, 0.25);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cave.json");

        let mut config = CaveConfig::default();
        config.seed = Some(4242);
        config.ground.spawners.truncate(2);
        config.save(&path).unwrap();

        let loaded = CaveConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(
            &path,
            r#"{
                "seed": 7,
                "max_attempts": 20,
                "ceiling": {
                    "lacunarity": 10.0, "octaves": 2, "low": 1.0, "high": 0.0, "ymax": 40.0,
                    "spawners": [{
                        "kind": "uniform",
                        "name": "drips",
                        "objects": [{ "name": "drip", "collider_radius": 0.1 }],
                        "count": 5,
                        "check_radius": 0.5
                    }]
                }
            }"#,
        )
        .unwrap();

        let config = CaveConfig::load(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.region_scale, DEFAULT_REGION_SCALE);
        assert_eq!(config.ground, LayerConfig::default_ground());
        match &config.ceiling.spawners[0] {
            SpawnerConfig::Uniform(u) => {
                assert_eq!(u.name, "drips");
                assert_eq!(u.rotation, [0.0; 3]);
                assert_eq!(u.clearance, Clearance::Generic);
            }
            other => panic!("unexpected spawner {:?}", other),
        }
        config.validate().unwrap();
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"seed\": ").unwrap();
        assert!(matches!(CaveConfig::load(&path), Err(Error::Json(_))));
        assert!(matches!(
            CaveConfig::load(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_sets() {
        let mut config = CaveConfig::default();
        if let SpawnerConfig::TwoTier(c) = &mut config.ground.spawners[1] {
            c.secondary.clear();
        }
        assert!(matches!(
            config.validate(),
            Err(Error::EmptyObjectSet { set: "secondary", .. })
        ));

        let mut config = CaveConfig::default();
        if let SpawnerConfig::Uniform(c) = &mut config.ceiling.spawners[0] {
            c.objects.clear();
        }
        assert!(matches!(config.validate(), Err(Error::EmptyObjectSet { .. })));
    }

    #[test]
    fn test_validate_rejects_degenerate_radii() {
        for radius in [0.0, -3.0] {
            let mut config = CaveConfig::default();
            if let SpawnerConfig::TwoTier(c) = &mut config.ground.spawners[2] {
                c.spawn_radius = radius;
            }
            assert!(matches!(config.validate(), Err(Error::InvalidRadius { .. })));
        }

        let mut config = CaveConfig::default();
        if let SpawnerConfig::Settlement(c) = &mut config.ground.spawners[0] {
            c.anchors[0].collider_radius = 0.0;
        }
        assert!(matches!(config.validate(), Err(Error::InvalidRadius { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_globals() {
        let mut config = CaveConfig::default();
        config.max_attempts = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = CaveConfig::default();
        config.noise.threshold_low = 2.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = CaveConfig::default();
        config.ceiling.octaves = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
