//! Cave generation pipeline: heightmaps, region pools, then spawners.
//!
//! The pipeline runs once, synchronously:
//! 1. Pick the run seed (configured, or drawn from the random source)
//! 2. Synthesize ground and ceiling heightmaps from that one seed
//! 3. Per layer, classify terrain cells into region pools
//! 4. Per layer, run the configured spawners in order
//!
//! Heightmap rows are computed in parallel; placement is sequential so
//! every clearance check sees all earlier placements.

pub mod attempt;
pub mod config;
pub mod policy;
pub mod random;
pub mod region;
pub mod spawn;

pub use attempt::{bounded, Attempt};
pub use config::{
    CaveConfig, LayerConfig, NoiseSettings, SettlementConfig, SpawnerConfig, TwoTierConfig,
    UniformConfig,
};
pub use policy::{Clearance, Layer, PlacementPolicy, Tier};
pub use random::{RandomSource, SeededRandom};
pub use region::{Region, RegionClassifier, RegionPools, SpawnPoint, DEFAULT_REGION_SCALE};
pub use spawn::{
    CandidateSource, PlacementContext, SettlementSpawner, SpawnReport, SpawnStatus, Spawner,
    TwoTierSpawner, UniformSpawner,
};

use std::time::Instant;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::scene::Scene;
use crate::terrain::{Terrain, TerrainHeightSynthesizer};

/// Seeds drawn from the random source are limited to 24 bits
pub const SEED_MASK: u32 = 0xFF_FFFF;

/// Outcome of populating one layer
#[derive(Debug)]
pub struct LayerReport {
    pub layer: Layer,
    /// Reports of the spawners that ran, in run order; an aborted
    /// spawner's partial report comes last
    pub spawns: Vec<SpawnReport>,
    /// Collaborator failure that aborted the remaining spawners
    pub error: Option<Error>,
}

impl LayerReport {
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            spawns: Vec::new(),
            error: None,
        }
    }

    pub fn placed_count(&self) -> usize {
        self.spawns.iter().map(|s| s.placed.len()).sum()
    }

    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of a full generation run
#[derive(Debug)]
pub struct GenerationReport {
    /// Seed shared by both layers
    pub seed: u32,
    pub ground: LayerReport,
    pub ceiling: LayerReport,
}

impl GenerationReport {
    pub fn layers(&self) -> [&LayerReport; 2] {
        [&self.ground, &self.ceiling]
    }

    pub fn placed_count(&self) -> usize {
        self.ground.placed_count() + self.ceiling.placed_count()
    }

    /// Spawners that hit their attempt ceiling
    pub fn exhausted(&self) -> Vec<&SpawnReport> {
        self.layers()
            .into_iter()
            .flat_map(|l| l.spawns.iter())
            .filter(|s| s.is_exhausted())
            .collect()
    }

    /// No exhausted spawner and no aborted layer
    pub fn is_complete(&self) -> bool {
        self.exhausted().is_empty() && self.layers().iter().all(|l| !l.is_aborted())
    }
}

/// Generates a two-layer cave into host-provided terrains and scene
pub struct CaveGenerator<T: Terrain, S: Scene, R: RandomSource> {
    config: CaveConfig,
    synthesizer: TerrainHeightSynthesizer,
    ground: T,
    ceiling: T,
    scene: S,
    rng: R,
    ground_spawners: Vec<Box<dyn Spawner>>,
    ceiling_spawners: Vec<Box<dyn Spawner>>,
}

impl<T: Terrain, S: Scene, R: RandomSource> CaveGenerator<T, S, R> {
    /// Validate `config` and build every spawner before touching any terrain
    pub fn new(config: CaveConfig, ground: T, ceiling: T, scene: S, rng: R) -> Result<Self> {
        config.validate()?;
        let ground_spawners = config.ground.build_spawners()?;
        let ceiling_spawners = config.ceiling.build_spawners()?;
        let synthesizer = TerrainHeightSynthesizer::new(config.noise.base());
        Ok(Self {
            config,
            synthesizer,
            ground,
            ceiling,
            scene,
            rng,
            ground_spawners,
            ceiling_spawners,
        })
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    pub fn ground(&self) -> &T {
        &self.ground
    }

    pub fn ceiling(&self) -> &T {
        &self.ceiling
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Give back the terrains and the populated scene
    pub fn into_parts(self) -> (T, T, S) {
        (self.ground, self.ceiling, self.scene)
    }

    /// Run the whole pipeline.
    ///
    /// Heightmap synthesis failures are fatal. A spawner failure aborts the
    /// rest of its layer, keeps what was already placed, and is recorded in
    /// that layer's report.
    pub fn generate(&mut self) -> Result<GenerationReport> {
        let start = Instant::now();
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => self.rng.next_u32() & SEED_MASK,
        };
        log::info!("Generating cave with seed {}", seed);

        let (g, c) = (&self.config.ground, &self.config.ceiling);
        self.synthesizer
            .synthesize(&mut self.ground, seed, g.lacunarity, g.octaves, g.low, g.high)?;
        self.synthesizer
            .synthesize(&mut self.ceiling, seed, c.lacunarity, c.octaves, c.low, c.high)?;

        let ground = self.populate(Layer::Ground, seed);
        let ceiling = self.populate(Layer::Ceiling, seed);
        let report = GenerationReport {
            seed,
            ground,
            ceiling,
        };

        log::info!(
            "Cave generated in {:.1}ms: {} objects, {} exhausted spawners",
            start.elapsed().as_secs_f64() * 1000.0,
            report.placed_count(),
            report.exhausted().len()
        );
        Ok(report)
    }

    fn populate(&mut self, layer: Layer, seed: u32) -> LayerReport {
        let (terrain, spawners, ymax) = match layer {
            Layer::Ground => (&self.ground, &self.ground_spawners, self.config.ground.ymax),
            Layer::Ceiling => (&self.ceiling, &self.ceiling_spawners, self.config.ceiling.ymax),
        };

        let classifier = RegionClassifier::new(seed, self.config.region_scale);
        let pools = classifier.classify(terrain);
        let mut ctx = PlacementContext {
            terrain,
            scene: &mut self.scene,
            rng: &mut self.rng,
            pools: &pools,
            policy: PlacementPolicy::for_terrain(terrain, Tier::for_layer(layer, ymax)),
            max_attempts: self.config.max_attempts,
            settlement_spacing: self.config.settlement_spacing,
        };

        let mut report = LayerReport::new(layer);
        for spawner in spawners {
            let mut spawn = SpawnReport::new(spawner.name(), spawner.requested());
            match spawner.run(&mut ctx, &mut spawn) {
                Ok(()) => {
                    log::info!(
                        "{} layer: {} placed {} objects ({} anchors, {} skipped)",
                        layer.name(),
                        spawn.spawner,
                        spawn.placed.len(),
                        spawn.anchors,
                        spawn.skipped
                    );
                    report.spawns.push(spawn);
                }
                Err(err) => {
                    log::warn!(
                        "{} layer aborted at spawner '{}' after {} objects: {}",
                        layer.name(),
                        spawner.name(),
                        spawn.placed.len(),
                        err
                    );
                    spawn.status = SpawnStatus::Aborted;
                    report.spawns.push(spawn);
                    report.error = Some(err);
                    break;
                }
            }
        }
        report
    }
}
