//! Uniform spawner: independent placements anywhere on the layer surface

use crate::core::types::{Quat, Result};
use crate::generation::attempt::{bounded, Attempt};
use crate::generation::config::UniformConfig;
use crate::math::euler_degrees;
use crate::scene::ObstacleKind;

use super::{
    require_non_negative, require_prefabs, CandidateSource, PlacementContext, SpawnReport,
    SpawnStatus, Spawner,
};

/// Places `count` objects at uniformly drawn surface points, all sharing
/// one fixed orientation.
#[derive(Clone, Debug)]
pub struct UniformSpawner {
    config: UniformConfig,
    rotation: Quat,
}

impl UniformSpawner {
    pub fn new(config: UniformConfig) -> Result<Self> {
        require_prefabs(&config.name, "object", &config.objects)?;
        require_non_negative(&config.name, "check", config.check_radius)?;
        let rotation = euler_degrees(config.rotation);
        Ok(Self { config, rotation })
    }

    pub fn config(&self) -> &UniformConfig {
        &self.config
    }
}

impl Spawner for UniformSpawner {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn requested(&self) -> usize {
        self.config.count
    }

    fn run(&self, ctx: &mut PlacementContext<'_>, report: &mut SpawnReport) -> Result<()> {
        let cfg = &self.config;

        for placed in 0..cfg.count {
            let outcome = bounded(ctx.max_attempts, || {
                let Some(pos) = ctx.draw(CandidateSource::Surface) else {
                    return Ok(None);
                };
                Ok(ctx.is_clear(pos, cfg.check_radius, cfg.clearance).then_some(pos))
            })?;
            report.attempts += outcome.attempts();

            match outcome {
                Attempt::Found { value: pos, .. } => {
                    let prefab = ctx.choose(&cfg.objects);
                    let object = ctx.instantiate(prefab, pos, self.rotation, ObstacleKind::Generic)?;
                    report.placed.push(object);
                }
                Attempt::Exhausted { attempts } => {
                    log::warn!(
                        "{}: no valid position after {} attempts, placed {}/{}",
                        cfg.name,
                        attempts,
                        placed,
                        cfg.count
                    );
                    report.status = SpawnStatus::Exhausted {
                        requested: cfg.count,
                        placed,
                    };
                    break;
                }
            }
        }

        log::debug!(
            "{}: placed {} objects in {} attempts",
            cfg.name,
            report.placed.len(),
            report.attempts
        );
        Ok(())
    }
}
