//! Two-tier spawner: primaries from a region pool, satellites scattered
//! around each of them

use crate::core::types::{Quat, Result};
use crate::generation::config::TwoTierConfig;
use crate::scene::ObstacleKind;

use super::{
    disk_candidate, place_anchors, place_satellite, require_footprints, require_non_negative,
    require_positive, require_prefabs, AnchorPhase, PlacementContext, SatellitePhase, SpawnReport,
    Spawner,
};

/// Clustered placement: `count` anchors, then up to `secondary_count`
/// satellites per anchor within `spawn_radius`.
///
/// Satellite failures are skipped rather than redrawn, so the satellite
/// count is an upper bound.
#[derive(Clone, Debug)]
pub struct TwoTierSpawner {
    config: TwoTierConfig,
}

impl TwoTierSpawner {
    pub fn new(config: TwoTierConfig) -> Result<Self> {
        require_prefabs(&config.name, "primary", &config.primary)?;
        require_prefabs(&config.name, "secondary", &config.secondary)?;
        require_footprints(&config.name, &config.primary)?;
        require_positive(&config.name, "spawn", config.spawn_radius)?;
        require_non_negative(&config.name, "check", config.check_radius)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TwoTierConfig {
        &self.config
    }
}

impl Spawner for TwoTierSpawner {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn requested(&self) -> usize {
        self.config.count
    }

    fn run(&self, ctx: &mut PlacementContext<'_>, report: &mut SpawnReport) -> Result<()> {
        let cfg = &self.config;

        let anchors = place_anchors(
            ctx,
            &AnchorPhase {
                source: cfg.region.into(),
                prefabs: &cfg.primary,
                kind: ObstacleKind::Generic,
                count: cfg.count,
                check_radius: cfg.check_radius,
                clearance: cfg.clearance,
                anchor_spacing: None,
            },
            report,
        )?;
        log::debug!("{}: {} anchors placed", cfg.name, anchors.len());

        let satellites = SatellitePhase {
            prefabs: &cfg.secondary,
            check_radius: cfg.check_radius,
            clearance: cfg.clearance,
        };
        for anchor in &anchors {
            for _ in 0..cfg.secondary_count {
                let pos = disk_candidate(ctx, anchor.position, cfg.spawn_radius);
                place_satellite(ctx, &satellites, anchor, pos, Quat::IDENTITY, report)?;
            }
        }

        log::debug!(
            "{}: placed {} objects, skipped {} satellites",
            cfg.name,
            report.placed.len(),
            report.skipped
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::SpawnStatus;
    use super::*;
    use crate::core::error::Error;
    use crate::core::types::Vec3;
    use crate::generation::policy::{Clearance, PlacementPolicy};
    use crate::generation::random::SeededRandom;
    use crate::generation::region::{Region, RegionPools, SpawnPoint};
    use crate::math::planar_distance_sq;
    use crate::scene::{ObjectScene, Prefab};

    fn config() -> TwoTierConfig {
        TwoTierConfig {
            name: "rocks".into(),
            region: Some(Region::Rock),
            primary: vec![Prefab::new("boulder", 2.0)],
            secondary: vec![Prefab::new("gem", 0.25)],
            count: 4,
            secondary_count: 6,
            spawn_radius: 8.0,
            check_radius: 1.0,
            clearance: Clearance::Generic,
        }
    }

    fn rock_pools(height: f32) -> RegionPools {
        let mut pools = RegionPools::new();
        for z in (10..=90).step_by(20) {
            for x in (10..=90).step_by(20) {
                pools.push(Region::Rock, SpawnPoint(Vec3::new(x as f32, height, z as f32)));
            }
        }
        pools
    }

    #[test]
    fn test_anchors_then_satellites() {
        let terrain = flat_terrain(10.0);
        let mut scene = ObjectScene::default();
        let mut rng = SeededRandom::new(20);
        let pools = rock_pools(10.0);
        let spawner = TwoTierSpawner::new(config()).unwrap();

        let report = {
            let mut ctx = context(&terrain, &mut scene, &mut rng, &pools, 25.0);
            spawner.spawn(&mut ctx).unwrap()
        };

        assert_eq!(report.anchors, 4);
        assert_eq!(report.status, SpawnStatus::Complete);
        let (anchors, satellites) = report.placed.split_at(4);
        assert!(anchors.iter().all(|a| a.prefab == "boulder"));
        assert!(satellites.iter().all(|s| s.prefab == "gem"));
        assert_eq!(satellites.len() + report.skipped, 4 * 6);
        assert!(!satellites.is_empty());

        for sat in satellites {
            let near = anchors.iter().any(|a| {
                let d2 = planar_distance_sq(sat.position, a.position);
                d2 <= 8.0 * 8.0 + 1e-3 && PlacementPolicy::is_outside_origin(sat.position, a.position, 2.0)
            });
            assert!(near, "satellite {} not near any anchor", sat.position);
            assert_eq!(sat.rotation, Quat::IDENTITY);
            assert!((sat.position.y - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_origin_exclusion_rejects_inside_footprint() {
        let terrain = flat_terrain(10.0);
        let mut scene = ObjectScene::default();
        let mut rng = SeededRandom::new(21);
        let mut pools = RegionPools::new();
        pools.push(Region::Rock, SpawnPoint(Vec3::new(50.0, 10.0, 50.0)));
        let mut cfg = config();
        cfg.count = 1;
        cfg.secondary_count = 40;
        cfg.check_radius = 0.0;
        cfg.primary = vec![Prefab::new("boulder", 3.0)];
        cfg.spawn_radius = 6.0;
        let spawner = TwoTierSpawner::new(cfg).unwrap();

        let report = {
            let mut ctx = context(&terrain, &mut scene, &mut rng, &pools, 25.0);
            spawner.spawn(&mut ctx).unwrap()
        };

        let anchor = &report.placed[0];
        // A quarter of the disk area lies inside the footprint
        assert!(report.skipped > 0);
        for sat in &report.placed[1..] {
            assert!(planar_distance_sq(sat.position, anchor.position) > 9.0);
        }
    }

    #[test]
    fn test_satellites_stay_in_bounds() {
        let terrain = flat_terrain(10.0);
        let mut scene = ObjectScene::default();
        let mut rng = SeededRandom::new(22);
        let mut pools = RegionPools::new();
        pools.push(Region::Rock, SpawnPoint(Vec3::new(0.5, 10.0, 0.5)));
        let mut cfg = config();
        cfg.count = 1;
        cfg.secondary_count = 30;
        cfg.check_radius = 0.0;
        cfg.primary = vec![Prefab::new("boulder", 0.1)];
        let spawner = TwoTierSpawner::new(cfg).unwrap();

        let report = {
            let mut ctx = context(&terrain, &mut scene, &mut rng, &pools, 25.0);
            spawner.spawn(&mut ctx).unwrap()
        };
        let bounds = crate::math::PlanarBounds::new(crate::core::types::Vec2::ZERO, crate::core::types::Vec2::splat(100.0));
        assert_admitted(&report.placed, bounds, 25.0);
        assert!(report.skipped > 0);
    }

    #[test]
    fn test_empty_pool_reports_exhaustion_without_satellites() {
        let terrain = flat_terrain(10.0);
        let mut scene = ObjectScene::default();
        let mut rng = SeededRandom::new(23);
        let pools = RegionPools::new();
        let spawner = TwoTierSpawner::new(config()).unwrap();

        let report = {
            let mut ctx = context(&terrain, &mut scene, &mut rng, &pools, 25.0);
            spawner.spawn(&mut ctx).unwrap()
        };
        assert!(report.placed.is_empty());
        assert!(report.is_exhausted());
    }

    #[test]
    fn test_collaborator_error_propagates() {
        let terrain = flat_terrain(10.0);
        let mut scene = FailingScene {
            inner: ObjectScene::default(),
            remaining: 2,
        };
        let mut rng = SeededRandom::new(24);
        let pools = rock_pools(10.0);
        let spawner = TwoTierSpawner::new(config()).unwrap();

        let result = {
            let mut ctx = context(&terrain, &mut scene, &mut rng, &pools, 25.0);
            spawner.spawn(&mut ctx)
        };
        assert!(matches!(result, Err(Error::Collaborator(_))));
        // Objects placed before the failure are kept
        assert_eq!(scene.inner.len(), 2);
    }

    #[test]
    fn test_failed_run_keeps_partial_report() {
        let terrain = flat_terrain(10.0);
        let mut scene = FailingScene {
            inner: ObjectScene::default(),
            remaining: 2,
        };
        let mut rng = SeededRandom::new(24);
        let pools = rock_pools(10.0);
        let spawner = TwoTierSpawner::new(config()).unwrap();

        let mut report = SpawnReport::new(spawner.name(), spawner.requested());
        let result = {
            let mut ctx = context(&terrain, &mut scene, &mut rng, &pools, 25.0);
            spawner.run(&mut ctx, &mut report)
        };
        assert!(result.is_err());
        assert_eq!(report.anchors, 2);
        assert_eq!(report.placed, scene.inner.objects());
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        let mut cfg = config();
        cfg.spawn_radius = 0.0;
        assert!(matches!(
            TwoTierSpawner::new(cfg),
            Err(Error::InvalidRadius { what: "spawn", .. })
        ));

        let mut cfg = config();
        cfg.primary = vec![Prefab::new("flat", -1.0)];
        assert!(matches!(
            TwoTierSpawner::new(cfg),
            Err(Error::InvalidRadius { what: "anchor collider", .. })
        ));

        let mut cfg = config();
        cfg.secondary.clear();
        assert!(matches!(
            TwoTierSpawner::new(cfg),
            Err(Error::EmptyObjectSet { set: "secondary", .. })
        ));
    }
}
