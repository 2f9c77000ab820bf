//! Settlement spawner: spaced anchors, a ring of objects facing each
//! anchor, and scattered details inside the ring

use std::f32::consts::TAU;

use crate::core::error::Error;
use crate::core::types::{Quat, Result, Vec3};
use crate::generation::config::SettlementConfig;
use crate::generation::policy::Clearance;
use crate::math::look_rotation;
use crate::scene::ObstacleKind;

use super::{
    disk_candidate, place_anchors, place_satellite, require_footprints, require_non_negative,
    require_positive, require_prefabs, AnchorPhase, PlacementContext, SatellitePhase, SpawnReport,
    Spawner,
};

/// Settlement layout drawn once per spawn and shared by every anchor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingLayout {
    pub count: usize,
    pub radius: f32,
}

impl RingLayout {
    /// Planar offset of ring slot `slot` from the anchor
    pub fn slot_offset(&self, slot: usize) -> Vec3 {
        let theta = slot as f32 * TAU / self.count as f32;
        Vec3::new(theta.cos() * self.radius, 0.0, theta.sin() * self.radius)
    }
}

#[derive(Clone, Debug)]
pub struct SettlementSpawner {
    config: SettlementConfig,
}

impl SettlementSpawner {
    pub fn new(config: SettlementConfig) -> Result<Self> {
        let name = config.name.as_str();
        require_prefabs(name, "anchor", &config.anchors)?;
        require_prefabs(name, "ring", &config.ring)?;
        if config.detail_count > 0 {
            require_prefabs(name, "detail", &config.details)?;
        }
        require_footprints(name, &config.anchors)?;
        if config.ring_counts.is_empty() {
            return Err(Error::InvalidCount {
                spawner: name.to_string(),
                what: "ring count",
            });
        }
        if config.ring_radii.is_empty() {
            return Err(Error::InvalidCount {
                spawner: name.to_string(),
                what: "ring radius",
            });
        }
        for &radius in &config.ring_radii {
            require_positive(name, "ring", radius)?;
        }
        require_non_negative(name, "check", config.check_radius)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// One count and one radius, drawn independently from the candidates
    pub fn draw_layout(&self, ctx: &mut PlacementContext<'_>) -> RingLayout {
        let cfg = &self.config;
        let count = cfg.ring_counts[ctx.rng.index(cfg.ring_counts.len())];
        let radius = cfg.ring_radii[ctx.rng.index(cfg.ring_radii.len())];
        RingLayout { count, radius }
    }
}

impl Spawner for SettlementSpawner {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn requested(&self) -> usize {
        self.config.count
    }

    fn run(&self, ctx: &mut PlacementContext<'_>, report: &mut SpawnReport) -> Result<()> {
        let cfg = &self.config;
        let layout = self.draw_layout(ctx);
        let spacing = ctx.settlement_spacing;

        let anchors = place_anchors(
            ctx,
            &AnchorPhase {
                source: cfg.region.into(),
                prefabs: &cfg.anchors,
                kind: ObstacleKind::SettlementAnchor,
                count: cfg.count,
                check_radius: cfg.check_radius,
                clearance: Clearance::Generic,
                anchor_spacing: Some(spacing),
            },
            report,
        )?;
        log::debug!(
            "{}: {} anchors, ring of {} at radius {}",
            cfg.name,
            anchors.len(),
            layout.count,
            layout.radius
        );

        let ring = SatellitePhase {
            prefabs: &cfg.ring,
            check_radius: cfg.check_radius,
            clearance: Clearance::Generic,
        };
        for anchor in &anchors {
            for slot in 0..layout.count {
                let pos = ctx
                    .terrain
                    .snap_to_surface(anchor.position + layout.slot_offset(slot));
                let facing = look_rotation(anchor.position - pos, Vec3::Y);
                place_satellite(ctx, &ring, anchor, pos, facing, report)?;
            }
        }

        let details = SatellitePhase {
            prefabs: &cfg.details,
            check_radius: cfg.check_radius,
            clearance: Clearance::Generic,
        };
        for anchor in &anchors {
            for _ in 0..cfg.detail_count {
                let pos = disk_candidate(ctx, anchor.position, layout.radius);
                place_satellite(ctx, &details, anchor, pos, Quat::IDENTITY, report)?;
            }
        }

        log::debug!(
            "{}: placed {} objects, skipped {}",
            cfg.name,
            report.placed.len(),
            report.skipped
        );
        Ok(())
    }
}
