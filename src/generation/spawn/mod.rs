//! Spawners: bounded draw/validate/accept loops that populate a layer
//!
//! Every spawner runs against a [`PlacementContext`] holding the layer's
//! terrain, the host scene, the run's random source and the classified
//! region pools. Placement is strictly sequential: each instantiated
//! object is visible to the clearance check of the next candidate.

pub mod settlement;
pub mod two_tier;
pub mod uniform;

pub use settlement::SettlementSpawner;
pub use two_tier::TwoTierSpawner;
pub use uniform::UniformSpawner;

use serde::Serialize;

use crate::core::error::Error;
use crate::core::types::{Quat, Result, Vec3};
use crate::math::yaw_rotation;
use crate::scene::{ObstacleKind, PlacedObject, Prefab, Scene};
use crate::terrain::Terrain;

use super::attempt::{bounded, Attempt};
use super::policy::{Clearance, PlacementPolicy};
use super::random::RandomSource;
use super::region::{Region, RegionPools};

/// Everything a spawner needs to place objects on one layer
pub struct PlacementContext<'a> {
    pub terrain: &'a dyn Terrain,
    pub scene: &'a mut dyn Scene,
    pub rng: &'a mut dyn RandomSource,
    pub pools: &'a RegionPools,
    pub policy: PlacementPolicy,
    /// Ceiling on candidate draws per requested placement
    pub max_attempts: u32,
    /// Minimum distance between settlement anchors
    pub settlement_spacing: f32,
}

impl PlacementContext<'_> {
    /// Draw one candidate position, or `None` when the source is empty
    pub fn draw(&mut self, source: CandidateSource) -> Option<Vec3> {
        match source {
            CandidateSource::Surface => {
                let size = self.terrain.size();
                let x = self.rng.range_f32(0.0, size.x);
                let z = self.rng.range_f32(0.0, size.z);
                Some(self.terrain.surface_point(x, z))
            }
            CandidateSource::Region(region) => self
                .pools
                .draw(region, &mut *self.rng)
                .map(|p| p.position()),
        }
    }

    /// Bounds, tier and clearance together
    pub fn is_clear(&self, pos: Vec3, radius: f32, clearance: Clearance) -> bool {
        self.policy.admits(pos)
            && PlacementPolicy::has_clearance(&*self.scene, pos, radius, clearance)
    }

    /// Pick a random variant from a non-empty set
    pub fn choose<'p>(&mut self, prefabs: &'p [Prefab]) -> &'p Prefab {
        &prefabs[self.rng.index(prefabs.len())]
    }

    pub fn instantiate(
        &mut self,
        prefab: &Prefab,
        position: Vec3,
        rotation: Quat,
        kind: ObstacleKind,
    ) -> Result<PlacedObject> {
        let placed = self.scene.instantiate(prefab, position, rotation, kind)?;
        log::trace!("Placed '{}' at {}", placed.prefab, placed.position);
        Ok(placed)
    }
}

/// Where anchor candidates are drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateSource {
    /// Uniformly over the whole terrain surface
    Surface,
    /// With replacement from a classified region pool
    Region(Region),
}

impl From<Option<Region>> for CandidateSource {
    fn from(region: Option<Region>) -> Self {
        region.map_or(CandidateSource::Surface, CandidateSource::Region)
    }
}

/// Completion state of one spawner run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpawnStatus {
    /// Every requested primary placement succeeded
    Complete,
    /// The attempt ceiling was hit before `requested` primaries were placed
    Exhausted { requested: usize, placed: usize },
    /// A collaborator failed mid-run; the report holds what was placed before
    Aborted,
}

/// Outcome of one spawner run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpawnReport {
    pub spawner: String,
    /// Primary placements asked for
    pub requested: usize,
    /// Number of primaries that became anchors
    pub anchors: usize,
    /// Every object placed, in placement order
    pub placed: Vec<PlacedObject>,
    /// Satellite candidates that failed validation
    pub skipped: usize,
    /// Total candidate draws
    pub attempts: u32,
    pub status: SpawnStatus,
}

impl SpawnReport {
    pub fn new(spawner: impl Into<String>, requested: usize) -> Self {
        Self {
            spawner: spawner.into(),
            requested,
            anchors: 0,
            placed: Vec::new(),
            skipped: 0,
            attempts: 0,
            status: SpawnStatus::Complete,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.status, SpawnStatus::Exhausted { .. })
    }
}

/// A placement routine run against one layer
pub trait Spawner {
    fn name(&self) -> &str;

    /// Primary placements asked for
    fn requested(&self) -> usize;

    /// Place objects, recording each one in `report` as it lands.
    ///
    /// On error `report` still holds every object placed before the failure.
    fn run(&self, ctx: &mut PlacementContext<'_>, report: &mut SpawnReport) -> Result<()>;

    fn spawn(&self, ctx: &mut PlacementContext<'_>) -> Result<SpawnReport> {
        let mut report = SpawnReport::new(self.name(), self.requested());
        self.run(ctx, &mut report)?;
        Ok(report)
    }
}

/// Primary placement parameters shared by the clustered spawners
pub(crate) struct AnchorPhase<'p> {
    pub source: CandidateSource,
    pub prefabs: &'p [Prefab],
    pub kind: ObstacleKind,
    pub count: usize,
    pub check_radius: f32,
    pub clearance: Clearance,
    /// Extra exclusion radius against other settlement anchors
    pub anchor_spacing: Option<f32>,
}

/// Place up to `phase.count` randomly-yawed primaries.
///
/// Stops at the first draw that exhausts its attempt ceiling and tags the
/// report accordingly.
pub(crate) fn place_anchors(
    ctx: &mut PlacementContext<'_>,
    phase: &AnchorPhase<'_>,
    report: &mut SpawnReport,
) -> Result<Vec<PlacedObject>> {
    let mut anchors = Vec::with_capacity(phase.count);
    for _ in 0..phase.count {
        let outcome = bounded(ctx.max_attempts, || {
            let Some(pos) = ctx.draw(phase.source) else {
                return Ok(None);
            };
            let spaced = phase.anchor_spacing.is_none_or(|spacing| {
                PlacementPolicy::has_anchor_spacing(&*ctx.scene, pos, spacing)
            });
            if !spaced || !ctx.is_clear(pos, phase.check_radius, phase.clearance) {
                log::trace!("{}: rejected anchor candidate {}", report.spawner, pos);
                return Ok(None);
            }
            Ok(Some(pos))
        })?;
        report.attempts += outcome.attempts();

        match outcome {
            Attempt::Found { value: pos, .. } => {
                let prefab = ctx.choose(phase.prefabs);
                let rotation = yaw_rotation(ctx.rng.next_f32());
                let anchor = ctx.instantiate(prefab, pos, rotation, phase.kind)?;
                report.placed.push(anchor.clone());
                report.anchors += 1;
                anchors.push(anchor);
            }
            Attempt::Exhausted { attempts } => {
                log::warn!(
                    "{}: no valid anchor position after {} attempts, placed {}/{}",
                    report.spawner,
                    attempts,
                    anchors.len(),
                    phase.count
                );
                report.status = SpawnStatus::Exhausted {
                    requested: phase.count,
                    placed: anchors.len(),
                };
                break;
            }
        }
    }
    Ok(anchors)
}

/// Placement parameters for objects clustered around an anchor
pub(crate) struct SatellitePhase<'p> {
    pub prefabs: &'p [Prefab],
    pub check_radius: f32,
    pub clearance: Clearance,
}

/// Validate and place one satellite around `anchor`; failures are skipped.
///
/// Returns whether the candidate was placed.
pub(crate) fn place_satellite(
    ctx: &mut PlacementContext<'_>,
    phase: &SatellitePhase<'_>,
    anchor: &PlacedObject,
    pos: Vec3,
    rotation: Quat,
    report: &mut SpawnReport,
) -> Result<bool> {
    report.attempts += 1;
    let accepted = ctx.is_clear(pos, phase.check_radius, phase.clearance)
        && PlacementPolicy::is_outside_origin(pos, anchor.position, anchor.collider_radius);
    if !accepted {
        log::trace!("{}: skipped satellite candidate {}", report.spawner, pos);
        report.skipped += 1;
        return Ok(false);
    }
    let prefab = ctx.choose(phase.prefabs);
    let placed = ctx.instantiate(prefab, pos, rotation, ObstacleKind::Generic)?;
    report.placed.push(placed);
    Ok(true)
}

/// Uniform disk sample of `radius` around `center`, snapped to the surface
pub(crate) fn disk_candidate(ctx: &mut PlacementContext<'_>, center: Vec3, radius: f32) -> Vec3 {
    let offset = ctx.rng.in_unit_disk() * radius;
    ctx.terrain
        .snap_to_surface(Vec3::new(center.x + offset.x, center.y, center.z + offset.y))
}

pub(crate) fn require_prefabs(spawner: &str, set: &'static str, prefabs: &[Prefab]) -> Result<()> {
    if prefabs.is_empty() {
        return Err(Error::EmptyObjectSet {
            spawner: spawner.to_string(),
            set,
        });
    }
    Ok(())
}

/// Must be finite and strictly positive
pub(crate) fn require_positive(spawner: &str, what: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidRadius {
            spawner: spawner.to_string(),
            what,
            value,
        });
    }
    Ok(())
}

/// Must be finite and not negative
pub(crate) fn require_non_negative(spawner: &str, what: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidRadius {
            spawner: spawner.to_string(),
            what,
            value,
        });
    }
    Ok(())
}

/// Anchor prefabs need a usable footprint for origin exclusion
pub(crate) fn require_footprints(spawner: &str, prefabs: &[Prefab]) -> Result<()> {
    prefabs
        .iter()
        .try_for_each(|p| require_positive(spawner, "anchor collider", p.collider_radius))
}
