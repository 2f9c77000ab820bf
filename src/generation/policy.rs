//! Geometric acceptance rules for placement candidates

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::math::{planar_distance_sq, PlanarBounds};
use crate::scene::{ObstacleKind, SpatialIndex};
use crate::terrain::Terrain;

/// Terrain layer of the cave
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Ground,
    Ceiling,
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::Ground => "ground",
            Layer::Ceiling => "ceiling",
        }
    }
}

/// Height constraint of a layer, inclusive
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tier {
    /// Ground: `y <= ymax`
    AtMost(f32),
    /// Ceiling: `y >= ymax`
    AtLeast(f32),
}

impl Tier {
    pub fn for_layer(layer: Layer, ymax: f32) -> Self {
        match layer {
            Layer::Ground => Tier::AtMost(ymax),
            Layer::Ceiling => Tier::AtLeast(ymax),
        }
    }

    #[inline]
    pub fn admits(self, y: f32) -> bool {
        match self {
            Tier::AtMost(ymax) => y <= ymax,
            Tier::AtLeast(ymax) => y >= ymax,
        }
    }
}

/// Which obstacle kinds block a clearance check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clearance {
    /// Only ordinary objects block
    #[default]
    Generic,
    /// Ordinary objects and settlement anchors block
    IncludingAnchors,
}

impl Clearance {
    #[inline]
    fn blocks(self, kind: ObstacleKind) -> bool {
        match (self, kind) {
            (_, ObstacleKind::Generic) => true,
            (Clearance::IncludingAnchors, ObstacleKind::SettlementAnchor) => true,
            _ => false,
        }
    }
}

/// Bounds and tier of one layer plus the side-effect-free checks built on them
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPolicy {
    bounds: PlanarBounds,
    tier: Tier,
}

impl PlacementPolicy {
    pub fn new(bounds: PlanarBounds, tier: Tier) -> Self {
        Self { bounds, tier }
    }

    pub fn for_terrain(terrain: &dyn Terrain, tier: Tier) -> Self {
        Self::new(PlanarBounds::from_footprint(terrain.position(), terrain.size()), tier)
    }

    pub fn bounds(&self) -> PlanarBounds {
        self.bounds
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Planar footprint check, edges included
    #[inline]
    pub fn in_bounds(&self, pos: Vec3) -> bool {
        self.bounds.contains(pos)
    }

    #[inline]
    pub fn admits_height(&self, pos: Vec3) -> bool {
        self.tier.admits(pos.y)
    }

    /// Bounds and tier together
    #[inline]
    pub fn admits(&self, pos: Vec3) -> bool {
        self.in_bounds(pos) && self.admits_height(pos)
    }

    /// True iff no collider within planar `radius` of `pos` is blocking under `clearance`
    pub fn has_clearance<I>(index: &I, pos: Vec3, radius: f32, clearance: Clearance) -> bool
    where
        I: SpatialIndex + ?Sized,
    {
        !index
            .overlap_column(pos, radius)
            .iter()
            .any(|c| clearance.blocks(c.kind))
    }

    /// True iff no settlement anchor lies within planar `radius` of `pos`
    pub fn has_anchor_spacing<I>(index: &I, pos: Vec3, radius: f32) -> bool
    where
        I: SpatialIndex + ?Sized,
    {
        !index
            .overlap_column(pos, radius)
            .iter()
            .any(|c| c.kind == ObstacleKind::SettlementAnchor)
    }

    /// True iff `pos` lies strictly outside the anchor's planar footprint.
    ///
    /// A point exactly on the footprint circle counts as inside.
    #[inline]
    pub fn is_outside_origin(pos: Vec3, anchor_pos: Vec3, anchor_radius: f32) -> bool {
        planar_distance_sq(pos, anchor_pos) > anchor_radius * anchor_radius
    }
}
