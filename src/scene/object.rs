//! Placed objects and their obstacle classification

use serde::{Deserialize, Serialize};

use crate::core::types::{Quat, Vec3};

/// Stable identity of a placed object within one scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// How a placed object participates in clearance checks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Never blocks placement
    None,
    /// Blocks ordinary clearance checks
    #[default]
    Generic,
    /// Centre of a settlement; blocks settlement spacing checks
    SettlementAnchor,
}

/// A placeable object variant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    /// Radius of the object's collision sphere in world units
    pub collider_radius: f32,
}

impl Prefab {
    pub fn new(name: impl Into<String>, collider_radius: f32) -> Self {
        Self {
            name: name.into(),
            collider_radius,
        }
    }
}

/// An object emitted by a spawner and instantiated by the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub prefab: String,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub collider_radius: f32,
}

impl PlacedObject {
    pub fn collider(&self) -> Collider {
        Collider {
            id: self.id,
            kind: self.kind,
            center: self.position,
            radius: self.collider_radius,
        }
    }
}

/// Result entry of a spatial overlap query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub id: ObjectId,
    pub kind: ObstacleKind,
    pub center: Vec3,
    pub radius: f32,
}
