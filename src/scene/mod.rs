//! Scene collaborators: spatial queries and object instantiation

pub mod object;
pub mod index;

pub use object::{Collider, ObjectId, ObstacleKind, PlacedObject, Prefab};
pub use index::ObjectScene;

use crate::core::types::{Quat, Result, Vec3};

/// Read access to already-placed colliders.
///
/// An object instantiated through [`ObjectFactory`] must be visible to the
/// very next query.
pub trait SpatialIndex {
    /// Every collider whose sphere intersects the query sphere
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Collider>;

    /// Every collider whose planar footprint intersects the circle of
    /// `radius` around `center`, at any height
    fn overlap_column(&self, center: Vec3, radius: f32) -> Vec<Collider>;
}

/// Host hook that turns placement decisions into scene objects
pub trait ObjectFactory {
    fn instantiate(
        &mut self,
        prefab: &Prefab,
        position: Vec3,
        rotation: Quat,
        kind: ObstacleKind,
    ) -> Result<PlacedObject>;
}

/// A scene that can both be queried and populated
pub trait Scene: SpatialIndex + ObjectFactory {}

impl<T: SpatialIndex + ObjectFactory> Scene for T {}
