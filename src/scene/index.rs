//! Reference scene: placed objects plus a bucketed spatial lookup

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::types::{Quat, Result, Vec3};
use crate::math::planar_distance_sq;

use super::object::{Collider, ObjectId, ObstacleKind, PlacedObject, Prefab};
use super::{ObjectFactory, SpatialIndex};

/// Default bucket edge length in world units
pub const DEFAULT_CELL_SIZE: f32 = 8.0;

/// In-memory scene used when no host engine is attached.
///
/// Objects are kept in instantiation order; a uniform XZ bucket grid
/// accelerates overlap queries.
#[derive(Debug)]
pub struct ObjectScene {
    objects: Vec<PlacedObject>,
    buckets: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f32,
    max_collider_radius: f32,
}

impl Default for ObjectScene {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl ObjectScene {
    pub fn new(cell_size: f32) -> Self {
        Self {
            objects: Vec::new(),
            buckets: HashMap::new(),
            cell_size: cell_size.max(0.01),
            max_collider_radius: 0.0,
        }
    }

    /// All placed objects in instantiation order
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn into_objects(self) -> Vec<PlacedObject> {
        self.objects
    }

    #[inline]
    fn cell_of(&self, x: f32, z: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }
}

impl ObjectScene {
    /// Indices of objects passing `hit`, searched over buckets within
    /// planar reach of `center`, in instantiation order
    fn query(&self, center: Vec3, radius: f32, hit: impl Fn(&PlacedObject, f32) -> bool) -> Vec<Collider> {
        let reach = radius.max(0.0) + self.max_collider_radius;
        let (min_x, min_z) = self.cell_of(center.x - reach, center.z - reach);
        let (max_x, max_z) = self.cell_of(center.x + reach, center.z + reach);

        let mut hits = Vec::new();
        for cz in min_z..=max_z {
            for cx in min_x..=max_x {
                let Some(bucket) = self.buckets.get(&(cx, cz)) else { continue };
                for &idx in bucket {
                    let obj = &self.objects[idx];
                    let limit = radius + obj.collider_radius;
                    if hit(obj, limit * limit) {
                        hits.push(idx);
                    }
                }
            }
        }

        hits.sort_unstable();
        hits.into_iter().map(|idx| self.objects[idx].collider()).collect()
    }
}

impl SpatialIndex for ObjectScene {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Collider> {
        self.query(center, radius, |obj, limit_sq| {
            obj.position.distance_squared(center) <= limit_sq
        })
    }

    fn overlap_column(&self, center: Vec3, radius: f32) -> Vec<Collider> {
        self.query(center, radius, |obj, limit_sq| {
            planar_distance_sq(obj.position, center) <= limit_sq
        })
    }
}

impl ObjectFactory for ObjectScene {
    fn instantiate(
        &mut self,
        prefab: &Prefab,
        position: Vec3,
        rotation: Quat,
        kind: ObstacleKind,
    ) -> Result<PlacedObject> {
        if !position.is_finite() {
            return Err(Error::Collaborator(format!(
                "refusing to place '{}' at non-finite position {}",
                prefab.name, position
            )));
        }

        let idx = self.objects.len();
        let object = PlacedObject {
            id: ObjectId(idx as u32),
            prefab: prefab.name.clone(),
            kind,
            position,
            rotation,
            collider_radius: prefab.collider_radius.max(0.0),
        };

        let cell = self.cell_of(position.x, position.z);
        self.buckets.entry(cell).or_default().push(idx);
        self.max_collider_radius = self.max_collider_radius.max(object.collider_radius);
        self.objects.push(object.clone());
        Ok(object)
    }
}
