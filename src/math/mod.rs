//! Mathematical utilities

pub mod bounds;
pub mod rotation;

pub use bounds::{planar_distance_sq, PlanarBounds};
pub use rotation::{euler_degrees, look_rotation, yaw_rotation};
