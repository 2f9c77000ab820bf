//! Cavern - procedural two-layer cave generation

pub mod core;
pub mod math;
pub mod terrain;
pub mod scene;
pub mod generation;
