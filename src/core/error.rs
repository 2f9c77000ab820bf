//! Error types for cave generation

use thiserror::Error;

/// Main error type for the generator
#[derive(Debug, Error)]
pub enum Error {
    #[error("spawner '{spawner}' has an empty {set} object set")]
    EmptyObjectSet { spawner: String, set: &'static str },

    #[error("spawner '{spawner}' has invalid {what} radius {value}")]
    InvalidRadius {
        spawner: String,
        what: &'static str,
        value: f32,
    },

    #[error("spawner '{spawner}' has no {what} candidates")]
    InvalidCount { spawner: String, what: &'static str },

    #[error("invalid heightmap resolution: expected {expected}, got {actual}")]
    InvalidResolution { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("collaborator error: {0}")]
    Collaborator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
