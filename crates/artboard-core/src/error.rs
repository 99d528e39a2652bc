//! Error types for scene construction and editor setup.

use thiserror::Error;

/// Errors raised while building a scene from element records.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Unsupported element type: {0}")]
    UnsupportedElementType(String),
    #[error("Element record has no type tag")]
    MissingType,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by the editor controller.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The host could not provide a drawing surface; the editor cannot start.
    #[error("Drawing surface is unavailable")]
    SurfaceUnavailable,
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
