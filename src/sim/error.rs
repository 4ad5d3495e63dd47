//! Error types for the simulation core

use thiserror::Error;

/// Errors surfaced by engine construction and config parsing.
///
/// Control operations (`start`, `jump`, ...) never fail; they ignore calls
/// made in the wrong state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Drawing surface has no usable 2D context")]
    NoDrawingContext,

    #[error("Invalid engine config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
