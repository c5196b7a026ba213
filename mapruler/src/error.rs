//! Error types used by the crate.

use thiserror::Error;

use crate::engine::MarkerId;

/// Errors reported by a [`MapEngine`](crate::engine::MapEngine) implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A source with this id is already added to the map.
    #[error("source '{0}' already exists")]
    SourceExists(String),
    /// There is no source with this id in the current style.
    #[error("source '{0}' not found")]
    SourceNotFound(String),
    /// A layer with this id is already added to the map.
    #[error("layer '{0}' already exists")]
    LayerExists(String),
    /// Source cannot be removed while layers still use it.
    #[error("source '{0}' is used by a layer")]
    SourceInUse(String),
    /// There is no layer with this id in the current style.
    #[error("layer '{0}' not found")]
    LayerNotFound(String),
    /// Marker was removed or never existed.
    #[error("marker {0:?} not found")]
    MarkerNotFound(MarkerId),
}

/// Mapruler error type.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
