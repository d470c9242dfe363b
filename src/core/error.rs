//! Error types for the grid editing core

use thiserror::Error;

use crate::selection::SurfaceId;

/// Main error type for the crate.
///
/// Lookups of absent cells never produce an `Error`; they report through
/// `bool` or `Option`. This type covers configuration and surface wiring.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown surface: {0:?}")]
    UnknownSurface(SurfaceId),
}
