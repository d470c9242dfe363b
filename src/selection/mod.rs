//! Sparse selection of grid cells.
//!
//! A [`SpatialSet`] holds at most one [`GridRecord`] per [`GridCoord`]. Brushes
//! fill one from scratch on every move; undo snapshots keep one of pre-edit
//! records.

pub mod record;
pub mod set;

pub use record::{GridCoord, GridRecord, SurfaceId};
pub use set::{ChainError, SpatialSet, DEFAULT_BUCKET_COUNT};
