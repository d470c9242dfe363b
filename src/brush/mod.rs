//! Brushes that rasterize weighted footprints onto surface grids.
//!
//! A [`Brush`] owns a [`SpatialSet`](crate::selection::SpatialSet) of the
//! cells under it and rebuilds it whenever it moves or changes shape.

pub mod filter;
pub mod geometry;
pub mod shape;
pub mod raster;

// Re-exports
pub use filter::{Filter, DEFAULT_FILTER};
pub use geometry::{BrushGeometry, BrushVertex};
pub use shape::BrushShape;
pub use raster::{Brush, DEFAULT_MAX_BRUSH_SIZE, FACTOR_RANGE, MAX_BRUSH_SIZE};
