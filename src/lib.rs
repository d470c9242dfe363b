//! Gridbrush - brush selection, falloff and undo for grid-based terrain editing
//!
//! Surfaces are registered with a [`surface::SurfaceRegistry`]. A
//! [`brush::Brush`] rasterizes a footprint over one of them (plus any
//! overlapping surface within tolerance) into a weighted
//! [`selection::SpatialSet`]. Edits run inside an [`edit::EditGesture`],
//! which records a self-inverse [`edit::UndoSnapshot`].

pub mod core;
pub mod math;
pub mod selection;
pub mod surface;
pub mod brush;
pub mod edit;
pub mod config;
