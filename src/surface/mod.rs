//! Editable surfaces: the adapter interface, an in-memory grid, and the
//! registry brushes and undo snapshots resolve [`SurfaceId`](crate::selection::SurfaceId)s through.

pub mod adapter;
pub mod heightfield;
pub mod registry;

pub use adapter::SurfaceAdapter;
pub use heightfield::HeightField;
pub use registry::{SurfaceRegistry, DEFAULT_CROSS_SURFACE_TOLERANCE};
