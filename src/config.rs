//! Editor configuration loaded from JSON.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::brush::{Brush, BrushShape, Filter, DEFAULT_FILTER, DEFAULT_MAX_BRUSH_SIZE};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::edit::{UndoStack, DEFAULT_STAMP_INTERVAL, DEFAULT_UNDO_LIMIT};
use crate::selection::DEFAULT_BUCKET_COUNT;
use crate::surface::{SurfaceRegistry, DEFAULT_CROSS_SURFACE_TOLERANCE};

/// Initial brush parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub shape: BrushShape,
    /// Footprint in cells, `[width, height]`
    pub size: [i32; 2],
    /// Weight multiplier (clamped to 0.01-1.0)
    pub pressure: f32,
    /// Blend toward the falloff curve (clamped to 0.01-1.0)
    pub softness: f32,
    /// Falloff breakpoints from brush centre to edge
    pub filter: Vec<f32>,
    /// Largest allowed brush dimension, clamped to `MAX_BRUSH_SIZE`
    pub max_size: i32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            shape: BrushShape::Box,
            size: [1, 1],
            pressure: 1.0,
            softness: 1.0,
            filter: DEFAULT_FILTER.to_vec(),
            max_size: DEFAULT_MAX_BRUSH_SIZE,
        }
    }
}

/// Top-level editor configuration. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub brush: BrushConfig,
    /// World height window for editing overlapping surfaces together
    pub cross_surface_tolerance: f32,
    /// Milliseconds between stamps while the pointer is held
    pub stamp_interval_ms: u64,
    /// Hash buckets per selection set
    pub bucket_count: usize,
    /// Undo entries kept
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush: BrushConfig::default(),
            cross_surface_tolerance: DEFAULT_CROSS_SURFACE_TOLERANCE,
            stamp_interval_ms: DEFAULT_STAMP_INTERVAL.as_millis() as u64,
            bucket_count: DEFAULT_BUCKET_COUNT,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Reject values no clamping can make sense of.
    pub fn validate(&self) -> Result<()> {
        if self.brush.filter.is_empty() {
            return Err(Error::InvalidConfig("brush.filter needs at least one breakpoint".into()));
        }
        if self.bucket_count == 0 {
            return Err(Error::InvalidConfig("bucket_count must be positive".into()));
        }
        if self.stamp_interval_ms == 0 {
            return Err(Error::InvalidConfig("stamp_interval_ms must be positive".into()));
        }
        if !(self.cross_surface_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "cross_surface_tolerance must be non-negative, got {}",
                self.cross_surface_tolerance
            )));
        }
        Ok(())
    }

    pub fn stamp_interval(&self) -> Duration {
        Duration::from_millis(self.stamp_interval_ms)
    }

    /// Empty surface registry using the configured tolerance
    pub fn registry(&self) -> SurfaceRegistry {
        SurfaceRegistry::with_tolerance(self.cross_surface_tolerance)
    }

    /// Unbound brush with the configured parameters.
    ///
    /// Out-of-range pressure, softness and size are clamped the same way
    /// the brush setters clamp them. Bind it with
    /// [`Brush::set_surface`] or [`Brush::set_world_position`].
    pub fn brush(&self) -> Brush {
        let registry = SurfaceRegistry::new();
        let b = &self.brush;
        let mut brush = Brush::new(b.shape)
            .with_bucket_count(self.bucket_count)
            .with_max_size(b.max_size);
        // Unbound, so these rebuilds stay empty.
        brush.set_filter(Filter::new(b.filter.clone()), &registry);
        brush.set_pressure(b.pressure, &registry);
        brush.set_softness(b.softness, &registry);
        brush.set_size(b.size[0], b.size[1], &registry);
        brush
    }

    pub fn undo_stack(&self) -> UndoStack {
        UndoStack::new(self.undo_limit)
    }
}
