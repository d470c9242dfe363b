//! Per-cell edit records and their coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::IVec2;

/// Handle to a surface registered with a [`SurfaceRegistry`](crate::surface::SurfaceRegistry).
///
/// The handle does not own the surface; the registry outlives every brush
/// and snapshot holding one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// Integer cell position on a specific surface.
///
/// Two coordinates with equal `pos` on different surfaces are distinct cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub surface: SurfaceId,
    pub pos: IVec2,
}

impl GridCoord {
    /// Create a new grid coordinate
    pub fn new(surface: SurfaceId, x: i32, y: i32) -> Self {
        Self { surface, pos: IVec2::new(x, y) }
    }

    /// Same position offset by `delta`, on the same surface.
    pub fn offset(self, delta: IVec2) -> Self {
        Self { surface: self.surface, pos: self.pos + delta }
    }
}

/// One cell's edit state.
///
/// `weight` is a selection strength. It is not clamped: renderers treat
/// values above 1 as fully selected and below 0 as unselected.
///
/// The `next`/`prev` links belong to the owning [`SpatialSet`](super::SpatialSet)
/// bucket chain and are not part of the record's value; equality ignores them.
#[derive(Clone, Copy)]
pub struct GridRecord {
    pub coord: GridCoord,
    pub material: u8,
    pub height: f32,
    pub weight: f32,
    /// Hit on the brush's bound surface rather than an overlapping one.
    pub primary: bool,
    /// Set by paint edits so the surface refresh can rebuild materials.
    pub material_changed: bool,
    pub(super) next: Option<usize>,
    pub(super) prev: Option<usize>,
}

impl GridRecord {
    /// Fresh record for a cell, fully weighted and unflagged.
    pub fn new(coord: GridCoord, height: f32, material: u8) -> Self {
        Self {
            coord,
            material,
            height,
            weight: 1.0,
            primary: false,
            material_changed: false,
            next: None,
            prev: None,
        }
    }

    /// Surface this record lives on.
    pub fn surface(&self) -> SurfaceId {
        self.coord.surface
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    /// Copy the payload of `other`, keeping this record's chain links.
    pub(super) fn assign_payload(&mut self, other: &GridRecord) {
        self.coord = other.coord;
        self.material = other.material;
        self.height = other.height;
        self.weight = other.weight;
        self.primary = other.primary;
        self.material_changed = other.material_changed;
    }

    pub(super) fn unlinked(mut self) -> Self {
        self.next = None;
        self.prev = None;
        self
    }
}

impl PartialEq for GridRecord {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
            && self.material == other.material
            && self.height == other.height
            && self.weight == other.weight
            && self.primary == other.primary
            && self.material_changed == other.material_changed
    }
}

impl fmt::Debug for GridRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridRecord")
            .field("coord", &self.coord)
            .field("material", &self.material)
            .field("height", &self.height)
            .field("weight", &self.weight)
            .field("primary", &self.primary)
            .field("material_changed", &self.material_changed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_on_different_surfaces_differ() {
        let a = GridCoord::new(SurfaceId(0), 3, 4);
        let b = GridCoord::new(SurfaceId(1), 3, 4);
        assert_ne!(a, b);
        assert_eq!(a, GridCoord::new(SurfaceId(0), 3, 4));
    }

    #[test]
    fn test_equality_ignores_links() {
        let coord = GridCoord::new(SurfaceId(0), 1, 1);
        let a = GridRecord::new(coord, 2.0, 5);
        let mut b = a;
        b.next = Some(7);
        b.prev = Some(3);
        assert_eq!(a, b);
        b.weight = 0.5;
        assert_ne!(a, b);
    }

    #[test]
    fn test_offset_keeps_surface() {
        let c = GridCoord::new(SurfaceId(2), 10, -4).offset(IVec2::new(-3, 5));
        assert_eq!(c, GridCoord::new(SurfaceId(2), 7, 1));
    }
}
