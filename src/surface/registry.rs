//! Registry of editable surfaces and cross-surface record lookup.

use crate::core::error::Error;
use crate::core::types::{IVec2, Result, Vec2, Vec3};
use crate::selection::{GridCoord, GridRecord, SurfaceId};
use super::adapter::SurfaceAdapter;

/// Height window used to aggregate overlapping surfaces, in world units.
pub const DEFAULT_CROSS_SURFACE_TOLERANCE: f32 = 4.0;

/// Owns every active surface and hands out [`SurfaceId`]s for them.
pub struct SurfaceRegistry {
    surfaces: Vec<Box<dyn SurfaceAdapter>>,
    tolerance: f32,
}

impl SurfaceRegistry {
    /// Create an empty registry with the default cross-surface tolerance
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_CROSS_SURFACE_TOLERANCE)
    }

    /// Create an empty registry with a specific cross-surface tolerance
    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            surfaces: Vec::new(),
            tolerance: tolerance.max(0.0),
        }
    }

    /// Maximum world height difference for a secondary surface to join a hit.
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = tolerance.max(0.0);
    }

    /// Add a surface and return its handle
    pub fn register(&mut self, surface: impl SurfaceAdapter + 'static) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(Box::new(surface));
        log::debug!("Registered surface {:?} ({} total)", id, self.surfaces.len());
        id
    }

    pub fn get(&self, id: SurfaceId) -> Option<&dyn SurfaceAdapter> {
        self.surfaces.get(id.0 as usize).map(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut (dyn SurfaceAdapter + 'static)> {
        self.surfaces.get_mut(id.0 as usize).map(|s| s.as_mut())
    }

    /// Like [`get`](Self::get), but an unknown handle is an error.
    pub fn surface(&self, id: SurfaceId) -> Result<&dyn SurfaceAdapter> {
        self.get(id).ok_or(Error::UnknownSurface(id))
    }

    /// Handles of all registered surfaces, in registration order
    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        (0..self.surfaces.len() as u32).map(SurfaceId)
    }

    /// Number of registered surfaces
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// First surface whose ground footprint contains `pos`.
    pub fn surface_under_world_point(&self, pos: Vec3) -> Option<SurfaceId> {
        self.ids().find(|&id| {
            self.get(id)
                .is_some_and(|s| s.world_bounds().contains_xz(Vec2::new(pos.x, pos.z)))
        })
    }

    /// Current state of a cell as a fresh, fully weighted record.
    pub fn read_record(&self, coord: GridCoord) -> Option<GridRecord> {
        let surface = self.get(coord.surface)?;
        surface.contains(coord.pos).then(|| {
            GridRecord::new(coord, surface.height_at(coord.pos), surface.material_at(coord.pos))
        })
    }

    /// Write a record's height and material back to its surface.
    /// Returns `false` if the cell does not exist.
    pub fn write_record(&mut self, record: &GridRecord) -> bool {
        let Some(surface) = self.get_mut(record.coord.surface) else {
            return false;
        };
        if !surface.contains(record.coord.pos) {
            return false;
        }
        surface.set_height_at(record.coord.pos, record.height);
        surface.set_material_at(record.coord.pos, record.material);
        true
    }

    /// Records under grid cell `pos` of `primary`, plus any overlapping
    /// surfaces whose world height there lies within the tolerance.
    ///
    /// Returns nothing if `primary` has no such cell. The primary record
    /// comes first and is flagged with `primary`.
    pub fn records_at(&self, primary: SurfaceId, pos: IVec2) -> Vec<GridRecord> {
        let mut out = Vec::new();
        let Some(surface) = self.get(primary) else {
            return out;
        };
        let Some(record) = self.read_record(GridCoord { surface: primary, pos }) else {
            return out;
        };
        out.push(record.with_primary(true));

        let hit = surface.grid_to_world(pos);
        for id in self.ids().filter(|&id| id != primary) {
            let Some(other) = self.get(id) else { continue };
            let Some(other_pos) = other.world_to_grid(hit) else { continue };
            let other_height = other.grid_to_world(other_pos).y;
            if (other_height - hit.y).abs() > self.tolerance {
                continue;
            }
            if let Some(record) = self.read_record(GridCoord { surface: id, pos: other_pos }) {
                out.push(record);
            }
        }
        out
    }

    /// [`records_at`](Self::records_at) for a world-space hit on `primary`.
    pub fn records_at_world(&self, primary: SurfaceId, hit: Vec3) -> Vec<GridRecord> {
        self.get(primary)
            .and_then(|s| s.world_to_grid(hit))
            .map(|pos| self.records_at(primary, pos))
            .unwrap_or_default()
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
