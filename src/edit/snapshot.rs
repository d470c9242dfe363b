//! Pre-edit record capture with a self-inverse restore.

use crate::selection::{GridCoord, GridRecord, SpatialSet};
use crate::surface::SurfaceRegistry;

/// The cells a gesture touched and their values on the other side of the
/// edit.
///
/// Filled with pre-edit records while the gesture runs. [`toggle`](Self::toggle)
/// swaps the stored records with the surface's current ones, so the same
/// call is both undo and redo.
#[derive(Clone, Debug, Default)]
pub struct UndoSnapshot {
    saved: SpatialSet,
}

impl UndoSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self { saved: SpatialSet::new() }
    }

    /// Create an empty snapshot whose record set uses `bucket_count` buckets
    pub fn with_bucket_count(bucket_count: usize) -> Self {
        Self { saved: SpatialSet::with_buckets(bucket_count) }
    }

    /// Store the pre-edit record for a cell. A cell already captured keeps
    /// its original value; returns `false` in that case.
    pub fn capture(&mut self, record: GridRecord) -> bool {
        self.saved.add(record)
    }

    /// Flag a captured cell as having its material changed.
    pub fn mark_material_changed(&mut self, coord: &GridCoord) -> bool {
        let Some(mut record) = self.saved.get(coord).copied() else {
            return false;
        };
        record.material_changed = true;
        self.saved.set_info(&record)
    }

    pub fn contains(&self, coord: &GridCoord) -> bool {
        self.saved.contains(coord)
    }

    /// Records held for the side of the edit not currently on the surface
    pub fn saved(&self) -> &SpatialSet {
        &self.saved
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Whether any touched cell had its material changed, so the surface
    /// needs a material refresh as well as a geometry one.
    pub fn material_changed(&self) -> bool {
        self.saved.iter().any(|r| r.material_changed)
    }

    /// Swap the surface and the stored records, cell by cell.
    ///
    /// Calling this twice leaves both the surface and the snapshot as they
    /// were. Returns [`material_changed`](Self::material_changed).
    pub fn toggle(&mut self, registry: &mut SurfaceRegistry) -> bool {
        let mut skipped = 0usize;
        for i in 0..self.saved.len() {
            let stored = self.saved[i];
            let Some(mut current) = registry.read_record(stored.coord) else {
                skipped += 1;
                continue;
            };
            current.weight = stored.weight;
            current.primary = stored.primary;
            current.material_changed = stored.material_changed;

            registry.write_record(&stored);
            self.saved.set_info(&current);
        }

        if skipped > 0 {
            log::warn!("Undo skipped {} cells on missing surfaces", skipped);
        }
        let material_changed = self.material_changed();
        log::debug!(
            "Toggled snapshot of {} cells (material changed: {})",
            self.saved.len(), material_changed
        );
        material_changed
    }

    /// Restore the pre-edit state. Same operation as [`redo`](Self::redo).
    pub fn undo(&mut self, registry: &mut SurfaceRegistry) -> bool {
        self.toggle(registry)
    }

    /// Restore the post-edit state. Same operation as [`undo`](Self::undo).
    pub fn redo(&mut self, registry: &mut SurfaceRegistry) -> bool {
        self.toggle(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IVec2, UVec2, Vec3};
    use crate::selection::SurfaceId;
    use crate::surface::{HeightField, SurfaceAdapter};

    fn setup() -> (SurfaceRegistry, SurfaceId) {
        let mut registry = SurfaceRegistry::new();
        let id = registry.register(HeightField::from_fn(
            UVec2::new(8, 8),
            1.0,
            Vec3::ZERO,
            |p| ((p.x + p.y) as f32, 1),
        ));
        (registry, id)
    }

    fn heights(registry: &SurfaceRegistry, id: SurfaceId) -> Vec<f32> {
        let surface = registry.get(id).unwrap();
        (0..8)
            .flat_map(|y| (0..8).map(move |x| IVec2::new(x, y)))
            .map(|p| surface.height_at(p))
            .collect()
    }

    #[test]
    fn test_capture_keeps_first_value() {
        let (registry, id) = setup();
        let coord = GridCoord { surface: id, pos: IVec2::new(2, 2) };
        let mut snapshot = UndoSnapshot::new();

        let first = registry.read_record(coord).unwrap();
        assert!(snapshot.capture(first));
        let mut later = first;
        later.height = 99.0;
        assert!(!snapshot.capture(later));
        assert_eq!(snapshot.saved().get(&coord).unwrap().height, 4.0);
    }

    #[test]
    fn test_toggle_is_symmetric() {
        let (mut registry, id) = setup();
        let s0 = heights(&registry, id);

        let a = GridCoord { surface: id, pos: IVec2::new(1, 1) };
        let b = GridCoord { surface: id, pos: IVec2::new(5, 2) };
        let mut snapshot = UndoSnapshot::new();
        for coord in [a, b] {
            let mut record = registry.read_record(coord).unwrap();
            snapshot.capture(record);
            record.height += 10.0;
            registry.write_record(&record);
        }
        let s1 = heights(&registry, id);
        assert_ne!(s0, s1);

        snapshot.undo(&mut registry);
        assert_eq!(heights(&registry, id), s0);
        snapshot.redo(&mut registry);
        assert_eq!(heights(&registry, id), s1);
        snapshot.toggle(&mut registry);
        assert_eq!(heights(&registry, id), s0);
    }

    #[test]
    fn test_material_flag_reported() {
        let (mut registry, id) = setup();
        let coord = GridCoord { surface: id, pos: IVec2::new(3, 3) };
        let mut snapshot = UndoSnapshot::new();

        let mut record = registry.read_record(coord).unwrap();
        snapshot.capture(record);
        assert!(!snapshot.material_changed());

        record.material = 7;
        registry.write_record(&record);
        assert!(snapshot.mark_material_changed(&coord));

        assert!(snapshot.toggle(&mut registry));
        assert_eq!(registry.get(id).unwrap().material_at(coord.pos), 1);
        // Flag survives the swap.
        assert!(snapshot.toggle(&mut registry));
        assert_eq!(registry.get(id).unwrap().material_at(coord.pos), 7);
    }

    #[test]
    fn test_mark_unknown_cell() {
        let mut snapshot = UndoSnapshot::new();
        let coord = GridCoord::new(SurfaceId(0), 0, 0);
        assert!(!snapshot.mark_material_changed(&coord));
    }

    #[test]
    fn test_toggle_skips_missing_surface() {
        let (mut registry, id) = setup();
        let mut snapshot = UndoSnapshot::new();
        snapshot.capture(GridRecord::new(GridCoord::new(SurfaceId(9), 0, 0), 3.0, 0));
        let before = heights(&registry, id);
        assert!(!snapshot.toggle(&mut registry));
        assert_eq!(heights(&registry, id), before);
        assert_eq!(snapshot.len(), 1);
    }
}
