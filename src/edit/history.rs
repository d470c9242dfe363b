//! Bounded undo/redo history of gesture snapshots.

use crate::surface::SurfaceRegistry;
use super::snapshot::UndoSnapshot;

/// Default number of undo entries kept.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Snapshots in gesture order with a cursor between the undone and
/// redoable ones.
///
/// Undo and redo both toggle a snapshot; they differ only in which side of
/// the cursor they take it from.
#[derive(Debug)]
pub struct UndoStack {
    entries: Vec<UndoSnapshot>,
    /// Entries before the cursor can be undone, entries from it on redone
    cursor: usize,
    max_entries: usize,
}

impl UndoStack {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Submit a finished gesture. Empty snapshots are rejected and return
    /// `false`. Discards anything that could have been redone.
    pub fn push(&mut self, snapshot: UndoSnapshot) -> bool {
        if snapshot.is_empty() {
            log::warn!("Rejected empty undo snapshot");
            return false;
        }
        self.entries.truncate(self.cursor);
        self.entries.push(snapshot);
        // Trim oldest entries if over capacity
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len();
        true
    }

    /// Revert the most recent gesture.
    /// Returns whether materials changed, or `None` if nothing to undo.
    pub fn undo(&mut self, registry: &mut SurfaceRegistry) -> Option<bool> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].toggle(registry))
    }

    /// Re-apply the most recently undone gesture.
    /// Returns whether materials changed, or `None` if nothing to redo.
    pub fn redo(&mut self, registry: &mut SurfaceRegistry) -> Option<bool> {
        let snapshot = self.entries.get_mut(self.cursor)?;
        let material_changed = snapshot.toggle(registry);
        self.cursor += 1;
        Some(material_changed)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IVec2, UVec2, Vec3};
    use crate::selection::{GridCoord, SurfaceId};
    use crate::surface::{HeightField, SurfaceAdapter};

    fn setup() -> (SurfaceRegistry, SurfaceId) {
        let mut registry = SurfaceRegistry::new();
        let id = registry.register(HeightField::new(UVec2::new(4, 4), 1.0, Vec3::ZERO));
        (registry, id)
    }

    /// Set one cell to `height`, returning the snapshot of the edit.
    fn edit(registry: &mut SurfaceRegistry, id: SurfaceId, height: f32) -> UndoSnapshot {
        let coord = GridCoord { surface: id, pos: IVec2::new(1, 2) };
        let mut record = registry.read_record(coord).unwrap();
        let mut snapshot = UndoSnapshot::new();
        snapshot.capture(record);
        record.height = height;
        registry.write_record(&record);
        snapshot
    }

    fn height(registry: &SurfaceRegistry, id: SurfaceId) -> f32 {
        registry.get(id).unwrap().height_at(IVec2::new(1, 2))
    }

    #[test]
    fn test_new_stack_empty() {
        let stack = UndoStack::new(10);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_count(), 0);
        assert_eq!(stack.redo_count(), 0);
    }

    #[test]
    fn test_rejects_empty_snapshot() {
        let mut stack = UndoStack::new(10);
        assert!(!stack.push(UndoSnapshot::new()));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_undo_redo_cycle() {
        let (mut registry, id) = setup();
        let mut stack = UndoStack::new(10);

        let snapshot = edit(&mut registry, id, 1.0);
        stack.push(snapshot);
        let snapshot = edit(&mut registry, id, 2.0);
        stack.push(snapshot);
        assert_eq!(height(&registry, id), 2.0);

        assert_eq!(stack.undo(&mut registry), Some(false));
        assert_eq!(height(&registry, id), 1.0);
        assert_eq!(stack.undo(&mut registry), Some(false));
        assert_eq!(height(&registry, id), 0.0);
        assert_eq!(stack.undo(&mut registry), None);

        assert_eq!(stack.redo(&mut registry), Some(false));
        assert_eq!(height(&registry, id), 1.0);
        assert_eq!(stack.redo(&mut registry), Some(false));
        assert_eq!(height(&registry, id), 2.0);
        assert_eq!(stack.redo(&mut registry), None);
    }

    #[test]
    fn test_new_push_clears_redo() {
        let (mut registry, id) = setup();
        let mut stack = UndoStack::new(10);

        let snapshot = edit(&mut registry, id, 1.0);
        stack.push(snapshot);
        stack.undo(&mut registry);
        assert!(stack.can_redo());

        let snapshot = edit(&mut registry, id, 3.0);
        stack.push(snapshot);
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_count(), 1);
    }

    #[test]
    fn test_max_entries_trim() {
        let (mut registry, id) = setup();
        let mut stack = UndoStack::new(3);
        for i in 0..5 {
            let snapshot = edit(&mut registry, id, i as f32 + 1.0);
            stack.push(snapshot);
        }
        assert_eq!(stack.undo_count(), 3);

        while stack.undo(&mut registry).is_some() {}
        // Oldest two edits were dropped: we can only get back to height 2.
        assert_eq!(height(&registry, id), 2.0);
    }

    #[test]
    fn test_clear() {
        let (mut registry, id) = setup();
        let mut stack = UndoStack::default();
        let snapshot = edit(&mut registry, id, 1.0);
        stack.push(snapshot);
        stack.clear();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }
}
