//! Gesture-scoped edits with snapshot-based undo/redo.
//!
//! An [`EditGesture`] captures each cell's pre-edit record the first time
//! it is touched. The finished [`UndoSnapshot`] goes on an [`UndoStack`],
//! where undo and redo are the same swap.

pub mod snapshot;
pub mod gesture;
pub mod history;

pub use snapshot::UndoSnapshot;
pub use gesture::{EditGesture, GestureClock, GestureToken, StampTimer, TimerPoll, DEFAULT_STAMP_INTERVAL};
pub use history::{UndoStack, DEFAULT_UNDO_LIMIT};
