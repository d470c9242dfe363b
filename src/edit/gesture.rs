//! Pointer-down to pointer-up edit gestures and their stamp cadence.
//!
//! While the pointer is held, the active action is re-stamped on a fixed
//! interval instead of once per frame. A [`StampTimer`] carries the
//! [`GestureToken`] it was scheduled under and expires as soon as the
//! [`GestureClock`] moves past that gesture.

use std::time::{Duration, Instant};

use crate::brush::Brush;
use crate::selection::{GridCoord, GridRecord};
use crate::surface::SurfaceRegistry;
use super::snapshot::UndoSnapshot;

/// Default interval between stamps while the pointer is held.
pub const DEFAULT_STAMP_INTERVAL: Duration = Duration::from_millis(30);

/// Sequence number identifying one gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GestureToken(u64);

impl GestureToken {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Monotonic gesture counter; one gesture is live at a time.
#[derive(Debug, Default)]
pub struct GestureClock {
    sequence: u64,
    active: bool,
}

impl GestureClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture. Any earlier gesture's token goes stale.
    pub fn begin(&mut self) -> GestureToken {
        self.sequence += 1;
        self.active = true;
        GestureToken(self.sequence)
    }

    /// End the live gesture. Outstanding timers expire on their next poll.
    pub fn end(&mut self) {
        self.sequence += 1;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether `token` belongs to the gesture still in progress
    pub fn is_current(&self, token: GestureToken) -> bool {
        self.active && token.0 == self.sequence
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Outcome of polling a [`StampTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPoll {
    /// Due: stamp now. The timer has rescheduled itself.
    Fire,
    /// Not yet due; try again after this long
    Wait(Duration),
    /// The gesture it belonged to is over; drop the timer
    Expired,
}

/// Self-rescheduling stamp tick bound to one gesture.
#[derive(Debug, Clone)]
pub struct StampTimer {
    token: GestureToken,
    interval: Duration,
    next_due: Instant,
}

impl StampTimer {
    /// Schedule the first tick one `interval` after `now`.
    pub fn schedule(token: GestureToken, interval: Duration, now: Instant) -> Self {
        Self { token, interval, next_due: now + interval }
    }

    pub fn token(&self) -> GestureToken {
        self.token
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn poll(&mut self, clock: &GestureClock, now: Instant) -> TimerPoll {
        if !clock.is_current(self.token) {
            return TimerPoll::Expired;
        }
        if now < self.next_due {
            return TimerPoll::Wait(self.next_due - now);
        }
        // Late ticks are not replayed; the next one is a full interval out.
        self.next_due = now + self.interval;
        TimerPoll::Fire
    }
}

/// Edits made during one gesture, with the undo snapshot they build.
#[derive(Debug)]
pub struct EditGesture {
    token: GestureToken,
    snapshot: UndoSnapshot,
    stamps: u32,
}

impl EditGesture {
    /// Begin a gesture on `clock`
    pub fn begin(clock: &mut GestureClock) -> Self {
        Self::with_snapshot(clock, UndoSnapshot::new())
    }

    /// Begin a gesture that records into a caller-provided empty snapshot
    pub fn with_snapshot(clock: &mut GestureClock, snapshot: UndoSnapshot) -> Self {
        let token = clock.begin();
        log::trace!("Gesture {} started", token.0);
        Self { token, snapshot, stamps: 0 }
    }

    pub fn token(&self) -> GestureToken {
        self.token
    }

    pub fn snapshot(&self) -> &UndoSnapshot {
        &self.snapshot
    }

    /// Number of stamps applied so far
    pub fn stamps(&self) -> u32 {
        self.stamps
    }

    /// Read a cell's current record, capturing it for undo on first touch.
    pub fn touch(&mut self, registry: &SurfaceRegistry, coord: GridCoord) -> Option<GridRecord> {
        let current = registry.read_record(coord)?;
        self.snapshot.capture(current);
        Some(current)
    }

    /// Write an edited record to its surface, capturing the pre-edit value
    /// first. Returns `false` if the cell does not exist.
    pub fn apply(&mut self, registry: &mut SurfaceRegistry, record: &GridRecord) -> bool {
        let Some(before) = self.touch(registry, record.coord) else {
            return false;
        };
        if before.material != record.material {
            self.snapshot.mark_material_changed(&record.coord);
        }
        registry.write_record(record)
    }

    /// Run `action` over every cell under the brush and write the results.
    ///
    /// The action sees the cell's current surface values with the brush's
    /// weight and primary flag. Returns how many cells were written.
    pub fn stamp<F>(&mut self, brush: &Brush, registry: &mut SurfaceRegistry, mut action: F) -> usize
    where
        F: FnMut(&mut GridRecord),
    {
        let mut written = 0;
        for cell in brush.cells() {
            let Some(mut record) = registry.read_record(cell.coord) else {
                continue;
            };
            record.weight = cell.weight;
            record.primary = cell.primary;
            action(&mut record);
            if self.apply(registry, &record) {
                written += 1;
            }
        }
        self.stamps += 1;
        log::trace!("Gesture {} stamp {}: {} cells", self.token.0, self.stamps, written);
        written
    }

    /// End the gesture. Returns the snapshot, or `None` if nothing was
    /// touched.
    pub fn finish(self, clock: &mut GestureClock) -> Option<UndoSnapshot> {
        if clock.is_current(self.token) {
            clock.end();
        }
        if self.snapshot.is_empty() {
            log::debug!("Gesture {} touched nothing; no undo entry", self.token.0);
            return None;
        }
        Some(self.snapshot)
    }
}
