// crates/lingloop-core/src/history.rs
//
// Bounded snapshot stack with undo/redo. Snapshots are deep copies — no
// shared mutable structure may cross the boundary between the live state and
// the stack, so installing a snapshot can never alias the data it replaces.
//
// Two independent instances exist per session: one over the subtitle
// timeline, one over the playlist ordering. Undo/redo commands are routed to
// whichever is logically focused at invocation time (see SessionState).
//
// Semantics:
//   - seeded with the initial state on load;
//   - `commit` records the *post-edit* state, truncating any redo branch;
//   - over capacity, the oldest snapshot is evicted — the most recent
//     `capacity` states are kept and the cursor does not net-advance;
//   - `undo`/`redo` at either end are silent no-ops (None), never errors.

/// Default snapshot capacity per stack.
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
pub struct HistoryStack<T: Clone> {
    snapshots: Vec<T>,
    /// Index of the snapshot matching the live state.
    cursor:    usize,
    capacity:  usize,
}

impl<T: Clone> HistoryStack<T> {
    /// Stack seeded with the initial state, at the default capacity.
    pub fn new(seed: T) -> Self {
        Self::with_capacity(seed, HISTORY_CAPACITY)
    }

    pub fn with_capacity(seed: T, capacity: usize) -> Self {
        assert!(capacity >= 2, "history needs room for a seed and one edit");
        Self {
            snapshots: vec![seed],
            cursor:    0,
            capacity,
        }
    }

    /// Record the state after a committed edit. Any snapshots beyond the
    /// cursor (the undone future branch) are discarded first, so a commit
    /// after `undo` makes `redo` a no-op.
    pub fn commit(&mut self, state: &T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state.clone());
        self.cursor += 1;
        if self.snapshots.len() > self.capacity {
            // Evict the oldest retained state. The shift cancels the advance
            // above — the cursor keeps pointing at the newest snapshot.
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one snapshot and return a copy for the caller to install as
    /// the live state. `None` at the oldest retained state.
    pub fn undo(&mut self) -> Option<T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward one snapshot. `None` when there is no undone future.
    pub fn redo(&mut self) -> Option<T> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// How many `undo` steps are available.
    pub fn undo_len(&self) -> usize {
        self.cursor
    }

    /// How many `redo` steps are available.
    pub fn redo_len(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Drop all history and reseed — used when a new media file is loaded.
    pub fn reset(&mut self, seed: T) {
        self.snapshots.clear();
        self.snapshots.push(seed);
        self.cursor = 0;
    }
}
