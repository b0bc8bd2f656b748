// crates/lingloop-engine/src/lib.rs
//
// The stateful engine layer: one StudySession owns the lingloop-core state
// bundle plus boxed collaborator interfaces (media clock, delay scheduler,
// region view, persistence sink) and implements the playback synchronizer,
// the timeline editor, and the region bridge on top of it.
//
// Single-threaded by construction — the host event loop invokes clock ticks
// and edit commands serially. The only cross-thread touchpoint is the
// optional channel-backed persistence sink, which is fire-and-forget.

pub mod bridge;
pub mod clock;
pub mod editor;
pub mod import;
pub mod persist;
pub mod session;
pub mod sync;

#[cfg(test)]
pub(crate) mod testutil;

pub use bridge::{Region, RegionView};
pub use clock::{DelayScheduler, DelayToken, MediaClock};
pub use editor::ManualTimer;
pub use persist::{ChannelPersist, NullPersist, PersistSink};
pub use session::StudySession;
