// crates/lingloop-engine/src/persist.rs
//
// Fire-and-forget persistence notification.
//
// After every committed mutation the session hands the full timeline to the
// persistence collaborator. Failures are logged by the session and never
// block in-memory state — the live timeline is the source of truth for the
// whole session.

use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use lingloop_core::state::Segment;

/// Persistence collaborator. Receives the full timeline after each committed
/// mutation; may also be asked by the host to load an initial timeline at
/// session start (that path goes through `import`, not this trait).
pub trait PersistSink {
    fn save_timeline(&mut self, timeline: &[Segment]) -> Result<()>;
}

/// Discards everything. For hosts that persist some other way, and for tests
/// that don't care about the persistence path.
pub struct NullPersist;

impl PersistSink for NullPersist {
    fn save_timeline(&mut self, _timeline: &[Segment]) -> Result<()> {
        Ok(())
    }
}

/// Channel-backed sink: serializes the timeline to the subtitle JSON wire
/// shape and hands it to a receiver the host drains on its own schedule
/// (typically a writer thread or an HTTP uploader).
///
/// `try_send` on a bounded channel keeps the engine non-blocking: a full
/// queue surfaces as an error the session logs, and the next committed edit
/// carries the newer timeline anyway.
pub struct ChannelPersist {
    tx: Sender<serde_json::Value>,
}

impl ChannelPersist {
    /// Bounded sink + receiver pair. A small bound is plenty — every message
    /// supersedes the previous one.
    pub fn bounded(cap: usize) -> (Self, Receiver<serde_json::Value>) {
        let (tx, rx) = crossbeam_channel::bounded(cap);
        (Self { tx }, rx)
    }
}

impl PersistSink for ChannelPersist {
    fn save_timeline(&mut self, timeline: &[Segment]) -> Result<()> {
        let payload = serde_json::to_value(timeline)?;
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => anyhow!("persistence queue full"),
            TrySendError::Disconnected(_) => anyhow!("persistence receiver gone"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingloop_core::state::Segment;

    #[test]
    fn channel_sink_emits_wire_shape() {
        let (mut sink, rx) = ChannelPersist::bounded(4);
        let mut seg = Segment::new(0.0, 5.0, "hello world");
        seg.translated_text = "你好".into();
        sink.save_timeline(&[seg]).unwrap();

        let payload = rx.try_recv().unwrap();
        assert_eq!(payload[0]["en"], "hello world");
        assert_eq!(payload[0]["zh"], "你好");
        assert_eq!(payload[0]["start"], 0.0);
    }

    #[test]
    fn full_queue_is_an_error_not_a_block() {
        let (mut sink, _rx) = ChannelPersist::bounded(1);
        let seg = Segment::new(0.0, 1.0, "x");
        sink.save_timeline(std::slice::from_ref(&seg)).unwrap();
        assert!(sink.save_timeline(std::slice::from_ref(&seg)).is_err());
    }
}
