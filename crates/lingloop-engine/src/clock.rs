// crates/lingloop-engine/src/clock.rs
//
// Collaborator interfaces for the host's media element.
//
// The engine never decodes or renders anything — it drives whatever the host
// wraps behind MediaClock (an HTML media element, a GStreamer pipeline, a
// test fake) and schedules its one kind of timed side effect through
// DelayScheduler so the host's event loop stays in charge of timers.

/// The continuous audio/video clock the synchronizer is kept in lock-step
/// with. `seek`/`play`/`pause` take effect before the call returns as far as
/// the engine is concerned; the host may smooth them asynchronously.
pub trait MediaClock {
    /// Current position in seconds. May be NaN before media metadata loads —
    /// the synchronizer skips such ticks.
    fn time(&self) -> f64;
    fn seek(&mut self, secs: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Total media duration in seconds.
    fn duration(&self) -> f64;
}

/// Identifies one scheduled delay. Tokens are issued monotonically by the
/// session; a fired token that no longer matches the session's pending delay
/// is stale and must be ignored, which is what makes pending timed resumes
/// cancellable without the host tracking anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayToken(pub(crate) u64);

/// Host-side one-shot timer. After roughly `after_secs` the host calls
/// `StudySession::delay_fired(token)`. `cancel` is best-effort — a late
/// firing of a cancelled token is harmless because the token check rejects it.
pub trait DelayScheduler {
    fn schedule(&mut self, after_secs: f64, token: DelayToken);
    fn cancel(&mut self, token: DelayToken);
}

/// What a pending delay will do when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PendingDelay {
    /// Inter-repeat pause elapsed: seek back to the segment start and resume.
    LoopResume { index: usize },
    /// Auto-pause pre-staging: move the cursor (not playback) onto the next
    /// segment so an explicit continue starts instantly.
    PreStage { index: usize },
}
