// crates/lingloop-engine/src/testutil.rs
//
// Shared fakes for the collaborator seams. Each fake shares its state with a
// probe handle through Rc<RefCell<..>>, so a test can drive the clock and
// inspect scheduled delays / rendered regions while the session owns the
// boxed collaborator.

use std::cell::RefCell;
use std::rc::Rc;

use lingloop_core::state::Segment;

use crate::bridge::{Region, RegionView};
use crate::clock::{DelayScheduler, DelayToken, MediaClock};
use crate::persist::NullPersist;
use crate::session::StudySession;

// ── Clock ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct ClockInner {
    time:        f64,
    paused:      bool,
    duration:    f64,
    pause_count: usize,
}

struct FakeClock(Rc<RefCell<ClockInner>>);

impl MediaClock for FakeClock {
    fn time(&self) -> f64 {
        self.0.borrow().time
    }
    fn seek(&mut self, secs: f64) {
        self.0.borrow_mut().time = secs;
    }
    fn play(&mut self) {
        self.0.borrow_mut().paused = false;
    }
    fn pause(&mut self) {
        let mut inner = self.0.borrow_mut();
        inner.paused = true;
        inner.pause_count += 1;
    }
    fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }
    fn duration(&self) -> f64 {
        self.0.borrow().duration
    }
}

pub(crate) struct ClockProbe(Rc<RefCell<ClockInner>>);

impl ClockProbe {
    pub fn time(&self) -> f64 {
        self.0.borrow().time
    }
    pub fn set_time(&self, t: f64) {
        self.0.borrow_mut().time = t;
    }
    pub fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }
    pub fn set_paused(&self, paused: bool) {
        self.0.borrow_mut().paused = paused;
    }
    /// Session-driven pauses only; `set_paused` does not count.
    pub fn pause_count(&self) -> usize {
        self.0.borrow().pause_count
    }
    pub fn set_duration(&self, d: f64) {
        self.0.borrow_mut().duration = d;
    }
}

// ── Delay scheduler ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct DelayInner {
    scheduled: Vec<(f64, DelayToken)>,
    cancelled: Vec<DelayToken>,
}

struct FakeDelays(Rc<RefCell<DelayInner>>);

impl DelayScheduler for FakeDelays {
    fn schedule(&mut self, after_secs: f64, token: DelayToken) {
        self.0.borrow_mut().scheduled.push((after_secs, token));
    }
    fn cancel(&mut self, token: DelayToken) {
        self.0.borrow_mut().cancelled.push(token);
    }
}

pub(crate) struct DelayProbe(Rc<RefCell<DelayInner>>);

impl DelayProbe {
    pub fn last_scheduled(&self) -> Option<(f64, DelayToken)> {
        self.0.borrow().scheduled.last().copied()
    }
    pub fn was_cancelled(&self, token: DelayToken) -> bool {
        self.0.borrow().cancelled.contains(&token)
    }
}

// ── Region view ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ViewInner {
    renders: usize,
    last:    Vec<Region>,
}

struct RecordingView(Rc<RefCell<ViewInner>>);

impl RegionView for RecordingView {
    fn render_regions(&mut self, regions: &[Region]) {
        let mut inner = self.0.borrow_mut();
        inner.renders += 1;
        inner.last = regions.to_vec();
    }
}

pub(crate) struct ViewProbe(Rc<RefCell<ViewInner>>);

impl ViewProbe {
    pub fn render_count(&self) -> usize {
        self.0.borrow().renders
    }
    pub fn last_regions(&self) -> Vec<Region> {
        self.0.borrow().last.clone()
    }
}

// ── Session assembly ─────────────────────────────────────────────────────────

pub(crate) struct Probes {
    pub clock:  ClockProbe,
    pub delays: DelayProbe,
    pub view:   ViewProbe,
}

/// A session over the given timeline with fake collaborators and a null
/// persistence sink, plus probes into the fakes.
pub(crate) fn session_with(timeline: Vec<Segment>) -> (StudySession, Probes) {
    let clock = Rc::new(RefCell::new(ClockInner {
        time:        0.0,
        paused:      false,
        duration:    (timeline.len() as f64 * 10.0).max(10.0),
        pause_count: 0,
    }));
    let delays = Rc::new(RefCell::new(DelayInner::default()));
    let view = Rc::new(RefCell::new(ViewInner::default()));

    let mut session = StudySession::new(
        Box::new(FakeClock(Rc::clone(&clock))),
        Box::new(FakeDelays(Rc::clone(&delays))),
        Box::new(RecordingView(Rc::clone(&view))),
        Box::new(NullPersist),
    );
    session.load_timeline(timeline);

    let probes = Probes {
        clock:  ClockProbe(clock),
        delays: DelayProbe(delays),
        view:   ViewProbe(view),
    };
    (session, probes)
}

/// The two-segment fixture most scenarios start from: `[0,5) "a"`, `[5,10) "b"`.
pub(crate) fn two_segment_timeline() -> Vec<Segment> {
    vec![Segment::new(0.0, 5.0, "a"), Segment::new(5.0, 10.0, "b")]
}
