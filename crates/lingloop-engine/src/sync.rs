// crates/lingloop-engine/src/sync.rs
//
// Playback synchronizer: keeps the cursor in lock-step with the media clock
// and fires loop / auto-pause / auto-advance transitions exactly once per
// boundary crossing.
//
// The host polls the clock at whatever granularity it likes and calls
// `on_tick` for every sample. Edge-triggered behavior comes from the
// `fired_boundary` marker plus a reset epsilon, not from assuming anything
// about tick spacing — ticks may jitter, repeat, or jump backwards on seeks.

use log::debug;

use lingloop_core::helpers::time::format_timestamp;
use lingloop_core::state::Repeat;

use crate::clock::{DelayToken, PendingDelay};
use crate::session::StudySession;

/// A boundary counts as crossed this many seconds before the segment's end,
/// so the transition lands before the clock bleeds into the next segment.
pub(crate) const BOUNDARY_LEAD_SECS: f64 = 0.05;

/// The fired marker clears once the clock retreats this far below the end —
/// rewinds and loop restarts re-arm the boundary, tick jitter does not.
pub(crate) const MARKER_RESET_SECS: f64 = 0.1;

/// Seeks land just past the segment start so index resolution on the very
/// next tick cannot land on the previous segment's half-open end.
pub(crate) const JUMP_NUDGE_SECS: f64 = 0.01;

/// How long after an auto-pause the cursor is pre-staged onto the next
/// segment (outside drill mode), so an explicit continue starts instantly.
pub(crate) const PRESTAGE_DELAY_SECS: f64 = 0.15;

impl StudySession {
    // ── Clock tick ───────────────────────────────────────────────────────────

    /// Evaluate one clock sample. Ticks arriving while a previous tick is
    /// still running (a host firing synchronously from inside our seek) are
    /// dropped, never nested.
    pub fn on_tick(&mut self) {
        if self.in_tick {
            return;
        }
        self.in_tick = true;
        self.tick_inner();
        self.in_tick = false;
    }

    fn tick_inner(&mut self) {
        let t = self.clock.time();
        // NaN before media metadata loads: no active segment, skip the tick.
        if !t.is_finite() {
            return;
        }

        // 1. Marker reset: a rewind below the epsilon re-arms the boundary.
        if let Some(i) = self.state.cursor {
            if self.state.fired_boundary == Some(i) {
                if let Some(seg) = self.state.timeline.get(i) {
                    if t < seg.end - MARKER_RESET_SECS {
                        self.state.fired_boundary = None;
                    }
                }
            }
        }

        // 2. Lazy remaining reinit: starting playback mid-segment with a
        //    stale zero countdown reloads the full budget.
        if let Some(seg) = self.state.active_segment() {
            let cfg = self.state.loop_cfg;
            if cfg.enabled
                && cfg.remaining == 0
                && cfg.repeat != Repeat::Infinite
                && t >= seg.start
                && t < seg.end - BOUNDARY_LEAD_SECS
            {
                self.state.loop_cfg.reset_remaining();
            }
        }

        // 3. Boundary crossing.
        if let Some(i) = self.state.cursor {
            if let Some(seg) = self.state.timeline.get(i) {
                let (seg_start, seg_end, seg_dur) = (seg.start, seg.end, seg.duration());
                if t >= seg_end - BOUNDARY_LEAD_SECS && self.state.fired_boundary != Some(i) {
                    self.state.fired_boundary = Some(i);

                    if self.state.loop_cfg.enabled {
                        let repeat_again = match self.state.loop_cfg.repeat {
                            Repeat::Infinite => true,
                            Repeat::Times(_) if self.state.loop_cfg.remaining > 1 => {
                                self.state.loop_cfg.remaining -= 1;
                                true
                            }
                            Repeat::Times(_) => {
                                self.state.loop_cfg.remaining = 0;
                                false
                            }
                        };
                        if repeat_again {
                            let ratio = self.state.loop_cfg.pause_ratio;
                            if ratio > 0.0 {
                                self.clock.pause();
                                self.schedule_delay(
                                    PendingDelay::LoopResume { index: i },
                                    seg_dur * ratio,
                                );
                            } else {
                                // The rewind drops t below end − epsilon, so
                                // step 1 re-arms the marker on the next tick.
                                self.clock.seek(seg_start);
                                self.clock.play();
                            }
                            return;
                        }
                        debug!("[sync] loop exhausted on segment {i}");
                        // Last repeat done: fall through to the flags.
                    }

                    if self.state.flags.auto_pause {
                        if !self.clock.is_paused() {
                            self.clock.pause();
                            if !self.state.drill_mode && i + 1 < self.state.timeline.len() {
                                self.schedule_delay(
                                    PendingDelay::PreStage { index: i + 1 },
                                    PRESTAGE_DELAY_SECS,
                                );
                            }
                        }
                        return;
                    }

                    if self.state.flags.auto_advance {
                        if i + 1 < self.state.timeline.len() {
                            self.cancel_pending();
                            self.state.cursor = Some(i + 1);
                            self.state.fired_boundary = None;
                            self.state.loop_cfg.reset_remaining();
                        } else {
                            self.clock.pause();
                        }
                        return;
                    }
                    // No behavior configured: marker set, resolution proceeds.
                }
            }
        }

        // 4. Index resolution. Drill mode keeps a boundary pause in place
        //    instead of letting time-based resolution override it.
        if self.state.drill_mode && self.clock.is_paused() {
            return;
        }
        if let Some(idx) = self.state.segment_index_at(t) {
            if self.state.cursor != Some(idx) {
                // A pending delay belongs to the segment it was scheduled
                // for; it must not resume playback into this one.
                self.cancel_pending();
                self.state.cursor = Some(idx);
                self.state.fired_boundary = None;
                self.state.loop_cfg.reset_remaining();
            }
        }
        // Gaps and times past the last segment leave the cursor unchanged.
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    /// Seek to a segment's start. Out-of-range indices are no-ops. Forced
    /// play always wins over auto-pause; with neither, the playback state is
    /// left untouched.
    pub fn jump_to(&mut self, index: usize, force_play: bool) {
        let Some(seg) = self.state.timeline.get(index) else {
            return;
        };
        let target = seg.start + JUMP_NUDGE_SECS;
        debug!("[sync] jump to segment {index} at {}", format_timestamp(target));

        self.cancel_pending();
        self.state.cursor = Some(index);
        self.state.fired_boundary = None;
        self.state.loop_cfg.reset_remaining();
        self.clock.seek(target);

        if force_play {
            self.clock.play();
        } else if self.state.flags.auto_pause {
            self.clock.pause();
        }
    }

    /// Jump to the segment after the cursor (the first one when nothing is
    /// active). No-op past the end of the timeline.
    pub fn next(&mut self, force_play: bool) {
        let target = self.state.cursor.map_or(0, |i| i + 1);
        self.jump_to(target, force_play);
    }

    /// Jump to the segment before the cursor, saturating at the first.
    pub fn prev(&mut self) {
        let target = self.state.cursor.map_or(0, |i| i.saturating_sub(1));
        self.jump_to(target, false);
    }

    // ── Timed delays ─────────────────────────────────────────────────────────

    /// Host callback when a scheduled delay elapses. Stale tokens — anything
    /// superseded by a newer schedule, a navigation, or an edit — are
    /// ignored, which is what makes pending timed resumes cancellable.
    pub fn delay_fired(&mut self, token: DelayToken) {
        let Some((pending, kind)) = self.pending_delay else {
            return;
        };
        if pending != token {
            return;
        }
        self.pending_delay = None;

        match kind {
            PendingDelay::LoopResume { index } => {
                let Some(seg) = self.state.timeline.get(index) else {
                    return;
                };
                let start = seg.start;
                self.clock.seek(start);
                self.state.fired_boundary = None;
                self.clock.play();
            }
            PendingDelay::PreStage { index } => {
                // Purely primes immediate continuation: cursor and clock move,
                // playback stays paused. A user who already resumed wins.
                if index >= self.state.timeline.len() || !self.clock.is_paused() {
                    return;
                }
                let start = self.state.timeline[index].start;
                self.state.cursor = Some(index);
                self.state.fired_boundary = None;
                self.state.loop_cfg.reset_remaining();
                self.clock.seek(start + JUMP_NUDGE_SECS);
            }
        }
    }
}
