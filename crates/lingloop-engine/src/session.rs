// crates/lingloop-engine/src/session.rs
//
// StudySession — the one object that owns the shared timeline/cursor/loop
// bundle and all collaborator handles. Host frontends emit StudyCommands;
// process_command applies them after the UI pass. The synchronizer
// (sync.rs), editor (editor.rs), and bridge (bridge.rs) are impl blocks on
// this type so every mutation funnels through the same commit helpers.

use log::{debug, warn};

use lingloop_core::commands::StudyCommand;
use lingloop_core::helpers::time::format_duration;
use lingloop_core::error::EditError;
use lingloop_core::history::HistoryStack;
use lingloop_core::state::{HistoryFocus, Segment, SessionState};

use crate::bridge::{regions_for, RegionView};
use crate::clock::{DelayScheduler, DelayToken, MediaClock, PendingDelay};
use crate::persist::PersistSink;

pub struct StudySession {
    pub state: SessionState,
    pub(crate) clock:   Box<dyn MediaClock>,
    pub(crate) delays:  Box<dyn DelayScheduler>,
    pub(crate) view:    Box<dyn RegionView>,
    pub(crate) persist: Box<dyn PersistSink>,
    /// Snapshot history over the subtitle timeline.
    pub(crate) timeline_history: HistoryStack<Vec<Segment>>,
    /// Independent snapshot history over the playlist ordering.
    pub(crate) playlist_history: HistoryStack<Vec<String>>,
    /// At most one scheduled delay is live at a time; a newer one supersedes.
    pub(crate) pending_delay: Option<(DelayToken, PendingDelay)>,
    pub(crate) next_token: u64,
    /// Re-entrancy guard: a tick arriving while a tick is still running
    /// (e.g. the host fires one synchronously from inside our seek) is
    /// dropped, never nested.
    pub(crate) in_tick: bool,
}

impl StudySession {
    pub fn new(
        clock:   Box<dyn MediaClock>,
        delays:  Box<dyn DelayScheduler>,
        view:    Box<dyn RegionView>,
        persist: Box<dyn PersistSink>,
    ) -> Self {
        Self {
            state: SessionState::default(),
            clock,
            delays,
            view,
            persist,
            timeline_history: HistoryStack::new(Vec::new()),
            playlist_history: HistoryStack::new(Vec::new()),
            pending_delay: None,
            next_token: 0,
            in_tick: false,
        }
    }

    // ── Read-only surface for renderers ──────────────────────────────────────

    pub fn timeline(&self) -> &[Segment] {
        &self.state.timeline
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.cursor
    }

    // ── Session loading ──────────────────────────────────────────────────────

    /// Install a freshly imported timeline: resets cursor, boundary marker,
    /// pending delays, and reseeds the timeline history. No persistence
    /// notification — this data just came *from* the collaborator.
    pub fn load_timeline(&mut self, timeline: Vec<Segment>) {
        self.cancel_pending();
        self.state.timeline = timeline;
        self.state.cursor = None;
        self.state.fired_boundary = None;
        self.state.loop_cfg.reset_remaining();
        self.timeline_history.reset(self.state.timeline.clone());
        self.refresh_history_lens();
        let regions = regions_for(&self.state.timeline);
        self.view.render_regions(&regions);
        let span = self.state.timeline.last().map_or(0.0, |s| s.end);
        debug!(
            "[session] loaded timeline: {} segments spanning {}",
            self.state.timeline.len(),
            format_duration(span)
        );
    }

    pub fn load_playlist(&mut self, entries: Vec<String>) {
        self.state.playlist = entries;
        self.playlist_history.reset(self.state.playlist.clone());
        self.refresh_history_lens();
    }

    // ── Command processing ───────────────────────────────────────────────────

    /// Apply one command. Validation errors (bad cut time, non-contiguous
    /// merge selection) come back to the caller so the host can surface a
    /// corrective prompt; nothing has been mutated or committed when they do.
    pub fn process_command(&mut self, cmd: StudyCommand) -> Result<(), EditError> {
        match cmd {
            // ── Navigation ───────────────────────────────────────────────────
            StudyCommand::JumpTo { index, force_play } => {
                self.jump_to(index, force_play);
            }
            StudyCommand::NextSegment { force_play } => {
                self.next(force_play);
            }
            StudyCommand::PrevSegment => {
                self.prev();
            }
            StudyCommand::SelectSegment(index) => {
                // Out-of-range requests are no-ops, like every navigation.
                if let Some(i) = index {
                    if i >= self.state.timeline.len() {
                        return Ok(());
                    }
                }
                if self.state.cursor != index {
                    self.cancel_pending();
                    self.state.cursor = index;
                    self.state.fired_boundary = None;
                    self.state.loop_cfg.reset_remaining();
                }
            }

            // ── Playback behavior ────────────────────────────────────────────
            StudyCommand::SetLoop(cfg) => {
                // (Re)enabling reinitializes the countdown; any pending timed
                // resume belongs to the old configuration and dies here.
                self.cancel_pending();
                self.state.loop_cfg = cfg;
                self.state.loop_cfg.reset_remaining();
            }
            StudyCommand::SetAutoPause(v) => self.state.flags.auto_pause = v,
            StudyCommand::SetAutoAdvance(v) => self.state.flags.auto_advance = v,
            StudyCommand::SetDrillMode(v) => self.state.drill_mode = v,

            // ── Timeline editing ─────────────────────────────────────────────
            StudyCommand::SplitAt { cut_time, edited } => {
                self.split(cut_time, edited)?;
            }
            StudyCommand::MergeSelection(indices) => {
                self.merge(&indices)?;
            }

            // ── Playlist ─────────────────────────────────────────────────────
            StudyCommand::MovePlaylistEntry { from, to } => {
                self.move_playlist_entry(from, to);
            }
            StudyCommand::RemovePlaylistEntry(index) => {
                self.remove_playlist_entry(index);
            }

            // ── Undo / Redo ──────────────────────────────────────────────────
            StudyCommand::SetHistoryFocus(focus) => {
                self.state.history_focus = focus;
                self.refresh_history_lens();
            }
            StudyCommand::Undo => self.undo(),
            StudyCommand::Redo => self.redo(),
        }
        Ok(())
    }

    // ── Undo / Redo ──────────────────────────────────────────────────────────

    /// Install the previous snapshot of the focused stack. Silent no-op at
    /// the oldest retained state (HistoryExhausted is not a user-visible
    /// error).
    pub fn undo(&mut self) {
        match self.state.history_focus {
            HistoryFocus::Timeline => {
                if let Some(snapshot) = self.timeline_history.undo() {
                    self.install_timeline_snapshot(snapshot);
                }
            }
            HistoryFocus::Playlist => {
                if let Some(snapshot) = self.playlist_history.undo() {
                    self.state.playlist = snapshot;
                    self.refresh_history_lens();
                }
            }
        }
    }

    pub fn redo(&mut self) {
        match self.state.history_focus {
            HistoryFocus::Timeline => {
                if let Some(snapshot) = self.timeline_history.redo() {
                    self.install_timeline_snapshot(snapshot);
                }
            }
            HistoryFocus::Playlist => {
                if let Some(snapshot) = self.playlist_history.redo() {
                    self.state.playlist = snapshot;
                    self.refresh_history_lens();
                }
            }
        }
    }

    /// A restored snapshot may describe a completely different segment set —
    /// cursor and boundary marker are re-derived (reset), pending delays die.
    fn install_timeline_snapshot(&mut self, snapshot: Vec<Segment>) {
        self.cancel_pending();
        self.state.timeline = snapshot;
        self.state.cursor = None;
        self.state.fired_boundary = None;
        self.state.loop_cfg.reset_remaining();
        self.refresh_history_lens();
        let regions = regions_for(&self.state.timeline);
        self.view.render_regions(&regions);
        self.notify_persist();
    }

    // ── Playlist editing ─────────────────────────────────────────────────────

    pub fn move_playlist_entry(&mut self, from: usize, to: usize) {
        let len = self.state.playlist.len();
        if from >= len || to >= len || from == to {
            return;
        }
        let entry = self.state.playlist.remove(from);
        self.state.playlist.insert(to, entry);
        self.playlist_history.commit(&self.state.playlist);
        self.refresh_history_lens();
    }

    pub fn remove_playlist_entry(&mut self, index: usize) {
        if index >= self.state.playlist.len() {
            return;
        }
        self.state.playlist.remove(index);
        self.playlist_history.commit(&self.state.playlist);
        self.refresh_history_lens();
    }

    // ── Commit plumbing ──────────────────────────────────────────────────────

    /// Record a committed timeline edit: snapshot to history, revalidate the
    /// cursor, reset boundary state, kill pending delays, re-emit regions,
    /// notify persistence. Every editing path (split, merge, manual timing,
    /// region resize) ends here exactly once.
    pub(crate) fn commit_timeline_edit(&mut self) {
        self.timeline_history.commit(&self.state.timeline);
        self.cancel_pending();
        self.state.clamp_cursor();
        self.state.fired_boundary = None;
        self.refresh_history_lens();
        let regions = regions_for(&self.state.timeline);
        self.view.render_regions(&regions);
        self.notify_persist();
    }

    pub(crate) fn notify_persist(&mut self) {
        if let Err(e) = self.persist.save_timeline(&self.state.timeline) {
            // In-memory state stays the source of truth; never propagate.
            warn!("[session] persistence notification failed: {e:#}");
        }
    }

    pub(crate) fn refresh_history_lens(&mut self) {
        let (u, r) = match self.state.history_focus {
            HistoryFocus::Timeline => (
                self.timeline_history.undo_len(),
                self.timeline_history.redo_len(),
            ),
            HistoryFocus::Playlist => (
                self.playlist_history.undo_len(),
                self.playlist_history.redo_len(),
            ),
        };
        self.state.undo_len = u;
        self.state.redo_len = r;
    }

    // ── Delay bookkeeping ────────────────────────────────────────────────────

    pub(crate) fn schedule_delay(&mut self, kind: PendingDelay, after_secs: f64) {
        self.cancel_pending();
        self.next_token += 1;
        let token = DelayToken(self.next_token);
        self.pending_delay = Some((token, kind));
        self.delays.schedule(after_secs, token);
    }

    pub(crate) fn cancel_pending(&mut self) {
        if let Some((token, _)) = self.pending_delay.take() {
            self.delays.cancel(token);
        }
    }
}
