// crates/lingloop-core/src/commands.rs
//
// Every user action in lingloop is expressed as a StudyCommand.
// Host frontends emit these; StudySession::process_command applies them after
// the UI pass. Adding a feature = add a variant here + one match arm there.

use crate::state::{HistoryFocus, LoopConfig};

/// Caller-supplied text overrides applied to the selected segment just before
/// a split, so an in-progress edit in the host's text box is not lost when
/// the segment is replaced by its halves.
#[derive(Debug, Clone, Default)]
pub struct TextEdit {
    pub user_text:            Option<String>,
    pub user_translated_text: Option<String>,
}

#[derive(Debug, Clone)]
pub enum StudyCommand {
    // ── Navigation ───────────────────────────────────────────────────────────
    /// Seek to a segment's start. `force_play` always wins over auto-pause.
    JumpTo { index: usize, force_play: bool },
    NextSegment { force_play: bool },
    PrevSegment,
    SelectSegment(Option<usize>),

    // ── Playback behavior ────────────────────────────────────────────────────
    /// Replace the loop configuration. (Re)enabling reinitializes the
    /// remaining-repeat countdown; disabling cancels any pending timed resume.
    SetLoop(LoopConfig),
    SetAutoPause(bool),
    SetAutoAdvance(bool),
    SetDrillMode(bool),

    // ── Timeline editing ─────────────────────────────────────────────────────
    /// Split the selected segment at `cut_time` (media seconds, strictly
    /// inside the segment). Selection stays on the first half.
    SplitAt { cut_time: f64, edited: Option<TextEdit> },
    /// Merge a contiguous ascending run of ≥ 2 indices into one segment.
    /// Selection moves to `max(0, first − 1)`.
    MergeSelection(Vec<usize>),

    // ── Playlist ─────────────────────────────────────────────────────────────
    MovePlaylistEntry { from: usize, to: usize },
    RemovePlaylistEntry(usize),

    // ── Undo / Redo ──────────────────────────────────────────────────────────
    /// Route subsequent Undo/Redo to the timeline or the playlist stack.
    SetHistoryFocus(HistoryFocus),
    /// Install the previous snapshot of the focused history. Silent no-op at
    /// the oldest retained state.
    Undo,
    /// Re-install the most recently undone snapshot. Silent no-op when a new
    /// commit has truncated the future branch.
    Redo,
}
