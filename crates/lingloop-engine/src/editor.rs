// crates/lingloop-engine/src/editor.rs
//
// Timeline editor: split, merge, and manual sequential timing. Validation
// happens before any mutation; every successful operation commits exactly one
// history snapshot through `commit_timeline_edit`, all-or-nothing.

use lingloop_core::commands::TextEdit;
use lingloop_core::error::EditError;
use lingloop_core::state::{Segment, MIN_SEGMENT_SECS};
use lingloop_core::timeline;

use crate::session::StudySession;

/// Gap left between a manually marked boundary and the previous line's end,
/// so back-to-back segments don't bleed their last syllable into each other.
const END_TRIM_SECS: f64 = 0.05;

impl StudySession {
    // ── Split ────────────────────────────────────────────────────────────────

    /// Split the selected segment at `cut_time`. An in-progress text edit
    /// from the host's edit box is applied to the segment first, so the
    /// proportional partition works on what the user actually sees.
    /// Selection stays on the first half.
    pub(crate) fn split(
        &mut self,
        cut_time: f64,
        edited: Option<TextEdit>,
    ) -> Result<(), EditError> {
        let Some(i) = self.state.cursor else {
            return Err(EditError::EmptySelection);
        };
        let Some(seg) = self.state.timeline.get(i) else {
            return Err(EditError::EmptySelection);
        };

        let mut seg = seg.clone();
        if let Some(edit) = edited {
            if let Some(text) = edit.user_text {
                seg.user_text = text;
            }
            if let Some(text) = edit.user_translated_text {
                seg.user_translated_text = text;
            }
        }

        let (first, second) = timeline::split_segment(&seg, cut_time)?;
        self.state.timeline.splice(i..=i, [first, second]);
        self.state.cursor = Some(i);
        self.commit_timeline_edit();
        Ok(())
    }

    // ── Merge ────────────────────────────────────────────────────────────────

    /// Merge a selection of segments. The indices must form one contiguous
    /// ascending run of length ≥ 2 inside the timeline — anything else comes
    /// back as `NotContiguous` so the host can surface a corrective prompt
    /// instead of silently reshaping the selection. Selection moves to
    /// `max(0, first − 1)`.
    pub(crate) fn merge(&mut self, indices: &[usize]) -> Result<(), EditError> {
        if indices.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let contiguous = indices.len() >= 2
            && indices.windows(2).all(|w| w[1] == w[0] + 1)
            && indices[indices.len() - 1] < self.state.timeline.len();
        if !contiguous {
            return Err(EditError::NotContiguous);
        }

        let first = indices[0];
        let last = indices[indices.len() - 1];
        let merged = timeline::merge_segments(&self.state.timeline[first..=last])?;
        self.state.timeline.splice(first..=last, [merged]);
        self.state.cursor = Some(first.saturating_sub(1));
        self.commit_timeline_edit();
        Ok(())
    }

    // ── Manual sequential timing ─────────────────────────────────────────────

    /// Replace the whole timeline with the result of a manual timing pass.
    /// The final line's end defaults to the media duration. One history
    /// entry for the whole batch, not per mark.
    pub fn apply_manual_timing(&mut self, timer: &ManualTimer) -> Result<(), EditError> {
        let timeline = timer.finalize(self.clock.duration())?;
        self.state.timeline = timeline;
        self.state.cursor = None;
        self.commit_timeline_edit();
        Ok(())
    }
}

/// Captures sequential timestamps over an ordered list of text lines: mark
/// the first line's start while listening, then mark each boundary as it
/// passes. `marks[0]` is line 0's start; every later mark is the boundary
/// between one line and the next.
///
/// The timer is pure bookkeeping over sampled clock values — the host samples
/// its clock and passes the time in, and nothing mutates the session until
/// `StudySession::apply_manual_timing` installs the finalized batch.
#[derive(Debug, Clone)]
pub struct ManualTimer {
    lines: Vec<String>,
    marks: Vec<f64>,
}

impl ManualTimer {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, marks: Vec::new() }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the line currently being timed, once the start is marked.
    pub fn current_line(&self) -> Option<usize> {
        self.marks.len().checked_sub(1)
    }

    /// All boundaries marked; finalize will time every line.
    pub fn is_complete(&self) -> bool {
        !self.lines.is_empty() && self.marks.len() == self.lines.len()
    }

    /// Mark (or re-mark) the first line's start. Adjustable until the first
    /// boundary mark exists; a no-op afterwards.
    pub fn mark_start(&mut self, t: f64) {
        if self.lines.is_empty() || self.marks.len() > 1 {
            return;
        }
        self.marks.clear();
        self.marks.push(t);
    }

    /// Mark the boundary between the current line and the next. Returns
    /// `false` when the start is unmarked, every boundary is already marked,
    /// or `t` does not advance past the previous mark.
    pub fn mark_next(&mut self, t: f64) -> bool {
        let Some(&last) = self.marks.last() else {
            return false;
        };
        if self.marks.len() >= self.lines.len() || t <= last {
            return false;
        }
        self.marks.push(t);
        true
    }

    /// Drop the most recent mark, moving the pointer back one line. Returns
    /// `false` when there is nothing to undo.
    pub fn undo_mark(&mut self) -> bool {
        self.marks.pop().is_some()
    }

    /// Convert the line/time pairs into segments. Each marked boundary
    /// becomes the next line's start, with the previous line's end trimmed
    /// back by a small gap; the last timed line runs to `media_duration`.
    /// Lines past the last mark are dropped. Fails with `EmptySelection`
    /// before the first start mark.
    pub fn finalize(&self, media_duration: f64) -> Result<Vec<Segment>, EditError> {
        if self.marks.is_empty() {
            return Err(EditError::EmptySelection);
        }

        let mut out = Vec::with_capacity(self.marks.len());
        for (i, &start) in self.marks.iter().enumerate() {
            let end = match self.marks.get(i + 1) {
                Some(&next) => (next - END_TRIM_SECS).max(start + MIN_SEGMENT_SECS),
                None => media_duration.max(start + MIN_SEGMENT_SECS),
            };
            out.push(Segment::new(start, end, self.lines[i].as_str()));
        }
        Ok(out)
    }
}
