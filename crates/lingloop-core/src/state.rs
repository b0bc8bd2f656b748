// crates/lingloop-core/src/state.rs
// Pure session data — no clock, no rendering, no runtime handles.
// Serializable via serde. Used by both lingloop-engine and core consumers.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum segment length in seconds. Enforced on every mutation and resize —
/// a segment can never collapse below this floor.
pub const MIN_SEGMENT_SECS: f64 = 0.05;

/// One subtitle unit on the study timeline.
///
/// Wire field names match the subtitle JSON the transcription backend
/// produces and the persistence collaborator stores (`en`, `zh`, `userEn`,
/// `userZh`, `note`), so saved files from older sessions load unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Runtime identity only — keys visualization regions so drag callbacks
    /// survive reordering. Not part of the wire format; regenerated on load.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: f64,
    pub end:   f64,
    /// Original (machine-generated) transcription text.
    #[serde(rename = "en")]
    pub source_text: String,
    /// Original translation, empty until a translator fills it in.
    #[serde(rename = "zh", default)]
    pub translated_text: String,
    /// User override for `source_text`; display prefers it when non-blank.
    #[serde(rename = "userEn", default)]
    pub user_text: String,
    /// User override for `translated_text`.
    #[serde(rename = "userZh", default)]
    pub user_translated_text: String,
    /// Free-form annotation.
    #[serde(default)]
    pub note: String,
}

impl Segment {
    /// New segment with only machine text set. `start`/`end` are trusted —
    /// callers go through `timeline::resize` for validated changes.
    pub fn new(start: f64, end: f64, source_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            source_text:          source_text.into(),
            translated_text:      String::new(),
            user_text:            String::new(),
            user_translated_text: String::new(),
            note:                 String::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// `true` when `t` falls inside `[start, end)`.
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Text shown to the user: the override when non-blank, else the source.
    pub fn display_text(&self) -> &str {
        if self.user_text.trim().is_empty() {
            &self.source_text
        } else {
            &self.user_text
        }
    }

    /// Translation shown to the user: override when non-blank, else source.
    pub fn display_translation(&self) -> &str {
        if self.user_translated_text.trim().is_empty() {
            &self.translated_text
        } else {
            &self.user_translated_text
        }
    }
}

// ── Loop / playback configuration ─────────────────────────────────────────────

/// How many times the active segment repeats before the loop releases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    Times(u32),
    Infinite,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LoopConfig {
    pub enabled: bool,
    pub repeat:  Repeat,
    /// Countdown of repeats left for the active segment. Reinitialized from
    /// `repeat` whenever the loop is (re)enabled or the active index changes.
    #[serde(skip)]
    pub remaining: u32,
    /// Fraction of the segment's duration to wait, paused, between repeats.
    /// `0.0` restarts immediately. Valid range `[0, 1)`.
    pub pause_ratio: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            enabled:     false,
            repeat:      Repeat::Times(2),
            remaining:   0,
            pause_ratio: 0.0,
        }
    }
}

impl LoopConfig {
    /// Full repeat budget for one segment. `Infinite` reports 0 — callers
    /// must branch on `repeat` before trusting the count.
    pub fn repeat_budget(&self) -> u32 {
        match self.repeat {
            Repeat::Times(n) => n,
            Repeat::Infinite => 0,
        }
    }

    /// Reload `remaining` from the configured repeat count.
    pub fn reset_remaining(&mut self) {
        self.remaining = self.repeat_budget();
    }
}

/// Boundary behaviors when the clock crosses a segment's end. Not mutually
/// exclusive — `auto_pause` wins when both could apply.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PlaybackFlags {
    pub auto_pause:   bool,
    pub auto_advance: bool,
}

/// Which history stack `Undo`/`Redo` commands are routed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryFocus {
    #[default]
    Timeline,
    Playlist,
}

// ── Session state ─────────────────────────────────────────────────────────────

/// The single shared timeline/cursor/loop-state bundle. Owned by exactly one
/// `StudySession`; never aliased, never mutated concurrently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    /// Segments ordered by `start` ascending. Editing operations preserve
    /// order within the region they touch; there is no global re-sort.
    pub timeline: Vec<Segment>,
    /// Ordered media names for the session playlist. Has its own undo/redo
    /// history, independent of the subtitle timeline's.
    pub playlist: Vec<String>,
    /// Index of the active segment, or `None` when the clock is in a gap.
    /// Revalidated after every mutation that changes the timeline's length.
    #[serde(skip)]
    pub cursor: Option<usize>,
    pub loop_cfg: LoopConfig,
    pub flags:    PlaybackFlags,
    /// Segment index whose end boundary has already fired this pass. Makes
    /// boundary handling idempotent under high-frequency polling; cleared on
    /// rewind below the reset epsilon or when the active index changes.
    #[serde(skip)]
    pub fired_boundary: Option<usize>,
    /// Restricted interactive mode: boundary pauses are not overridden by
    /// time-based index resolution, and no pre-staging happens.
    #[serde(default)]
    pub drill_mode: bool,
    #[serde(skip)]
    pub history_focus: HistoryFocus,

    // ── History lengths (runtime-only) ───────────────────────────────────────
    /// Undo depth of the focused history stack. Mirrored by the session each
    /// time a stack changes so renderers can enable/disable buttons without
    /// reaching into the stacks themselves.
    #[serde(skip)]
    pub undo_len: usize,
    #[serde(skip)]
    pub redo_len: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            timeline:       Vec::new(),
            playlist:       Vec::new(),
            cursor:         None,
            loop_cfg:       LoopConfig::default(),
            flags:          PlaybackFlags::default(),
            fired_boundary: None,
            drill_mode:     false,
            history_focus:  HistoryFocus::default(),
            undo_len:       0,
            redo_len:       0,
        }
    }
}

impl SessionState {
    /// The segment under the cursor, or `None` when nothing is active.
    pub fn active_segment(&self) -> Option<&Segment> {
        self.cursor.and_then(|i| self.timeline.get(i))
    }

    /// Index of the segment containing `t`, by the `[start, end)` rule.
    /// Returns `None` for gaps, times beyond the last segment, and NaN.
    pub fn segment_index_at(&self, t: f64) -> Option<usize> {
        if !t.is_finite() {
            return None;
        }
        self.timeline.iter().position(|s| s.contains(t))
    }

    /// Position of the segment with runtime id `id`.
    pub fn segment_position(&self, id: Uuid) -> Option<usize> {
        self.timeline.iter().position(|s| s.id == id)
    }

    /// Revalidate the cursor after a mutation that changed the timeline's
    /// length: clamp into range, or drop to `None` on an empty timeline.
    pub fn clamp_cursor(&mut self) {
        self.cursor = match self.cursor {
            Some(_) if self.timeline.is_empty() => None,
            Some(i) => Some(i.min(self.timeline.len() - 1)),
            None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_non_blank_override() {
        let mut seg = Segment::new(0.0, 2.0, "machine text");
        assert_eq!(seg.display_text(), "machine text");
        seg.user_text = "  ".into(); // blank override is ignored
        assert_eq!(seg.display_text(), "machine text");
        seg.user_text = "my edit".into();
        assert_eq!(seg.display_text(), "my edit");
    }

    #[test]
    fn contains_is_half_open() {
        let seg = Segment::new(1.0, 2.0, "x");
        assert!(seg.contains(1.0));
        assert!(seg.contains(1.999));
        assert!(!seg.contains(2.0));
        assert!(!seg.contains(0.999));
    }

    #[test]
    fn segment_index_skips_nan_and_gaps() {
        let mut state = SessionState::default();
        state.timeline = vec![Segment::new(0.0, 5.0, "a"), Segment::new(6.0, 10.0, "b")];
        assert_eq!(state.segment_index_at(4.0), Some(0));
        assert_eq!(state.segment_index_at(5.5), None); // gap
        assert_eq!(state.segment_index_at(11.0), None); // past the end
        assert_eq!(state.segment_index_at(f64::NAN), None);
    }

    #[test]
    fn clamp_cursor_after_shrink() {
        let mut state = SessionState::default();
        state.timeline = vec![Segment::new(0.0, 1.0, "a"), Segment::new(1.0, 2.0, "b")];
        state.cursor = Some(1);
        state.timeline.pop();
        state.clamp_cursor();
        assert_eq!(state.cursor, Some(0));
        state.timeline.clear();
        state.clamp_cursor();
        assert_eq!(state.cursor, None);
    }

    #[test]
    fn wire_names_round_trip() {
        let json = r#"{"start":1.0,"end":2.5,"en":"hello there","zh":"你好","userEn":"","userZh":"","note":"n"}"#;
        let seg: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(seg.source_text, "hello there");
        assert_eq!(seg.translated_text, "你好");
        let back = serde_json::to_value(&seg).unwrap();
        assert_eq!(back["en"], "hello there");
        assert!(back.get("id").is_none(), "runtime id must stay off the wire");
    }
}
