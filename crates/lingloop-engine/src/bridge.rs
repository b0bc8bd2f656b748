// crates/lingloop-engine/src/bridge.rs
//
// Region/selection bridge: segment list ⇄ external visualization rectangles.
//
// The engine emits one Region per segment whenever the timeline changes, and
// consumes drag-resize callbacks keyed by the segment's runtime id. The
// resize path is the ONLY way an external visualization mutates engine
// state, and it goes through the same clamps as `timeline::resize`.

use log::warn;
use uuid::Uuid;

use lingloop_core::state::{Segment, MIN_SEGMENT_SECS};
use lingloop_core::timeline;

use crate::session::StudySession;

/// One visualization rectangle. `id` matches `Segment::id` so the rectangle
/// keeps tracking its segment across splits, merges, and undo.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id:    Uuid,
    pub start: f64,
    pub end:   f64,
    pub label: String,
}

/// Waveform/timeline visualization collaborator. Receives the full region
/// set after every committed timeline change; emits resize callbacks back
/// into `StudySession::handle_region_resize`.
pub trait RegionView {
    fn render_regions(&mut self, regions: &[Region]);
}

/// Build the region set for a timeline. Labels carry the display text (user
/// override when present), which is what the original tool shows on hover.
pub fn regions_for(timeline: &[Segment]) -> Vec<Region> {
    timeline
        .iter()
        .map(|s| Region {
            id:    s.id,
            start: s.start,
            end:   s.end,
            label: s.display_text().to_owned(),
        })
        .collect()
}

impl StudySession {
    /// Drag-resize callback from the visualization: `{id, start, end}`.
    ///
    /// The start is clamped to ≥ 0 and the end up to the minimum-duration
    /// floor (drag input is continuous — clamping beats rejecting here),
    /// then the write-back commits one history snapshot and re-renders
    /// cursor-consistently. Unknown ids are logged and dropped; the
    /// visualization may briefly hold rectangles for segments an undo just
    /// removed.
    pub fn handle_region_resize(&mut self, id: Uuid, start: f64, end: f64) {
        let Some(i) = self.state.segment_position(id) else {
            warn!("[bridge] resize for unknown region {id}");
            return;
        };

        let new_start = start.max(0.0);
        let new_end = end.max(new_start + MIN_SEGMENT_SECS);
        // Clamped values always satisfy the resize floor.
        if let Err(e) = timeline::resize(&mut self.state.timeline[i], new_start, new_end) {
            warn!("[bridge] resize rejected for region {id}: {e}");
            return;
        }
        self.commit_timeline_edit();
    }
}
