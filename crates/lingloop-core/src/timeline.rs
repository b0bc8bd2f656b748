// crates/lingloop-core/src/timeline.rs
//
// Pure timeline-model operations: split, merge, resize. No side effects, no
// history, no collaborator calls — lingloop-engine's editor wraps these with
// validation-before-commit and snapshot bookkeeping.
//
// Ordering invariant: segments are ordered by `start` ascending. These
// operations preserve order within the region they touch; they never
// globally re-sort.

use uuid::Uuid;

use crate::error::EditError;
use crate::helpers::text;
use crate::state::{Segment, MIN_SEGMENT_SECS};

/// Split one segment at `cut` into two that exactly partition its range.
///
/// Fails with `InvalidRange` unless the cut is strictly inside the segment
/// with at least `MIN_SEGMENT_SECS` on each side. Text fields are partitioned
/// by the time proportion, independently per field (see `helpers::text`);
/// blank fields yield blank partitions. The note stays with the first half.
///
/// The first half keeps the original runtime id so an existing visualization
/// region maps onto it; the second half gets a fresh id.
pub fn split_segment(seg: &Segment, cut: f64) -> Result<(Segment, Segment), EditError> {
    let lo = seg.start + MIN_SEGMENT_SECS;
    let hi = seg.end - MIN_SEGMENT_SECS;
    if !(cut >= lo && cut <= hi) {
        return Err(EditError::InvalidRange { value: cut, lo, hi });
    }

    let proportion = (cut - seg.start) / (seg.end - seg.start);
    let (src_a, src_b)   = text::partition(&seg.source_text, proportion);
    let (tr_a, tr_b)     = text::partition(&seg.translated_text, proportion);
    let (user_a, user_b) = text::partition(&seg.user_text, proportion);
    let (utr_a, utr_b)   = text::partition(&seg.user_translated_text, proportion);

    let first = Segment {
        id: seg.id,
        start: seg.start,
        end: cut,
        source_text:          src_a,
        translated_text:      tr_a,
        user_text:            user_a,
        user_translated_text: utr_a,
        note:                 seg.note.clone(),
    };
    let second = Segment {
        id: Uuid::new_v4(),
        start: cut,
        end: seg.end,
        source_text:          src_b,
        translated_text:      tr_b,
        user_text:            user_b,
        user_translated_text: utr_b,
        note:                 String::new(),
    };
    Ok((first, second))
}

/// Merge a contiguous run of segments into one spanning
/// `[first.start, last.end]`.
///
/// Contiguity of the *indices* is the caller's precondition (the editor
/// checks the selection before slicing); this function only rejects runs
/// shorter than two. Text fields are concatenated per field with blanks
/// filtered out — spaced text joins with a single space, dense text with no
/// separator.
pub fn merge_segments(run: &[Segment]) -> Result<Segment, EditError> {
    if run.len() < 2 {
        return Err(EditError::NotContiguous);
    }
    let first = &run[0];
    let last = &run[run.len() - 1];

    let field = |get: fn(&Segment) -> &str| -> String {
        text::join_parts(run.iter().map(get))
    };

    Ok(Segment {
        id: first.id,
        start: first.start,
        end: last.end,
        source_text:          field(|s| &s.source_text),
        translated_text:      field(|s| &s.translated_text),
        user_text:            field(|s| &s.user_text),
        user_translated_text: field(|s| &s.user_translated_text),
        note:                 field(|s| &s.note),
    })
}

/// Tolerance for comparing durations against the floor. `start + 0.05 − start`
/// can land one ulp short of `0.05`, so the floor is enforced up to this
/// epsilon rather than bitwise.
const DURATION_EPSILON: f64 = 1e-9;

/// Validated in-place resize. The start is clamped to ≥ 0; an end that would
/// leave less than `MIN_SEGMENT_SECS` of duration is rejected outright. An
/// end within rounding distance of the floor is snapped onto it.
pub fn resize(seg: &mut Segment, new_start: f64, new_end: f64) -> Result<(), EditError> {
    let start = new_start.max(0.0);
    let floor = start + MIN_SEGMENT_SECS;
    if !(new_end >= floor - DURATION_EPSILON) {
        return Err(EditError::InvalidRange {
            value: new_end,
            lo: floor,
            hi: f64::INFINITY,
        });
    }
    seg.start = start;
    seg.end = new_end.max(floor);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Segment;

    #[test]
    fn split_partitions_range_exactly() {
        let seg = Segment::new(2.0, 10.0, "one two three four");
        let (a, b) = split_segment(&seg, 6.0).unwrap();
        assert_eq!((a.start, a.end), (2.0, 6.0));
        assert_eq!((b.start, b.end), (6.0, 10.0));
        assert_eq!(a.id, seg.id);
        assert_ne!(b.id, seg.id);
    }

    #[test]
    fn split_text_reconstructs_original() {
        // Partition point is a heuristic; only the reconstruction law holds.
        let mut seg = Segment::new(0.0, 10.0, "the quick brown fox jumps");
        seg.translated_text = "敏捷的棕色狐狸".into();
        let (a, b) = split_segment(&seg, 4.0).unwrap();
        assert_eq!(
            text::join_parts([a.source_text.as_str(), b.source_text.as_str()]),
            seg.source_text
        );
        assert_eq!(
            text::join_parts([a.translated_text.as_str(), b.translated_text.as_str()]),
            seg.translated_text
        );
        // Blank override fields stay blank on both halves.
        assert!(a.user_text.is_empty() && b.user_text.is_empty());
    }

    #[test]
    fn split_rejects_cut_outside_or_too_close() {
        let seg = Segment::new(1.0, 2.0, "x");
        assert!(split_segment(&seg, 0.5).is_err());
        assert!(split_segment(&seg, 2.5).is_err());
        assert!(split_segment(&seg, 1.0).is_err()); // not strictly inside
        assert!(split_segment(&seg, 1.01).is_err()); // first half below floor
        assert!(split_segment(&seg, 1.5).is_ok());
    }

    #[test]
    fn merge_spans_and_joins() {
        let run = vec![Segment::new(0.0, 5.0, "a"), Segment::new(5.0, 10.0, "b")];
        let merged = merge_segments(&run).unwrap();
        assert_eq!((merged.start, merged.end), (0.0, 10.0));
        assert_eq!(merged.source_text, "a b");
        assert_eq!(merged.id, run[0].id);
    }

    #[test]
    fn merge_dense_text_without_separator() {
        let mut a = Segment::new(0.0, 1.0, "");
        let mut b = Segment::new(1.0, 2.0, "");
        a.translated_text = "你好".into();
        b.translated_text = "世界".into();
        let merged = merge_segments(&[a, b]).unwrap();
        assert_eq!(merged.translated_text, "你好世界");
    }

    #[test]
    fn merge_rejects_single_segment() {
        let run = vec![Segment::new(0.0, 1.0, "a")];
        assert_eq!(merge_segments(&run), Err(EditError::NotContiguous));
    }

    #[test]
    fn merge_inverts_split_times_exactly() {
        let seg = Segment::new(3.0, 9.0, "alpha beta gamma");
        let (a, b) = split_segment(&seg, 5.0).unwrap();
        let merged = merge_segments(&[a, b]).unwrap();
        assert_eq!((merged.start, merged.end), (seg.start, seg.end));
        assert_eq!(merged.source_text, seg.source_text);
    }

    #[test]
    fn resize_clamps_start_and_enforces_floor() {
        let mut seg = Segment::new(1.0, 2.0, "x");
        resize(&mut seg, -0.5, 1.5).unwrap();
        assert_eq!((seg.start, seg.end), (0.0, 1.5));
        let err = resize(&mut seg, 1.0, 1.0);
        assert!(matches!(err, Err(EditError::InvalidRange { .. })));
        // Rejected resize must leave the segment untouched.
        assert_eq!((seg.start, seg.end), (0.0, 1.5));
    }

    #[test]
    fn resize_exactly_at_the_floor_survives_float_rounding() {
        // 6.0 + 0.05 − 6.0 is one ulp below 0.05; the floor must hold anyway.
        let mut seg = Segment::new(5.0, 10.0, "x");
        resize(&mut seg, 6.0, 6.0 + MIN_SEGMENT_SECS).unwrap();
        assert!(seg.duration() >= MIN_SEGMENT_SECS - 1e-9);
        // And one full epsilon-past-rejection below the floor still fails.
        assert!(resize(&mut seg, 6.0, 6.0 + MIN_SEGMENT_SECS / 2.0).is_err());
    }
}
