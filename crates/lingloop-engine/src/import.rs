// crates/lingloop-engine/src/import.rs
//
// Seeding a session from collaborator output: transcription results
// (start/end/text triples, the shape the speech recognizer emits), saved
// subtitle JSON (full seven-field records), and plain text lines for the
// manual-timing workflow.

use log::warn;
use serde::Deserialize;

use lingloop_core::state::{Segment, MIN_SEGMENT_SECS};

/// One line of recognizer output.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptLine {
    pub start: f64,
    pub end:   f64,
    pub text:  String,
}

/// Build a timeline from recognizer output. Inverted or sub-minimum ranges
/// are dropped with a warning — recognizers occasionally emit zero-length
/// fragments at silence boundaries, and the engine's invariants reject them
/// everywhere else anyway.
pub fn timeline_from_transcript(lines: &[TranscriptLine]) -> Vec<Segment> {
    lines
        .iter()
        .filter(|l| {
            let ok = l.end >= l.start + MIN_SEGMENT_SECS;
            if !ok {
                warn!(
                    "[import] dropping degenerate transcript line {:.3}..{:.3} {:?}",
                    l.start, l.end, l.text
                );
            }
            ok
        })
        .map(|l| Segment::new(l.start, l.end, l.text.trim()))
        .collect()
}

/// Parse saved subtitle JSON (an array of seven-field records). Runtime ids
/// are regenerated; the wire format never carries them.
pub fn timeline_from_json(json: &str) -> serde_json::Result<Vec<Segment>> {
    serde_json::from_str(json)
}

/// Non-blank lines of a pasted text, in order — the seed for
/// `ManualTimer`-driven sequential timestamping.
pub fn lines_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}
