// crates/lingloop-core/src/error.rs
//
// Typed edit errors. Every validation failure is rejected *before* any
// mutation or history commit — operations are all-or-nothing. Undo/redo at a
// stack boundary is deliberately not here: that is a silent no-op, not an
// error the user ever sees.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// A time landed outside the range an operation accepts — a cut outside
    /// its segment, or a resize that would collapse below the minimum
    /// duration floor.
    #[error("time {value:.3}s outside valid range {lo:.3}s..{hi:.3}s")]
    InvalidRange { value: f64, lo: f64, hi: f64 },

    /// Merge invoked on indices that do not form one contiguous ascending
    /// run of length ≥ 2. Callers should surface a corrective prompt rather
    /// than silently reshaping the selection.
    #[error("merge selection is not a contiguous run of two or more segments")]
    NotContiguous,

    /// An operation that needs an active segment was invoked with none.
    #[error("no segment selected")]
    EmptySelection,
}
