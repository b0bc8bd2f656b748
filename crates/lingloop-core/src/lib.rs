// crates/lingloop-core/src/lib.rs
//
// Pure session data and pure timeline algorithms — no clock handles, no
// collaborator traits, no I/O. Everything here is serializable via serde and
// shared between lingloop-engine and any future consumers (exporters, CLIs).

pub mod commands;
pub mod error;
pub mod helpers;
pub mod history;
pub mod state;
pub mod timeline;

pub use commands::StudyCommand;
pub use error::EditError;
pub use history::HistoryStack;
pub use state::{HistoryFocus, LoopConfig, PlaybackFlags, Repeat, Segment, SessionState};
