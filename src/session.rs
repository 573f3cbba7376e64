//! Call session lifecycle
//!
//! A single controller owns the live call: its phase, its transcript and
//! the opaque dialogue state. Phases move `NotStarted -> Active -> Ended`;
//! `start` and `reset` may be called from anywhere.

mod controller;
mod ids;
mod state;
mod transcript;

#[cfg(test)]
mod proptests;

pub use controller::{CallController, IgnoreReason, SubmitOutcome};
#[allow(unused_imports)] // Public API re-exports
pub use ids::{EntryId, IdGenerator, SequentialIds};
pub use state::{CallPhase, CallSnapshot};
#[allow(unused_imports)]
pub use state::CallSession;
#[allow(unused_imports)]
pub use transcript::{Author, Transcript, TranscriptEntry};
