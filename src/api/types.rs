//! API request and response types

use crate::session::{CallPhase, CallSnapshot, EntryId, IgnoreReason};
use serde::{Deserialize, Serialize};

/// Request to submit a caller utterance
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

/// Response carrying the current call
#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub call: CallSnapshot,
}

/// Response for a submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub accepted: bool,
    /// Id of the recorded caller entry when the submission was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_entry: Option<EntryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_reason: Option<IgnoredReason>,
    pub call: CallSnapshot,
}

/// Wire form of [`IgnoreReason`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IgnoredReason {
    NotActive { phase: CallPhase },
    EmptyUtterance,
}

impl From<IgnoreReason> for IgnoredReason {
    fn from(reason: IgnoreReason) -> Self {
        match reason {
            IgnoreReason::NotActive(phase) => IgnoredReason::NotActive { phase },
            IgnoreReason::EmptyUtterance => IgnoredReason::EmptyUtterance,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
