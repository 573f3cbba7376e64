//! Call session types

use super::transcript::{Transcript, TranscriptEntry};
use crate::profile::BusinessProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Coarse lifecycle stage of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    #[default]
    NotStarted,
    Active,
    Ended,
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallPhase::NotStarted => "not_started",
            CallPhase::Active => "active",
            CallPhase::Ended => "ended",
        };
        f.write_str(label)
    }
}

/// A started call
///
/// Only exists once `start()` has run, so it always holds at least the
/// opening line and its phase is `Active` or `Ended`.
#[derive(Debug, Clone)]
pub struct CallSession<S> {
    pub(super) call_id: Uuid,
    pub(super) started_at: DateTime<Utc>,
    pub(super) phase: CallPhase,
    pub(super) transcript: Transcript,
    pub(super) agent_state: S,
    /// Profile snapshot taken at `start()`; edits apply to the next call
    pub(super) profile: Arc<BusinessProfile>,
}

impl<S> CallSession<S> {
    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    #[allow(dead_code)] // Used by property tests
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[allow(dead_code)] // API completeness
    pub fn profile(&self) -> &BusinessProfile {
        &self.profile
    }
}

/// Owned view of the call for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSnapshot {
    pub call_id: Option<Uuid>,
    pub phase: CallPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_mode: Option<String>,
    pub transcript: Vec<TranscriptEntry>,
}

impl CallSnapshot {
    pub fn not_started() -> Self {
        Self {
            call_id: None,
            phase: CallPhase::NotStarted,
            started_at: None,
            agent_mode: None,
            transcript: Vec::new(),
        }
    }
}
