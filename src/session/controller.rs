//! Call session controller
//!
//! Sole writer of call state. Every operation is total: requests that make
//! no sense in the current phase are ignored and reported as such, never
//! raised as errors.

use super::ids::{EntryId, IdGenerator};
use super::state::{CallPhase, CallSession, CallSnapshot};
use super::transcript::{Author, Transcript, TranscriptEntry};
use crate::dialogue::{AgentReply, AgentStateView, DialogueCollaborator, DialogueError};
use crate::profile::BusinessProfile;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Why a submission was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The call is not in the `Active` phase
    NotActive(CallPhase),
    /// The utterance was empty after trimming
    EmptyUtterance,
}

/// Result of `submit`
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nothing changed
    Ignored(IgnoreReason),
    /// A caller entry and the agent's replies were appended
    Accepted {
        caller_entry: EntryId,
        replies: usize,
        ended: bool,
    },
    /// The collaborator failed; nothing changed
    CollaboratorFailed(DialogueError),
}

impl SubmitOutcome {
    #[allow(dead_code)] // Used by tests
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// Owns the lifecycle and transcript of the single live call
pub struct CallController<D: DialogueCollaborator> {
    collaborator: Arc<D>,
    ids: Arc<dyn IdGenerator>,
    profile: Arc<BusinessProfile>,
    session: Option<CallSession<D::State>>,
}

impl<D: DialogueCollaborator> CallController<D> {
    pub fn new(collaborator: Arc<D>, ids: Arc<dyn IdGenerator>, profile: Arc<BusinessProfile>) -> Self {
        Self {
            collaborator,
            ids,
            profile,
            session: None,
        }
    }

    pub fn phase(&self) -> CallPhase {
        self.session
            .as_ref()
            .map_or(CallPhase::NotStarted, CallSession::phase)
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        match &self.session {
            Some(session) => session.transcript.entries(),
            None => &[],
        }
    }

    #[allow(dead_code)] // API completeness
    pub fn session(&self) -> Option<&CallSession<D::State>> {
        self.session.as_ref()
    }

    /// The collaborator's mode label for the live call
    #[allow(dead_code)] // API completeness
    pub fn agent_mode(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|session| session.agent_state.mode())
    }

    /// Replace the profile used from the next `start()` onwards
    pub fn set_profile(&mut self, profile: Arc<BusinessProfile>) {
        self.profile = profile;
    }

    pub fn snapshot(&self) -> CallSnapshot {
        match &self.session {
            None => CallSnapshot::not_started(),
            Some(session) => CallSnapshot {
                call_id: Some(session.call_id),
                phase: session.phase,
                started_at: Some(session.started_at),
                agent_mode: Some(session.agent_state.mode().to_string()),
                transcript: session.transcript.entries().to_vec(),
            },
        }
    }

    /// Begin a new call, discarding any previous one
    pub fn start(&mut self) -> Uuid {
        let previous = self.phase();
        let profile = Arc::clone(&self.profile);
        let agent_state = self.collaborator.initial_state();
        let opening = self.collaborator.opening_line(&profile);

        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::new(self.ids.next_id(), Author::Agent, opening));

        let call_id = Uuid::new_v4();
        self.session = Some(CallSession {
            call_id,
            started_at: Utc::now(),
            phase: CallPhase::Active,
            transcript,
            agent_state,
            profile,
        });

        if previous == CallPhase::NotStarted {
            tracing::info!(call_id = %call_id, "Call started");
        } else {
            tracing::info!(call_id = %call_id, previous_phase = %previous, "Call restarted");
        }
        call_id
    }

    /// Record a caller utterance and the agent's replies to it
    ///
    /// The caller entry and the replies are committed together once the
    /// collaborator has answered, so a failed turn leaves no trace.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let session = match self.session.as_mut() {
            Some(session) if session.phase == CallPhase::Active => session,
            other => {
                let phase = other.map_or(CallPhase::NotStarted, |s| s.phase);
                tracing::debug!(phase = %phase, "Ignoring submission outside an active call");
                return SubmitOutcome::Ignored(IgnoreReason::NotActive(phase));
            }
        };

        let utterance = text.trim();
        if utterance.is_empty() {
            tracing::debug!(call_id = %session.call_id, "Ignoring empty submission");
            return SubmitOutcome::Ignored(IgnoreReason::EmptyUtterance);
        }

        let reply = self
            .collaborator
            .agent_reply(utterance, &session.agent_state, &session.profile)
            .await;

        let AgentReply { replies, state } = match reply {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    call_id = %session.call_id,
                    kind = ?error.kind,
                    error = %error,
                    "Dialogue collaborator failed; turn discarded"
                );
                return SubmitOutcome::CollaboratorFailed(error);
            }
        };

        let caller_entry = self.ids.next_id();
        session
            .transcript
            .push(TranscriptEntry::new(caller_entry, Author::Caller, utterance));
        let reply_count = replies.len();
        for text in replies {
            session
                .transcript
                .push(TranscriptEntry::new(self.ids.next_id(), Author::Agent, text));
        }

        let ended = state.is_ended();
        session.agent_state = state;
        if ended {
            session.phase = CallPhase::Ended;
            tracing::info!(
                call_id = %session.call_id,
                entries = session.transcript.len(),
                "Call ended by agent"
            );
        } else {
            tracing::debug!(
                call_id = %session.call_id,
                entry_id = %caller_entry,
                replies = reply_count,
                mode = session.agent_state.mode(),
                "Turn recorded"
            );
        }

        SubmitOutcome::Accepted {
            caller_entry,
            replies: reply_count,
            ended,
        }
    }

    /// Drop the current call and return to `NotStarted`
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(call_id = %session.call_id, phase = %session.phase, "Call reset");
        }
    }
}
