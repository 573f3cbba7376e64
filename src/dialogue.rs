//! Dialogue collaborator boundary
//!
//! The call controller consumes this interface without knowing how replies
//! are produced. Agent state is opaque to the controller apart from its
//! `mode` label.

mod intent;
mod receptionist;

#[cfg(test)]
pub mod testing;

pub use receptionist::Receptionist;
#[allow(unused_imports)] // Public API re-exports
pub use receptionist::ReceptionistState;

use crate::profile::BusinessProfile;
use async_trait::async_trait;
use thiserror::Error;

/// Mode value with which a collaborator ends the call
pub const ENDED_MODE: &str = "ended";

/// The only view of agent state the controller is allowed
pub trait AgentStateView {
    fn mode(&self) -> &str;

    fn is_ended(&self) -> bool {
        self.mode() == ENDED_MODE
    }
}

/// Replies produced for one caller utterance
#[derive(Debug, Clone)]
pub struct AgentReply<S> {
    pub replies: Vec<String>,
    pub state: S,
}

impl<S> AgentReply<S> {
    pub fn new(replies: Vec<String>, state: S) -> Self {
        Self { replies, state }
    }
}

/// Collaborator failure with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DialogueError {
    pub kind: DialogueErrorKind,
    pub message: String,
}

impl DialogueError {
    pub fn new(kind: DialogueErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::Unavailable, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(DialogueErrorKind::InvalidState, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueErrorKind {
    /// Backend could not be reached or produced nothing
    Unavailable,
    /// The supplied agent state was not one this collaborator produced
    InvalidState,
}

/// Turns caller utterances into agent replies
#[async_trait]
pub trait DialogueCollaborator: Send + Sync {
    type State: AgentStateView + Clone + Send + Sync + std::fmt::Debug;

    /// Greeting spoken when the call connects. Pure in `profile`.
    fn opening_line(&self, profile: &BusinessProfile) -> String;

    /// Fresh state for a new call
    fn initial_state(&self) -> Self::State;

    /// Produce replies for a non-blank caller utterance
    async fn agent_reply(
        &self,
        utterance: &str,
        state: &Self::State,
        profile: &BusinessProfile,
    ) -> Result<AgentReply<Self::State>, DialogueError>;
}
