//! Mock collaborators for controller tests

use super::{AgentReply, AgentStateView, DialogueCollaborator, DialogueError};
use crate::profile::BusinessProfile;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Minimal agent state carrying only a mode label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockState {
    pub mode: String,
}

impl MockState {
    pub fn new(mode: impl Into<String>) -> Self {
        Self { mode: mode.into() }
    }
}

impl AgentStateView for MockState {
    fn mode(&self) -> &str {
        &self.mode
    }
}

/// Collaborator that returns queued responses and records every call
pub struct MockCollaborator {
    responses: Mutex<VecDeque<Result<AgentReply<MockState>, DialogueError>>>,
    /// Utterances passed to `agent_reply`
    pub utterances: Mutex<Vec<String>>,
    /// States passed to `agent_reply`
    pub states_seen: Mutex<Vec<MockState>>,
    pub opening_calls: Mutex<u32>,
    pub initial_state_calls: Mutex<u32>,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            utterances: Mutex::new(Vec::new()),
            states_seen: Mutex::new(Vec::new()),
            opening_calls: Mutex::new(0),
            initial_state_calls: Mutex::new(0),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, replies: &[&str], mode: &str) {
        self.responses.lock().unwrap().push_back(Ok(AgentReply::new(
            replies.iter().map(ToString::to_string).collect(),
            MockState::new(mode),
        )));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: DialogueError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_utterances(&self) -> Vec<String> {
        self.utterances.lock().unwrap().clone()
    }

    pub fn reply_calls(&self) -> usize {
        self.utterances.lock().unwrap().len()
    }
}

impl Default for MockCollaborator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogueCollaborator for MockCollaborator {
    type State = MockState;

    fn opening_line(&self, profile: &BusinessProfile) -> String {
        *self.opening_calls.lock().unwrap() += 1;
        format!("Hello, you've reached {}.", profile.name)
    }

    fn initial_state(&self) -> MockState {
        *self.initial_state_calls.lock().unwrap() += 1;
        MockState::new("active")
    }

    async fn agent_reply(
        &self,
        utterance: &str,
        state: &MockState,
        _profile: &BusinessProfile,
    ) -> Result<AgentReply<MockState>, DialogueError> {
        self.utterances.lock().unwrap().push(utterance.to_string());
        self.states_seen.lock().unwrap().push(state.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DialogueError::unavailable("No mock reply queued")))
    }
}

/// Collaborator whose reply count and mode are derived from the utterance
///
/// Replies one to three times depending on utterance length; an utterance
/// containing "bye" ends the call. Used by property tests.
#[derive(Debug, Default)]
pub struct EchoCollaborator;

#[async_trait]
impl DialogueCollaborator for EchoCollaborator {
    type State = MockState;

    fn opening_line(&self, profile: &BusinessProfile) -> String {
        format!("{} speaking", profile.name)
    }

    fn initial_state(&self) -> MockState {
        MockState::new("active")
    }

    async fn agent_reply(
        &self,
        utterance: &str,
        _state: &MockState,
        _profile: &BusinessProfile,
    ) -> Result<AgentReply<MockState>, DialogueError> {
        let replies = (0..=utterance.len() % 3)
            .map(|i| format!("echo {i}: {utterance}"))
            .collect();
        let mode = if utterance.contains("bye") { "ended" } else { "active" };
        Ok(AgentReply::new(replies, MockState::new(mode)))
    }
}
