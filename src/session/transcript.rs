//! Append-only call transcript

use super::ids::EntryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who spoke an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Agent,
    Caller,
}

/// One utterance in the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(id: EntryId, author: Author, text: impl Into<String>) -> Self {
        Self {
            id,
            author,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Ordered log of a call's utterances
///
/// Entries can only be appended; ids must be strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub(super) fn push(&mut self, entry: TranscriptEntry) {
        debug_assert!(
            self.last().is_none_or(|last| last.id < entry.id),
            "transcript ids must be strictly increasing"
        );
        self.entries.push(entry);
    }

    /// True when no caller entry directly follows another caller entry
    pub fn turns_alternate(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| !(pair[0].author == Author::Caller && pair[1].author == Author::Caller))
    }
}
