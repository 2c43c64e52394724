use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackVerdict {
    Positive,
    Negative,
}

/// Lifecycle of a verdict: set optimistically, then either confirmed by the
/// server or reverted on failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackState {
    Pending(FeedbackVerdict),
    Confirmed(FeedbackVerdict),
}

/// At-most-once feedback per message.
///
/// A slot is occupied from the moment a verdict is submitted (optimistic
/// set), which also rejects a second submission racing the first round
/// trip. A confirmed verdict is immutable for the session — no edit, no
/// retraction. Only a revert (network failure) re-opens the slot.
pub struct FeedbackTracker {
    entries: HashMap<String, FeedbackState>,
}

impl FeedbackTracker {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Optimistically claim the slot for a message. Returns false if a
    /// verdict is already pending or confirmed.
    pub fn begin(&mut self, message_id: &str, verdict: FeedbackVerdict) -> bool {
        if self.entries.contains_key(message_id) {
            return false;
        }
        self.entries
            .insert(message_id.to_string(), FeedbackState::Pending(verdict));
        true
    }

    /// Mark a pending verdict as durably recorded.
    pub fn confirm(&mut self, message_id: &str) {
        if let Some(state) = self.entries.get_mut(message_id)
            && let FeedbackState::Pending(verdict) = *state
        {
            *state = FeedbackState::Confirmed(verdict);
        }
    }

    /// Roll a pending verdict back to "no feedback". Confirmed verdicts are
    /// untouched.
    pub fn revert(&mut self, message_id: &str) {
        if matches!(self.entries.get(message_id), Some(FeedbackState::Pending(_))) {
            self.entries.remove(message_id);
        }
    }

    pub fn verdict(&self, message_id: &str) -> Option<FeedbackVerdict> {
        self.entries.get(message_id).map(|state| match state {
            FeedbackState::Pending(v) | FeedbackState::Confirmed(v) => *v,
        })
    }

    pub fn is_set(&self, message_id: &str) -> bool {
        self.entries.contains_key(message_id)
    }
}

impl Default for FeedbackTracker {
    fn default() -> Self {
        Self::new()
    }
}
