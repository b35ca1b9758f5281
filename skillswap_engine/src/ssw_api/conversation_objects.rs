use serde::{Deserialize, Serialize};

use crate::db_types::{Conversation, ConversationId, Message, Profile};

/// A conversation together with the profile of the participant on the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub other_participant: Profile,
}

impl ConversationSummary {
    pub fn id(&self) -> &ConversationId {
        &self.conversation.id
    }
}

/// A user's conversations, plus which one is currently active (selected).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationList {
    pub entries: Vec<ConversationSummary>,
    pub active: Option<ConversationId>,
}

impl ConversationList {
    pub fn new(entries: Vec<ConversationSummary>) -> Self {
        Self { entries, active: None }
    }

    /// Keeps `current` as the active conversation if there is one. Otherwise the first conversation in the list is
    /// selected, if the list is not empty.
    pub fn with_active(mut self, current: Option<ConversationId>) -> Self {
        self.active = current.or_else(|| self.entries.first().map(|e| e.id().clone()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendRejection {
    /// The text was empty once surrounding whitespace was removed.
    EmptyText,
}

/// The result of a send that reached validation. Rejections are not errors: nothing was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent(Message),
    Rejected(SendRejection),
}

impl SendOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            SendOutcome::Sent(m) => Some(m),
            SendOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SendOutcome::Rejected(_))
    }
}
