use serde::{Deserialize, Serialize};

use crate::db_types::{Conversation, Message};

/// Emitted when a conversation is created for a pair that had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationCreatedEvent {
    pub conversation: Conversation,
}

impl ConversationCreatedEvent {
    pub fn new(conversation: Conversation) -> Self {
        Self { conversation }
    }
}

/// Emitted after a message has been accepted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSentEvent {
    pub message: Message,
}

impl MessageSentEvent {
    pub fn new(message: Message) -> Self {
        Self { message }
    }
}
