use crate::{db_types::ConversationId, events::MessageSubscription};

/// Backends that can push message changes implement `MessageFeed`.
pub trait MessageFeed {
    /// Opens a live subscription to the conversation's messages.
    ///
    /// The subscription first yields the current ordered snapshot, then a fresh full snapshot after every change. It
    /// stays open until cancelled or dropped.
    fn subscribe_messages(&self, id: &ConversationId) -> MessageSubscription;
}
