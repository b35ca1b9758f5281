//! The conversation manager.
//!
//! A conversation moves from "does not exist" to "exists" exactly once, the first time either participant resolves
//! it. After that it is never modified; messages are only ever appended.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Conversation, ConversationId, Message, NewMessage, UserId},
    events::{ConversationCreatedEvent, EventProducers, MessageSentEvent, MessageSubscription},
    ssw_api::conversation_objects::{ConversationList, ConversationSummary, SendOutcome, SendRejection},
    traits::{ConversationError, ConversationManagement, IdentityProvider, MessageFeed, ProfileManagement},
};

pub struct ConversationManager<B> {
    db: B,
    producers: EventProducers,
}

impl<B: Debug> Debug for ConversationManager<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConversationManager ({:?})", self.db)
    }
}

impl<B> ConversationManager<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> ConversationManager<B>
where B: ConversationManagement
{
    /// Returns the id of the conversation between `a` and `b`, creating it if there is none.
    ///
    /// The lookup and the creation are separate store calls. Two callers resolving the same new pair at the same time
    /// can therefore both create a conversation. Called one after the other, `resolve_or_create(a, b)` and
    /// `resolve_or_create(b, a)` always return the same id.
    pub async fn resolve_or_create(&self, a: &UserId, b: &UserId) -> Result<ConversationId, ConversationError> {
        if a == b {
            return Err(ConversationError::SelfConversation(a.clone()));
        }
        let existing = self.db.fetch_conversations_for_user(a).await?;
        if let Some(conversation) = existing.into_iter().find(|c| c.is_between(a, b)) {
            trace!("💬️ Found existing conversation {} between {a} and {b}", conversation.id);
            return Ok(conversation.id);
        }
        let conversation = self.db.insert_conversation(a, b).await?;
        info!("💬️ New conversation {} started between {a} and {b}", conversation.id);
        let id = conversation.id.clone();
        self.call_conversation_created_hook(conversation).await;
        Ok(id)
    }

    /// Resolves (or creates) the conversation between the signed-in user and `other`.
    pub async fn start_conversation<I: IdentityProvider>(
        &self,
        identity: &I,
        other: &UserId,
    ) -> Result<ConversationId, ConversationError> {
        let me = identity.current_user_id().ok_or(ConversationError::NotAuthenticated)?;
        self.resolve_or_create(&me, other).await
    }

    pub async fn conversation(&self, id: &ConversationId) -> Result<Conversation, ConversationError> {
        self.db.fetch_conversation(id).await?.ok_or_else(|| ConversationError::ConversationNotFound(id.clone()))
    }

    /// Fetches the conversation and checks that `user` takes part in it.
    pub async fn conversation_for_participant(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Conversation, ConversationError> {
        let conversation = self.conversation(id).await?;
        if !conversation.includes(user) {
            return Err(ConversationError::SenderNotParticipant { conversation: id.clone(), sender: user.clone() });
        }
        Ok(conversation)
    }

    /// Posts a message.
    ///
    /// Text that is empty after trimming is rejected without touching the store. Otherwise the text is stored as
    /// given, and the store assigns the id and timestamp. Live subscribers pick the message up from the change feed;
    /// the returned message is for the caller's convenience only.
    pub async fn send(
        &self,
        conversation_id: &ConversationId,
        sender: &UserId,
        text: &str,
    ) -> Result<SendOutcome, ConversationError> {
        if text.trim().is_empty() {
            debug!("💬️ Empty message from {sender} to {conversation_id} rejected");
            return Ok(SendOutcome::Rejected(SendRejection::EmptyText));
        }
        self.conversation_for_participant(conversation_id, sender).await?;
        let message = self.db.append_message(NewMessage::new(conversation_id.clone(), sender.clone(), text)).await?;
        debug!("💬️ Message {} sent to {conversation_id} by {sender}", message.id);
        self.call_message_sent_hook(&message).await;
        Ok(SendOutcome::Sent(message))
    }

    async fn call_conversation_created_hook(&self, conversation: Conversation) {
        for emitter in &self.producers.conversation_created_producer {
            debug!("💬️ Notifying conversation created hook subscribers");
            emitter.publish_event(ConversationCreatedEvent::new(conversation.clone())).await;
        }
    }

    async fn call_message_sent_hook(&self, message: &Message) {
        for emitter in &self.producers.message_sent_producer {
            trace!("💬️ Notifying message sent hook subscribers");
            emitter.publish_event(MessageSentEvent::new(message.clone())).await;
        }
    }
}

impl<B> ConversationManager<B>
where B: ConversationManagement + ProfileManagement
{
    /// Every conversation `user` takes part in, each paired with the other participant's profile.
    ///
    /// Conversations whose other participant has no profile are left out. No conversation is marked active; use
    /// [`ConversationList::with_active`] to apply the selection rule.
    pub async fn list_conversations(&self, user: &UserId) -> Result<ConversationList, ConversationError> {
        let conversations = self.db.fetch_conversations_for_user(user).await?;
        let mut entries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let Some(other) = conversation.other_participant(user).cloned() else {
                warn!("💬️ Conversation {} was returned for {user}, who is not a participant", conversation.id);
                continue;
            };
            match self.db.fetch_profile(&other).await? {
                Some(other_participant) => entries.push(ConversationSummary { conversation, other_participant }),
                None => warn!("💬️ No profile for {other} in conversation {}. Leaving it out.", conversation.id),
            }
        }
        debug!("💬️ {} conversations listed for {user}", entries.len());
        Ok(ConversationList::new(entries))
    }
}

impl<B> ConversationManager<B>
where B: ConversationManagement + MessageFeed
{
    /// Opens a live view of the conversation's messages.
    ///
    /// The subscription yields the full ordered message list straight away, and again after every change, until it is
    /// cancelled or dropped.
    pub async fn watch_messages(&self, id: &ConversationId) -> Result<MessageSubscription, ConversationError> {
        self.conversation(id).await?;
        Ok(self.db.subscribe_messages(id))
    }
}
