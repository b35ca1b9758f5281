use thiserror::Error;

use crate::{
    db_types::{Conversation, ConversationId, Message, NewMessage, UserId},
    events::FeedError,
    traits::ProfileApiError,
};

#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Conversation {0} does not exist")]
    ConversationNotFound(ConversationId),
    #[error("User {sender} is not a participant in conversation {conversation}")]
    SenderNotParticipant { conversation: ConversationId, sender: UserId },
    #[error("User {0} cannot start a conversation with themselves")]
    SelfConversation(UserId),
    #[error("No user is signed in")]
    NotAuthenticated,
    #[error("Stored conversation record is corrupt: {0}")]
    CorruptRecord(String),
    #[error("{0}")]
    FeedError(#[from] FeedError),
}

impl From<sqlx::Error> for ConversationError {
    fn from(e: sqlx::Error) -> Self {
        ConversationError::DatabaseError(e.to_string())
    }
}

impl From<ProfileApiError> for ConversationError {
    fn from(e: ProfileApiError) -> Self {
        ConversationError::DatabaseError(e.to_string())
    }
}

/// The `ConversationManagement` trait defines the conversation and message operations a backend must support.
///
/// Conversations are created once and never edited. Messages are append-only.
#[allow(async_fn_in_trait)]
pub trait ConversationManagement {
    /// Fetches every conversation that `user` participates in, in creation order.
    async fn fetch_conversations_for_user(&self, user: &UserId) -> Result<Vec<Conversation>, ConversationError>;

    /// Fetches a single conversation. If it does not exist, `None` is returned.
    async fn fetch_conversation(&self, id: &ConversationId) -> Result<Option<Conversation>, ConversationError>;

    /// Creates a new conversation between `a` and `b` with a store-assigned id and creation time.
    ///
    /// This does *not* check whether a conversation between the pair already exists.
    async fn insert_conversation(&self, a: &UserId, b: &UserId) -> Result<Conversation, ConversationError>;

    /// Appends a message to its conversation. The store assigns the id and the timestamp, and announces the change on
    /// the change feed once the write is committed.
    ///
    /// Timestamps are non-decreasing per conversation in the order messages are accepted.
    async fn append_message(&self, message: NewMessage) -> Result<Message, ConversationError>;

    /// The current messages of the conversation, ordered by timestamp, then by write order.
    async fn fetch_messages(&self, id: &ConversationId) -> Result<Vec<Message>, ConversationError>;
}
