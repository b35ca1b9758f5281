//! The message change feed.
//!
//! The store announces every committed append on a [`ChangeFeed`]. Announcements carry only the id of the conversation
//! that changed. A [`MessageSubscription`] listens for announcements about one conversation and re-reads the full,
//! ordered message list each time one arrives, so subscribers only ever see complete snapshots.
//!
//! The first item a subscription yields is the snapshot at the time of subscribing. Because the broadcast receiver is
//! registered before that first read, no append can slip between the snapshot and the start of the live feed.
use std::{
    fmt::Debug,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::{
    stream::{self, BoxStream},
    Stream,
    StreamExt,
};
use log::*;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::db_types::{ConversationId, Message};

pub const DEFAULT_FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Could not read the current message snapshot. {0}")]
    SnapshotFailed(String),
    #[error("The change feed has shut down")]
    Closed,
}

impl From<sqlx::Error> for FeedError {
    fn from(e: sqlx::Error) -> Self {
        FeedError::SnapshotFailed(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedChange {
    pub conversation_id: ConversationId,
}

#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<FeedChange>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChangeFeed ({} subscribers)", self.sender.receiver_count())
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Tells every live subscription that `conversation_id` has new messages.
    pub fn announce(&self, conversation_id: &ConversationId) {
        let change = FeedChange { conversation_id: conversation_id.clone() };
        // A send error only means nobody is listening right now.
        match self.sender.send(change) {
            Ok(n) => trace!("📡️ Change to conversation {conversation_id} announced to {n} subscriber(s)"),
            Err(_) => trace!("📡️ Change to conversation {conversation_id} announced, but nobody is listening"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Opens a subscription for `conversation_id`. `fetch` is called for the initial snapshot and again after each
    /// announced change.
    pub fn subscribe<F, Fut>(&self, conversation_id: ConversationId, fetch: F) -> MessageSubscription
    where
        F: Fn(ConversationId) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Message>, FeedError>> + Send + 'static,
    {
        let receiver = self.sender.subscribe();
        debug!("📡️ New subscription to conversation {conversation_id}");
        let state = FeedState { conversation_id: conversation_id.clone(), receiver, fetch, primed: false, done: false };
        let inner = stream::unfold(state, next_snapshot).boxed();
        MessageSubscription { conversation_id, inner: Some(inner) }
    }
}

struct FeedState<F> {
    conversation_id: ConversationId,
    receiver: broadcast::Receiver<FeedChange>,
    fetch: F,
    primed: bool,
    done: bool,
}

impl<F> FeedState<F> {
    /// Waits for the next change that concerns this conversation. Returns `false` if the feed has closed.
    async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.conversation_id == self.conversation_id => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(n)) => {
                    warn!("📡️ Subscription to {} lagged by {n} changes. Refreshing snapshot.", self.conversation_id);
                    break;
                },
                Err(RecvError::Closed) => return false,
            }
        }
        // The next snapshot covers anything already queued, so drain it.
        loop {
            match self.receiver.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        true
    }
}

async fn next_snapshot<F, Fut>(mut state: FeedState<F>) -> Option<(Result<Vec<Message>, FeedError>, FeedState<F>)>
where
    F: Fn(ConversationId) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<Message>, FeedError>> + Send + 'static,
{
    if state.done {
        return None;
    }
    if state.primed && !state.wait_for_change().await {
        debug!("📡️ Change feed closed. Ending subscription to {}", state.conversation_id);
        state.done = true;
        return Some((Err(FeedError::Closed), state));
    }
    state.primed = true;
    match (state.fetch)(state.conversation_id.clone()).await {
        Ok(messages) => {
            trace!("📡️ Delivering snapshot of {} messages for {}", messages.len(), state.conversation_id);
            Some((Ok(messages), state))
        },
        Err(e) => {
            error!("📡️ Subscription to {} failed. {e}", state.conversation_id);
            state.done = true;
            Some((Err(e), state))
        },
    }
}

/// A live, cancellable view of one conversation's messages.
///
/// Each item is the complete message list in display order. Dropping the subscription cancels it.
pub struct MessageSubscription {
    conversation_id: ConversationId,
    inner: Option<BoxStream<'static, Result<Vec<Message>, FeedError>>>,
}

impl Debug for MessageSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.inner.is_some() { "live" } else { "cancelled" };
        write!(f, "MessageSubscription({}, {state})", self.conversation_id)
    }
}

impl MessageSubscription {
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Stops delivery and releases the feed receiver. Calling this more than once has no further effect.
    pub fn cancel(&mut self) {
        if self.inner.take().is_some() {
            debug!("📡️ Subscription to {} cancelled", self.conversation_id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_none()
    }
}

impl Stream for MessageSubscription {
    type Item = Result<Vec<Message>, FeedError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.as_mut() {
            Some(inner) => inner.poll_next_unpin(cx),
            None => Poll::Ready(None),
        }
    }
}

impl Drop for MessageSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
