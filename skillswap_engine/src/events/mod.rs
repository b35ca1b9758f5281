//! Engine events.
//!
//! Two mechanisms live here:
//! * The change feed ([`ChangeFeed`], [`MessageSubscription`]), which drives live message timelines. Subscribers
//!   always receive full snapshots, never deltas.
//! * Event hooks ([`EventHooks`]), a stateless pub-sub system that lets callers react to conversations being created
//!   and messages being sent, e.g. to send notifications.
mod channel;
mod event_types;
mod feed;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use feed::{ChangeFeed, FeedChange, FeedError, MessageSubscription, DEFAULT_FEED_CAPACITY};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
