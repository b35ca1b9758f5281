//! # Backend interface contracts
//!
//! This module defines the behaviour that a document store *backend* must expose to be used by the SkillSwap engine,
//! plus the identity provider seam.
//!
//! ## Profiles
//! A profile is the public record of a user: who they are, what they can teach and what they want to learn. Profiles
//! are keyed by the stable user id issued by the identity provider.
//!
//! ## Conversations
//! A conversation is a 1:1 channel between two users. Messages are appended to a conversation and are never edited
//! or deleted. Every append is announced on a change feed so that live subscribers receive a fresh snapshot.
//!
//! ## Traits
//! * [`ProfileManagement`] covers point reads, bulk reads and merge-writes of profiles.
//! * [`ConversationManagement`] covers conversation creation and lookup, and message appends and reads.
//! * [`MessageFeed`] hands out live, cancellable message subscriptions.
//! * [`IdentityProvider`] answers "who is the current user?". It is supplied by the caller, never held globally.
mod conversation_management;
mod identity;
mod message_feed;
mod profile_management;

pub use conversation_management::{ConversationError, ConversationManagement};
pub use identity::{IdentityProvider, StaticIdentity};
pub use message_feed::MessageFeed;
pub use profile_management::{ProfileApiError, ProfileManagement};
