//! SkillSwap Engine
//!
//! SkillSwap lets people list the skills they can teach and the skills they want to learn, finds reciprocal matches
//! between them, and lets matched users talk to each other. This library holds the core logic. It knows nothing
//! about HTTP or about how users sign in.
//!
//! The library is divided into these sections:
//! 1. Backend contracts ([`mod@traits`]) and the SQLite backend that implements them ([`SqliteDatabase`]). You should
//!    not need to call the database directly; use the APIs instead. The data types stored in the database are defined
//!    in [`mod@db_types`] and are public.
//! 2. The matcher ([`mod@matcher`]), a pure function that ranks a population of profiles against a viewer.
//! 3. The public APIs: [`ProfileApi`], [`MatchApi`] and [`ConversationManager`]. Each one is generic over the backend
//!    traits it needs.
//!
//! Message timelines are pushed through a change feed as full snapshots (see [`events::MessageSubscription`]). The
//! engine also emits events when conversations are created and messages are sent, which you can hook into with
//! [`events::EventHooks`].
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod matcher;
mod ssw_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use ssw_api::{
    conversation_api::ConversationManager,
    conversation_objects,
    match_api::{MatchApi, MatchApiError},
    profile_api::ProfileApi,
};
