//! # SkillSwap engine public API
//!
//! The `ssw_api` module exposes the programmatic API of the engine. Each API is a thin struct wrapping a backend that
//! implements the backend traits it needs, so callers can pick the pieces they want and tests can substitute fakes.
//!
//! * [`profile_api`] manages profiles: signup, merge-updates, skills and certificates.
//! * [`match_api`] loads the viewer and the population and runs the matcher over them.
//! * [`conversation_api`] resolves conversations between pairs of users, sends messages and opens live message
//!   subscriptions.
//!
//! # API usage
//!
//! ```rust,ignore
//! use skillswap_engine::{ConversationManager, SqliteDatabase, events::EventProducers};
//! let db = SqliteDatabase::new_with_url("sqlite://data/skillswap.db", 5).await?;
//! let conversations = ConversationManager::new(db, EventProducers::default());
//! let id = conversations.resolve_or_create(&alice, &bob).await?;
//! let mut timeline = conversations.watch_messages(&id).await?;
//! conversations.send(&id, &alice, "Hi Bob!").await?;
//! ```
pub mod conversation_api;
pub mod conversation_objects;
pub mod match_api;
pub mod profile_api;
