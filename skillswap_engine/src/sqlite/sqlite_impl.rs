//! `SqliteDatabase` is a concrete implementation of a SkillSwap engine backend.
//!
//! It stores everything in SQLite and implements all the backend traits defined in the [`crate::traits`] module. It
//! also owns the [`ChangeFeed`] that message appends are announced on.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{conversations, db_url, messages, new_pool, profiles};
use crate::{
    db_types::{Conversation, ConversationId, Message, NewMessage, NewProfile, Profile, ProfileUpdate, UserId},
    events::{ChangeFeed, FeedError, MessageSubscription, DEFAULT_FEED_CAPACITY},
    traits::{ConversationError, ConversationManagement, MessageFeed, ProfileApiError, ProfileManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?}, {:?})", self.pool, self.feed)
    }
}

impl ProfileManagement for SqliteDatabase {
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, ProfileApiError> {
        let mut conn = self.pool.acquire().await?;
        let id = profile.id.clone();
        profiles::insert_new_profile(profile, &mut conn).await?.ok_or(ProfileApiError::ProfileAlreadyExists(id))
    }

    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, ProfileApiError> {
        let mut conn = self.pool.acquire().await?;
        profiles::fetch_profile(id, &mut conn).await
    }

    async fn fetch_profiles_except(&self, id: &UserId) -> Result<Vec<Profile>, ProfileApiError> {
        let mut conn = self.pool.acquire().await?;
        profiles::fetch_profiles_except(id, &mut conn).await
    }

    /// Reads the current record, merges the update into it, and writes it back in a single transaction.
    async fn upsert_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<Profile, ProfileApiError> {
        let mut tx = self.pool.begin().await?;
        let mut profile = match profiles::fetch_profile(id, &mut tx).await? {
            Some(p) => p,
            None => {
                debug!("🗃️ No profile for {id} yet. Creating one from the update.");
                let name = update.display_name.clone().unwrap_or_default();
                Profile::new_at_signup(NewProfile::new(id.clone(), name))
            },
        };
        update.apply_to(&mut profile);
        profiles::write_profile(&profile, true, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Profile for {id} updated");
        Ok(profile)
    }
}

impl ConversationManagement for SqliteDatabase {
    async fn fetch_conversations_for_user(&self, user: &UserId) -> Result<Vec<Conversation>, ConversationError> {
        let mut conn = self.pool.acquire().await?;
        conversations::fetch_conversations_for_user(user, &mut conn).await
    }

    async fn fetch_conversation(&self, id: &ConversationId) -> Result<Option<Conversation>, ConversationError> {
        let mut conn = self.pool.acquire().await?;
        conversations::fetch_conversation(id, &mut conn).await
    }

    async fn insert_conversation(&self, a: &UserId, b: &UserId) -> Result<Conversation, ConversationError> {
        let mut conn = self.pool.acquire().await?;
        conversations::insert_conversation(a, b, &mut conn).await
    }

    async fn append_message(&self, message: NewMessage) -> Result<Message, ConversationError> {
        let mut conn = self.pool.acquire().await?;
        let message = messages::append_message(message, &mut conn).await?;
        self.feed.announce(&message.conversation_id);
        Ok(message)
    }

    async fn fetch_messages(&self, id: &ConversationId) -> Result<Vec<Message>, ConversationError> {
        let mut conn = self.pool.acquire().await?;
        messages::fetch_messages(id, &mut conn).await
    }
}

impl MessageFeed for SqliteDatabase {
    fn subscribe_messages(&self, id: &ConversationId) -> MessageSubscription {
        let pool = self.pool.clone();
        self.feed.subscribe(id.clone(), move |conversation_id| {
            let pool = pool.clone();
            async move {
                let mut conn = pool.acquire().await?;
                messages::fetch_messages(&conversation_id, &mut conn)
                    .await
                    .map_err(|e| FeedError::SnapshotFailed(e.to_string()))
            }
        })
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the `SSW_DATABASE_URL` environment variable, falling back to the
    /// default location.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        Self::new_with_feed_capacity(url, max_connections, DEFAULT_FEED_CAPACITY).await
    }

    /// As [`SqliteDatabase::new_with_url`], with an explicit change-feed buffer size. Subscribers that fall further
    /// behind than this simply receive a fresh snapshot.
    pub async fn new_with_feed_capacity(
        url: &str,
        max_connections: u32,
        feed_capacity: usize,
    ) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool, feed: ChangeFeed::new(feed_capacity) })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Connection pool for {} closed", self.url);
    }
}
