//! SQLite backend for the SkillSwap engine.
//!
//! Profiles, conversations and messages are stored in a single SQLite database. The schema is applied from the
//! `migrations` directory with [`SqliteDatabase::migrate`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
