//! # SQLite Database methods
//!
//! This module contains the "low-level" SQLite database interactions.
//!
//! As elsewhere in the engine, these are plain functions that accept a `&mut SqliteConnection` argument, so callers
//! can pass either a pooled connection or an open transaction.
use std::{env, str::FromStr};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod conversations;
pub mod messages;
pub mod profiles;

const SQLITE_DB_URL: &str = "sqlite://data/skillswap.db";

pub fn db_url() -> String {
    let result = env::var("SSW_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ SSW_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
