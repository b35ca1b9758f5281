use std::env;

use log::*;
use ssw_common::{env_flag, Secret};

const DEFAULT_SSW_HOST: &str = "127.0.0.1";
const DEFAULT_SSW_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/skillswap.db";
pub const DEFAULT_IDENTITY_HEADER: &str = "X-SkillSwap-User";
pub const PROXY_KEY_HEADER: &str = "X-SkillSwap-Proxy-Key";
const DEFAULT_FEED_BUFFER: usize = 256;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Apply the database migrations at startup.
    pub run_migrations: bool,
    /// How many unread change announcements a live message stream may fall behind before it skips straight to a fresh
    /// snapshot.
    pub feed_buffer: usize,
    pub identity: IdentityConfig,
}

/// How requests are tied to a user.
///
/// Sign-in happens upstream. The proxy in front of the server authenticates the user and passes their id on in
/// `header_name`. If `proxy_secret` is set, requests must also carry it in the `X-SkillSwap-Proxy-Key` header, so that
/// clients cannot bypass the proxy and claim any identity they like.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub header_name: String,
    pub proxy_secret: Option<Secret<String>>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { header_name: DEFAULT_IDENTITY_HEADER.to_string(), proxy_secret: None }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SSW_HOST.to_string(),
            port: DEFAULT_SSW_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            run_migrations: true,
            feed_buffer: DEFAULT_FEED_BUFFER,
            identity: IdentityConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SSW_HOST").ok().unwrap_or_else(|| DEFAULT_SSW_HOST.into());
        let port = env::var("SSW_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SSW_PORT. {e} Using the default, {DEFAULT_SSW_PORT}, instead."
                    );
                    DEFAULT_SSW_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SSW_PORT);
        let database_url = env::var("SSW_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SSW_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let run_migrations = env_flag("SSW_RUN_MIGRATIONS", true);
        let feed_buffer = parse_feed_buffer(env::var("SSW_FEED_BUFFER").ok());
        let identity = IdentityConfig::from_env_or_default();
        Self { host, port, database_url, run_migrations, feed_buffer, identity }
    }
}

impl IdentityConfig {
    pub fn from_env_or_default() -> Self {
        let header_name = env::var("SSW_IDENTITY_HEADER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.to_string());
        let proxy_secret = env::var("SSW_PROXY_SECRET").ok().filter(|s| !s.is_empty()).map(Secret::new);
        if proxy_secret.is_none() {
            warn!(
                "🪛️ SSW_PROXY_SECRET is not set. Any client that can reach the server can act as any user by setting \
                 the {header_name} header. Only run like this behind a proxy that strips that header."
            );
        }
        Self { header_name, proxy_secret }
    }

    pub fn with_proxy_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.proxy_secret = Some(Secret::new(secret.into()));
        self
    }
}

fn parse_feed_buffer(value: Option<String>) -> usize {
    match value.map(|s| s.parse::<usize>()) {
        None => DEFAULT_FEED_BUFFER,
        Some(Ok(n)) if n > 0 => n,
        Some(Ok(_)) => {
            error!("🪛️ SSW_FEED_BUFFER must be greater than zero. Using the default, {DEFAULT_FEED_BUFFER}, instead.");
            DEFAULT_FEED_BUFFER
        },
        Some(Err(e)) => {
            error!("🪛️ SSW_FEED_BUFFER is not a valid number. {e} Using the default, {DEFAULT_FEED_BUFFER}, instead.");
            DEFAULT_FEED_BUFFER
        },
    }
}
