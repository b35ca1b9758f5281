//! # SkillSwap server
//!
//! The HTTP face of the SkillSwap engine. It is responsible for:
//! * Profile management: signup, merge-updates, skills and certificates.
//! * Serving ranked skill matches for the signed-in user.
//! * Conversations: resolving a conversation with another user, sending messages and streaming the live message
//!   timeline as server-sent events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Identity
//! Users sign in with an external identity provider. The server trusts the user id that the authenticating proxy puts
//! in the identity header. See [auth](auth/index.html).
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/...`: Profile, match and conversation routes. See [routes](routes/index.html).
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
