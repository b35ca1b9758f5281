//! Request identity.
//!
//! The server does not sign anyone in. An authenticating proxy in front of it does that, and forwards the user's id in
//! a header (see [`IdentityConfig`]). [`AuthenticatedUser`] is the extractor that reads it, and doubles as the
//! engine's [`IdentityProvider`].
use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use log::*;
use skillswap_engine::{db_types::UserId, traits::IdentityProvider};

use crate::{
    config::{IdentityConfig, PROXY_KEY_HEADER},
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

impl IdentityProvider for AuthenticatedUser {
    fn current_user_id(&self) -> Option<UserId> {
        Some(self.0.clone())
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(ServerError::from))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let default_config;
    let config = match req.app_data::<web::Data<IdentityConfig>>() {
        Some(c) => c.get_ref(),
        None => {
            default_config = IdentityConfig::default();
            &default_config
        },
    };
    if let Some(secret) = &config.proxy_secret {
        let key = req.headers().get(PROXY_KEY_HEADER).and_then(|v| v.to_str().ok()).unwrap_or_default();
        if !secret.matches(key) {
            warn!("💻️ Request to {} did not carry a valid proxy key", req.path());
            return Err(AuthError::ProxyKeyMismatch);
        }
    }
    let header = req.headers().get(config.header_name.as_str()).ok_or(AuthError::MissingIdentity)?;
    let user = header.to_str().map_err(|e| AuthError::InvalidIdentity(e.to_string()))?.trim();
    if user.is_empty() {
        return Err(AuthError::MissingIdentity);
    }
    trace!("💻️ Request authenticated as {user}");
    Ok(AuthenticatedUser(UserId::from(user)))
}
