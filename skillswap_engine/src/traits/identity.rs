use crate::db_types::UserId;

/// The identity provider: resolves the currently signed-in user, if any.
///
/// Credential issuance and sessions live outside the engine. Callers pass an implementation into the operations that
/// act "as the current user".
pub trait IdentityProvider {
    fn current_user_id(&self) -> Option<UserId>;
}

/// A fixed identity. Useful for tests, and for callers that have already authenticated the user.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<UserId>);

impl StaticIdentity {
    pub fn signed_in(user: UserId) -> Self {
        Self(Some(user))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.0.clone()
    }
}

impl<T: IdentityProvider> IdentityProvider for &T {
    fn current_user_id(&self) -> Option<UserId> {
        (*self).current_user_id()
    }
}
