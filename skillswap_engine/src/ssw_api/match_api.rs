use std::fmt::Debug;

use log::*;
use thiserror::Error;

use crate::{
    db_types::UserId,
    matcher::{compute_matches, MatchOutcome},
    traits::ProfileManagement,
};

#[derive(Debug, Clone, Error)]
pub enum MatchApiError {
    #[error("Complete your profile before looking for matches. No profile exists for {0}.")]
    ProfileNotFound(UserId),
    #[error("Failed to load matches. Please retry. {0}")]
    LoadFailed(String),
}

/// Loads the data the matcher needs and runs it.
pub struct MatchApi<B> {
    db: B,
}

impl<B: Debug> Debug for MatchApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MatchApi ({:?})", self.db)
    }
}

impl<B> MatchApi<B>
where B: ProfileManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Ranks every other profile against `user`'s skills.
    ///
    /// A store failure is reported as [`MatchApiError::LoadFailed`] and is never folded into the
    /// [`MatchOutcome::IncompleteProfile`] state. Nothing is retried automatically.
    pub async fn matches_for(&self, user: &UserId) -> Result<MatchOutcome, MatchApiError> {
        let viewer = self
            .db
            .fetch_profile(user)
            .await
            .map_err(|e| {
                error!("🧮️ Could not load the profile for {user}. {e}");
                MatchApiError::LoadFailed(e.to_string())
            })?
            .ok_or_else(|| MatchApiError::ProfileNotFound(user.clone()))?;
        if viewer.has_no_skills() {
            return Ok(MatchOutcome::IncompleteProfile);
        }
        let population = self.db.fetch_profiles_except(user).await.map_err(|e| {
            error!("🧮️ Could not load the profile population. {e}");
            MatchApiError::LoadFailed(e.to_string())
        })?;
        Ok(compute_matches(&viewer, &population))
    }
}
