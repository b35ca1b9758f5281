use thiserror::Error;

use crate::db_types::{NewProfile, Profile, ProfileUpdate, SkillKind, UserId};

#[derive(Debug, Clone, Error)]
pub enum ProfileApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A profile already exists for user {0}")]
    ProfileAlreadyExists(UserId),
    #[error("No profile exists for user {0}")]
    ProfileNotFound(UserId),
    #[error("Skill names cannot be empty")]
    EmptySkill,
    #[error("'{skill}' is already in your {kind} list")]
    SkillAlreadyAdded { skill: String, kind: SkillKind },
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error("There is no certificate at position {0}")]
    CertificateNotFound(usize),
    #[error("Stored profile record is corrupt: {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for ProfileApiError {
    fn from(e: sqlx::Error) -> Self {
        ProfileApiError::DatabaseError(e.to_string())
    }
}

/// The `ProfileManagement` trait defines the profile operations a backend must support.
///
/// Profiles are never deleted. All writes after signup go through [`ProfileManagement::upsert_profile`], which has
/// merge semantics.
#[allow(async_fn_in_trait)]
pub trait ProfileManagement {
    /// Stores a brand-new profile with the signup defaults (no skills, starting credits).
    ///
    /// Fails with [`ProfileApiError::ProfileAlreadyExists`] if a profile with the same id exists.
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, ProfileApiError>;

    /// Fetches the profile for the given user id. If no profile exists, `None` is returned.
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, ProfileApiError>;

    /// Bulk read of every profile except the one belonging to `id`, in the order the profiles were created.
    async fn fetch_profiles_except(&self, id: &UserId) -> Result<Vec<Profile>, ProfileApiError>;

    /// Merges `update` into the stored profile and returns the result. Fields that are `None` in the update are left
    /// untouched. If no profile exists yet, one is created with the signup defaults before the merge is applied.
    async fn upsert_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<Profile, ProfileApiError>;
}
