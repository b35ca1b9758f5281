//! Profile lifecycle: signup, merge-updates, skills and certificates.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Certificate, NewProfile, Profile, ProfileUpdate, SkillKind, UserId},
    helpers::{normalize_skill, skill_suggestions},
    traits::{ProfileApiError, ProfileManagement},
};

pub struct ProfileApi<B> {
    db: B,
}

impl<B: Debug> Debug for ProfileApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProfileApi ({:?})", self.db)
    }
}

impl<B> ProfileApi<B>
where B: ProfileManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates the profile for a newly signed-up user: no skills, no certificates and the starting credit balance.
    pub async fn create_profile(&self, profile: NewProfile) -> Result<Profile, ProfileApiError> {
        let id = profile.id.clone();
        let profile = self.db.insert_profile(profile).await?;
        info!("🧑️ New profile created for {id}");
        Ok(profile)
    }

    pub async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, ProfileApiError> {
        self.db.fetch_profile(id).await
    }

    /// Like [`ProfileApi::fetch_profile`], but a missing profile is an error.
    pub async fn profile(&self, id: &UserId) -> Result<Profile, ProfileApiError> {
        self.db.fetch_profile(id).await?.ok_or_else(|| ProfileApiError::ProfileNotFound(id.clone()))
    }

    /// Merge-writes `update` into the profile. Only the fields present in the update are changed.
    pub async fn upsert_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<Profile, ProfileApiError> {
        if update.is_empty() {
            trace!("🧑️ Empty update for {id}. Nothing to write.");
            return self.profile(id).await;
        }
        self.db.upsert_profile(id, update).await
    }

    /// Adds a skill to one of the profile's skill sets. The name is trimmed first. Empty names and skills that are
    /// already in the target set are rejected.
    pub async fn add_skill(&self, id: &UserId, kind: SkillKind, skill: &str) -> Result<Profile, ProfileApiError> {
        let skill = normalize_skill(skill).ok_or(ProfileApiError::EmptySkill)?;
        let profile = self.profile(id).await?;
        let mut skills = profile.skills(kind).clone();
        if !skills.insert(skill.clone()) {
            return Err(ProfileApiError::SkillAlreadyAdded { skill, kind });
        }
        debug!("🧑️ Adding '{skill}' to the {kind} skills of {id}");
        self.db.upsert_profile(id, ProfileUpdate::default().with_skills(kind, skills)).await
    }

    /// Removes a skill from one of the profile's skill sets. Removing a skill that is not present changes nothing.
    pub async fn remove_skill(&self, id: &UserId, kind: SkillKind, skill: &str) -> Result<Profile, ProfileApiError> {
        let profile = self.profile(id).await?;
        let mut skills = profile.skills(kind).clone();
        if !skills.remove(skill) {
            trace!("🧑️ '{skill}' is not in the {kind} skills of {id}");
            return Ok(profile);
        }
        debug!("🧑️ Removing '{skill}' from the {kind} skills of {id}");
        self.db.upsert_profile(id, ProfileUpdate::default().with_skills(kind, skills)).await
    }

    /// Catalogue skills the user has not yet listed in either set.
    pub async fn skill_suggestions(&self, id: &UserId) -> Result<Vec<&'static str>, ProfileApiError> {
        let profile = self.profile(id).await?;
        Ok(skill_suggestions(&profile))
    }

    /// Attaches a certificate. `url` is the location returned by the blob store the file was uploaded to. New
    /// certificates are always unverified.
    pub async fn add_certificate(&self, id: &UserId, name: &str, url: &str) -> Result<Profile, ProfileApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileApiError::InvalidCertificate("a certificate name is required".into()));
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(ProfileApiError::InvalidCertificate("a certificate file is required".into()));
        }
        let mut certificates = self.profile(id).await?.certificates;
        certificates.push(Certificate::new(name, url));
        debug!("🧑️ Certificate '{name}' added for {id}");
        self.db.upsert_profile(id, ProfileUpdate::default().with_certificates(certificates)).await
    }

    pub async fn remove_certificate(&self, id: &UserId, index: usize) -> Result<Profile, ProfileApiError> {
        let mut certificates = self.profile(id).await?.certificates;
        if index >= certificates.len() {
            return Err(ProfileApiError::CertificateNotFound(index));
        }
        let removed = certificates.remove(index);
        debug!("🧑️ Certificate '{}' removed for {id}", removed.name);
        self.db.upsert_profile(id, ProfileUpdate::default().with_certificates(certificates)).await
    }
}
