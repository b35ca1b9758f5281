use std::fmt::Display;

use serde::{Deserialize, Serialize};
use skillswap_engine::{
    db_types::{ConversationId, Profile, SkillKind, UserId},
    matcher::{MatchCandidate, MatchOutcome},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSkillRequest {
    pub kind: SkillKind,
    pub skill: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCertificateRequest {
    pub name: String,
    /// Where the uploaded file can be retrieved from
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConversationRequest {
    pub with: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationStarted {
    pub id: ConversationId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationsQuery {
    pub active: Option<ConversationId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchesResponse {
    Matched { matches: Vec<MatchCandidate> },
    IncompleteProfile,
}

impl From<MatchOutcome> for MatchesResponse {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::Ranked(matches) => {
                let matches = matches
                    .into_iter()
                    .map(|mut c| {
                        c.profile = public_profile(c.profile);
                        c
                    })
                    .collect();
                Self::Matched { matches }
            },
            MatchOutcome::IncompleteProfile => Self::IncompleteProfile,
        }
    }
}

/// The profile as other users may see it. The email address is private to its owner.
pub fn public_profile(mut profile: Profile) -> Profile {
    profile.email = None;
    profile
}
