//! Record types shared by the engine APIs and the database backends.
use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
pub use ssw_common::Credits;
use ssw_common::STARTING_CREDITS;
use sqlx::Type;
use thiserror::Error;

/// The literal shown in place of a missing or blank location.
pub const LOCATION_NOT_SPECIFIED: &str = "Not specified";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

//--------------------------------------       Identifiers      ---------------------------------------------------------
string_id!(
    /// The stable user identifier handed out by the identity provider. Never reused.
    UserId
);
string_id!(
    /// Store-assigned conversation identifier.
    ConversationId
);
string_id!(
    /// Store-assigned message identifier.
    MessageId
);

//--------------------------------------        SkillSet        ---------------------------------------------------------
/// An unordered set of skill names. Membership is by exact, case-sensitive string identity.
///
/// Iteration order is lexicographic, which keeps serialized output stable. Nothing depends on that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    /// Adds a skill. Returns `false` if it was already present.
    pub fn insert<S: Into<String>>(&mut self, skill: S) -> bool {
        self.0.insert(skill.into())
    }

    /// Removes a skill. Returns `false` if it was not present.
    pub fn remove(&mut self, skill: &str) -> bool {
        self.0.remove(skill)
    }

    /// The skills present in both `self` and `other`.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for SkillSet {
    fn from(skills: [S; N]) -> Self {
        skills.into_iter().collect()
    }
}

//--------------------------------------       SkillKind        ---------------------------------------------------------
/// Which of a profile's two skill sets an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    /// Skills the user can teach
    Teach,
    /// Skills the user wants to learn
    Learn,
}

impl Display for SkillKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillKind::Teach => write!(f, "teach"),
            SkillKind::Learn => write!(f, "learn"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid skill kind: {0}")]
pub struct ConversionError(String);

impl FromStr for SkillKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teach" => Ok(Self::Teach),
            "learn" => Ok(Self::Learn),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------      Certificate       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub name: String,
    /// Retrieval URL issued by the blob store
    pub url: String,
    pub verified: bool,
}

impl Certificate {
    /// A freshly uploaded certificate. Certificates always start out unverified.
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, url: S2) -> Self {
        Self { name: name.into(), url: url.into(), verified: false }
    }
}

//--------------------------------------        Profile         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub college: Option<String>,
    pub degree: Option<String>,
    pub skills_to_teach: SkillSet,
    pub skills_to_learn: SkillSet,
    pub certificates: Vec<Certificate>,
    pub credits: Credits,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Profile {
    /// The profile a user gets at signup: no skills, no certificates and the starting credit balance.
    pub fn new_at_signup(profile: NewProfile) -> Self {
        let now = Utc::now();
        Self {
            id: profile.id,
            display_name: profile.display_name,
            email: profile.email,
            photo_url: None,
            location: None,
            bio: None,
            college: None,
            degree: None,
            skills_to_teach: SkillSet::new(),
            skills_to_learn: SkillSet::new(),
            certificates: Vec::new(),
            credits: STARTING_CREDITS,
            created_at: now,
            last_updated: now,
        }
    }

    pub fn skills(&self, kind: SkillKind) -> &SkillSet {
        match kind {
            SkillKind::Teach => &self.skills_to_teach,
            SkillKind::Learn => &self.skills_to_learn,
        }
    }

    pub fn skills_mut(&mut self, kind: SkillKind) -> &mut SkillSet {
        match kind {
            SkillKind::Teach => &mut self.skills_to_teach,
            SkillKind::Learn => &mut self.skills_to_learn,
        }
    }

    pub fn has_no_skills(&self) -> bool {
        self.skills_to_teach.is_empty() && self.skills_to_learn.is_empty()
    }

    /// The location, or [`LOCATION_NOT_SPECIFIED`] if it is absent or blank.
    pub fn location_or_default(&self) -> &str {
        match self.location.as_deref().map(str::trim) {
            Some(loc) if !loc.is_empty() => loc,
            _ => LOCATION_NOT_SPECIFIED,
        }
    }
}

//--------------------------------------       NewProfile       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl NewProfile {
    pub fn new<S: Into<String>>(id: UserId, display_name: S) -> Self {
        Self { id, display_name: display_name.into(), email: None }
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }
}

//--------------------------------------     ProfileUpdate      ---------------------------------------------------------
/// A partial profile document. Writing it merges: every `None` field leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub college: Option<String>,
    pub degree: Option<String>,
    pub skills_to_teach: Option<SkillSet>,
    pub skills_to_learn: Option<SkillSet>,
    pub certificates: Option<Vec<Certificate>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn with_display_name<S: Into<String>>(mut self, name: S) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_photo_url<S: Into<String>>(mut self, url: S) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_bio<S: Into<String>>(mut self, bio: S) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_skills(mut self, kind: SkillKind, skills: SkillSet) -> Self {
        match kind {
            SkillKind::Teach => self.skills_to_teach = Some(skills),
            SkillKind::Learn => self.skills_to_learn = Some(skills),
        }
        self
    }

    pub fn with_certificates(mut self, certificates: Vec<Certificate>) -> Self {
        self.certificates = Some(certificates);
        self
    }

    /// Merges this update into `profile` and bumps `last_updated`.
    pub fn apply_to(self, profile: &mut Profile) {
        let Self {
            display_name,
            photo_url,
            location,
            bio,
            college,
            degree,
            skills_to_teach,
            skills_to_learn,
            certificates,
        } = self;
        if let Some(v) = display_name {
            profile.display_name = v;
        }
        if photo_url.is_some() {
            profile.photo_url = photo_url;
        }
        if location.is_some() {
            profile.location = location;
        }
        if bio.is_some() {
            profile.bio = bio;
        }
        if college.is_some() {
            profile.college = college;
        }
        if degree.is_some() {
            profile.degree = degree;
        }
        if let Some(v) = skills_to_teach {
            profile.skills_to_teach = v;
        }
        if let Some(v) = skills_to_learn {
            profile.skills_to_learn = v;
        }
        if let Some(v) = certificates {
            profile.certificates = v;
        }
        profile.last_updated = Utc::now();
    }
}

//--------------------------------------      Conversation      ---------------------------------------------------------
/// A 1:1 channel between exactly two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: [UserId; 2],
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn includes(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    /// Returns true if the participant set equals `{a, b}`, in either order.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        self.includes(a) && self.includes(b)
    }

    /// The participant that is not `user`. `None` if `user` is not a participant.
    pub fn other_participant(&self, user: &UserId) -> Option<&UserId> {
        let [first, second] = &self.participants;
        if first == user {
            Some(second)
        } else if second == user {
            Some(first)
        } else {
            None
        }
    }
}

//--------------------------------------        Message         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub text: String,
    /// Assigned by the store when the message is accepted
    pub timestamp: DateTime<Utc>,
}

//--------------------------------------       NewMessage       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub text: String,
}

impl NewMessage {
    pub fn new<S: Into<String>>(conversation_id: ConversationId, sender_id: UserId, text: S) -> Self {
        Self { conversation_id, sender_id, text: text.into() }
    }
}
