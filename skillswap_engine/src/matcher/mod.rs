//! Reciprocal skill matching.
//!
//! [`compute_matches`] is a pure function. It never touches the store; callers fetch the viewer and a population
//! snapshot themselves (see [`crate::MatchApi`]) and call it again whenever they want fresher results.
use log::*;
use serde::{Deserialize, Serialize};

use crate::db_types::{Profile, SkillSet};

/// A profile that has something to offer the viewer, or something to gain from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub profile: Profile,
    /// Skills the candidate teaches that the viewer wants to learn.
    pub can_teach_viewer: SkillSet,
    /// Skills the candidate wants to learn that the viewer teaches.
    pub can_learn_from_viewer: SkillSet,
    pub score: usize,
    pub location: String,
}

impl MatchCandidate {
    fn score(viewer: &Profile, candidate: &Profile) -> Option<Self> {
        let can_teach_viewer = candidate.skills_to_teach.intersection(&viewer.skills_to_learn);
        let can_learn_from_viewer = candidate.skills_to_learn.intersection(&viewer.skills_to_teach);
        let score = can_teach_viewer.len() + can_learn_from_viewer.len();
        if score == 0 {
            return None;
        }
        Some(Self {
            location: candidate.location_or_default().to_string(),
            profile: candidate.clone(),
            can_teach_viewer,
            can_learn_from_viewer,
            score,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Candidates in descending score order. May be empty.
    Ranked(Vec<MatchCandidate>),
    /// The viewer has listed no skills at all, so there is nothing to match on.
    IncompleteProfile,
}

impl MatchOutcome {
    pub fn candidates(&self) -> &[MatchCandidate] {
        match self {
            MatchOutcome::Ranked(c) => c.as_slice(),
            MatchOutcome::IncompleteProfile => &[],
        }
    }

    pub fn is_incomplete_profile(&self) -> bool {
        matches!(self, MatchOutcome::IncompleteProfile)
    }
}

/// Ranks `population` by reciprocal skill overlap with `viewer`.
///
/// The viewer is excluded from the population. Profiles with no overlap in either direction are dropped. Candidates
/// with equal scores keep their relative order in `population`.
pub fn compute_matches(viewer: &Profile, population: &[Profile]) -> MatchOutcome {
    if viewer.has_no_skills() {
        debug!("🧮️ {} has not listed any skills. Cannot compute matches.", viewer.id);
        return MatchOutcome::IncompleteProfile;
    }
    let mut candidates = population
        .iter()
        .filter(|p| p.id != viewer.id)
        .filter_map(|p| MatchCandidate::score(viewer, p))
        .collect::<Vec<_>>();
    // sort_by is stable
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    debug!("🧮️ {} candidates found for {} out of {} profiles", candidates.len(), viewer.id, population.len());
    MatchOutcome::Ranked(candidates)
}
