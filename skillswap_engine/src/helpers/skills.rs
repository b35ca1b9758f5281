use crate::db_types::Profile;

/// Skills offered as suggestions when editing a profile. Users may still add skills that are not listed here.
pub const SKILL_CATALOGUE: [&str; 17] = [
    "Web Development",
    "Graphic Design",
    "Digital Marketing",
    "Photography",
    "Video Editing",
    "Content Writing",
    "Data Analysis",
    "UI/UX Design",
    "Public Speaking",
    "Music Production",
    "Language Teaching",
    "Cooking",
    "Hindi",
    "English",
    "German",
    "Cricket",
    "Badminton",
];

/// Trims surrounding whitespace from a skill name. Returns `None` if nothing is left.
///
/// Case is preserved: "cooking" and "Cooking" are different skills.
pub fn normalize_skill(skill: &str) -> Option<String> {
    let skill = skill.trim();
    (!skill.is_empty()).then(|| skill.to_string())
}

/// The catalogue entries that appear in neither of the profile's skill sets, in catalogue order.
pub fn skill_suggestions(profile: &Profile) -> Vec<&'static str> {
    SKILL_CATALOGUE
        .iter()
        .copied()
        .filter(|s| !profile.skills_to_teach.contains(s) && !profile.skills_to_learn.contains(s))
        .collect()
}
