mod record_id;
mod skills;

pub use record_id::{new_record_id, RECORD_ID_LENGTH};
pub use skills::{normalize_skill, skill_suggestions, SKILL_CATALOGUE};
