use cucumber::given;
use skillswap_engine::db_types::{NewProfile, ProfileUpdate, SkillKind, SkillSet, UserId};

use crate::cucumber::{skillswap_world::SkillSwapSystem, SkillSwapWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut SkillSwapWorld) {
    let system = SkillSwapSystem::new().await;
    world.system = Some(system);
}

fn skill_list(list: &str) -> SkillSet {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

#[given(expr = "'{word}' teaches {string} and wants to learn {string}")]
async fn user_with_skills(world: &mut SkillSwapWorld, user: String, teach: String, learn: String) {
    let id = UserId::from(user.as_str());
    let profiles = &world.system().profiles;
    profiles.create_profile(NewProfile::new(id.clone(), user)).await.expect("Error creating profile");
    let update = ProfileUpdate::default()
        .with_skills(SkillKind::Teach, skill_list(&teach))
        .with_skills(SkillKind::Learn, skill_list(&learn));
    profiles.upsert_profile(&id, update).await.expect("Error updating profile");
}
