use cucumber::World;
use log::*;
use skillswap_engine::{
    conversation_objects::SendOutcome,
    db_types::{ConversationId, Message},
    events::{EventProducers, MessageSubscription},
    matcher::MatchOutcome,
    ConversationManager,
    MatchApi,
    ProfileApi,
    SqliteDatabase,
};

use crate::support::prepare_env::{prepare_test_env, random_db_path};

#[derive(Default, Debug, World)]
pub struct SkillSwapWorld {
    pub system: Option<SkillSwapSystem>,
    pub last_matches: Option<MatchOutcome>,
    pub last_conversation: Option<ConversationId>,
    pub last_send: Option<SendOutcome>,
    pub timeline: Option<MessageSubscription>,
    pub last_snapshot: Vec<Message>,
}

#[derive(Debug)]
pub struct SkillSwapSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub profiles: ProfileApi<SqliteDatabase>,
    pub matches: MatchApi<SqliteDatabase>,
    pub conversations: ConversationManager<SqliteDatabase>,
}

impl SkillSwapWorld {
    pub fn system(&self) -> &SkillSwapSystem {
        self.system.as_ref().expect("System not initialised")
    }

    pub fn conversation(&self) -> ConversationId {
        self.last_conversation.clone().expect("No conversation has been opened")
    }
}

impl SkillSwapSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("🚀️ Created database: {url}");
        Self {
            db_path: url,
            profiles: ProfileApi::new(db.clone()),
            matches: MatchApi::new(db.clone()),
            conversations: ConversationManager::new(db.clone(), EventProducers::default()),
            db,
        }
    }
}
