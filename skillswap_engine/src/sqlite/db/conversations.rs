use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{Conversation, ConversationId, UserId},
    helpers::new_record_id,
    traits::ConversationError,
};

#[derive(Debug, Clone, FromRow)]
struct ConversationRow {
    id: ConversationId,
    participant_a: UserId,
    participant_b: UserId,
    created_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self { id: row.id, participants: [row.participant_a, row.participant_b], created_at: row.created_at }
    }
}

pub async fn fetch_conversation(
    id: &ConversationId,
    conn: &mut SqliteConnection,
) -> Result<Option<Conversation>, ConversationError> {
    let row = sqlx::query_as::<_, ConversationRow>(
        "SELECT id, participant_a, participant_b, created_at FROM conversations WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Conversation::from))
}

/// Every conversation with `user` as a participant, oldest first.
pub async fn fetch_conversations_for_user(
    user: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Conversation>, ConversationError> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT id, participant_a, participant_b, created_at
        FROM conversations
        WHERE participant_a = $1 OR participant_b = $1
        ORDER BY rowid ASC"#,
    )
    .bind(user)
    .fetch_all(conn)
    .await?;
    trace!("🗃️ {} conversations found for {user}", rows.len());
    Ok(rows.into_iter().map(Conversation::from).collect())
}

pub async fn insert_conversation(
    a: &UserId,
    b: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Conversation, ConversationError> {
    let conversation = Conversation {
        id: ConversationId::from(new_record_id()),
        participants: [a.clone(), b.clone()],
        created_at: Utc::now(),
    };
    sqlx::query("INSERT INTO conversations (id, participant_a, participant_b, created_at) VALUES ($1, $2, $3, $4)")
        .bind(&conversation.id)
        .bind(a)
        .bind(b)
        .bind(conversation.created_at)
        .execute(conn)
        .await?;
    debug!("🗃️ Conversation {} created between {a} and {b}", conversation.id);
    Ok(conversation)
}
