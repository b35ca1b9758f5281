use chrono::{DateTime, TimeZone, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{ConversationId, Message, MessageId, NewMessage, UserId},
    helpers::new_record_id,
    traits::ConversationError,
};

#[derive(Debug, Clone, FromRow)]
struct MessageRow {
    id: MessageId,
    conversation_id: ConversationId,
    sender_id: UserId,
    text: String,
    timestamp_us: i64,
}

impl TryFrom<MessageRow> for Message {
    type Error = ConversationError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let timestamp = micros_to_datetime(row.timestamp_us).ok_or_else(|| {
            ConversationError::CorruptRecord(format!("Message {} has an invalid timestamp: {}", row.id, row.timestamp_us))
        })?;
        Ok(Message {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            text: row.text,
            timestamp,
        })
    }
}

fn micros_to_datetime(us: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_micros(us).single()
}

/// Appends a message and returns it as stored.
///
/// The timestamp is `max(now, latest timestamp in the conversation)`, computed in the same statement as the insert, so
/// timestamps never go backwards within a conversation even if the clock does.
pub async fn append_message(message: NewMessage, conn: &mut SqliteConnection) -> Result<Message, ConversationError> {
    let id = MessageId::from(new_record_id());
    let now = Utc::now().timestamp_micros();
    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (id, conversation_id, sender_id, text, timestamp_us)
        SELECT $1, $2, $3, $4, MAX($5, COALESCE((SELECT MAX(timestamp_us) FROM messages WHERE conversation_id = $2), 0))
        RETURNING id, conversation_id, sender_id, text, timestamp_us"#,
    )
    .bind(&id)
    .bind(&message.conversation_id)
    .bind(&message.sender_id)
    .bind(&message.text)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Message {id} appended to conversation {}", message.conversation_id);
    Message::try_from(row)
}

/// The conversation's messages in display order: by timestamp, then by write order.
pub async fn fetch_messages(id: &ConversationId, conn: &mut SqliteConnection) -> Result<Vec<Message>, ConversationError> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, conversation_id, sender_id, text, timestamp_us
        FROM messages
        WHERE conversation_id = $1
        ORDER BY timestamp_us ASC, seq ASC"#,
    )
    .bind(id)
    .fetch_all(conn)
    .await?;
    trace!("🗃️ Fetched {} messages for conversation {id}", rows.len());
    rows.into_iter().map(Message::try_from).collect()
}
