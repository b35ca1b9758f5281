use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use futures::future;
use mockall::predicate::eq;
use skillswap_engine::{
    db_types::{ConversationId, Message, MessageId, NewMessage, UserId},
    events::{ChangeFeed, EventProducers},
    ConversationManager,
};

use super::helpers::{as_user, conversation, profile, send_request};
use crate::{
    endpoint_tests::mocks::MockBackend,
    routes::{ConversationsRoute, MessageStreamRoute, SendMessageRoute, StartConversationRoute},
};

fn configure(backend: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(ConversationsRoute::<MockBackend>::new())
            .service(StartConversationRoute::<MockBackend>::new())
            .service(SendMessageRoute::<MockBackend>::new())
            .service(MessageStreamRoute::<MockBackend>::new())
            .app_data(web::Data::new(ConversationManager::new(backend, EventProducers::default())));
    }
}

fn message(conversation: &str, sender: &str, text: &str) -> Message {
    Message {
        id: MessageId::from(format!("msg-{text}")),
        conversation_id: ConversationId::from(conversation),
        sender_id: UserId::from(sender),
        text: text.to_string(),
        timestamp: Utc::now(),
    }
}

#[actix_web::test]
async fn list_conversations() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversations_for_user().with(eq(UserId::from("alice"))).returning(|_| {
        Ok(vec![conversation("c1", "alice", "bob"), conversation("c2", "ghost", "alice"), conversation("c3", "carol", "alice")])
    });
    backend.expect_fetch_profile().returning(|id| match id.as_str() {
        "ghost" => Ok(None),
        other => Ok(Some(profile(other, &["Chess"], &[]))),
    });
    let req = as_user(TestRequest::get().uri("/conversations"), "alice");
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["other_participant"]["id"], "bob");
    assert!(entries[0]["other_participant"].get("email").is_none());
    assert_eq!(entries[1]["other_participant"]["id"], "carol");
    assert_eq!(json["active"], "c1");
}

#[actix_web::test]
async fn list_keeps_the_current_selection() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_conversations_for_user()
        .returning(|_| Ok(vec![conversation("c1", "alice", "bob"), conversation("c3", "carol", "alice")]));
    backend.expect_fetch_profile().returning(|id| Ok(Some(profile(id.as_str(), &[], &[]))));
    let req = as_user(TestRequest::get().uri("/conversations?active=c3"), "alice");
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["active"], "c3");
}

#[actix_web::test]
async fn empty_conversation_list_has_no_selection() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversations_for_user().returning(|_| Ok(vec![]));
    backend.expect_fetch_profile().never();
    let req = as_user(TestRequest::get().uri("/conversations"), "alice");
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"entries":[],"active":null}"#);
}

#[actix_web::test]
async fn starting_a_conversation_reuses_an_existing_one() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversations_for_user().returning(|_| Ok(vec![conversation("c1", "bob", "alice")]));
    backend.expect_insert_conversation().never();
    let req = as_user(TestRequest::post().uri("/conversations"), "alice").set_json(serde_json::json!({ "with": "bob" }));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"c1"}"#);
}

#[actix_web::test]
async fn starting_a_new_conversation() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversations_for_user().returning(|_| Ok(vec![conversation("c1", "alice", "carol")]));
    backend
        .expect_insert_conversation()
        .times(1)
        .returning(|a, b| Ok(conversation("c9", a.as_str(), b.as_str())));
    let req = as_user(TestRequest::post().uri("/conversations"), "alice").set_json(serde_json::json!({ "with": "bob" }));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"c9"}"#);
}

#[actix_web::test]
async fn cannot_talk_to_yourself() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversations_for_user().never();
    backend.expect_insert_conversation().never();
    let req = as_user(TestRequest::post().uri("/conversations"), "alice").set_json(serde_json::json!({ "with": "alice" }));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn send_a_message() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversation().returning(|id| Ok(Some(conversation(id.as_str(), "alice", "bob"))));
    backend
        .expect_append_message()
        .withf(|m: &NewMessage| m.text == "  hi bob " && m.sender_id.as_str() == "alice")
        .times(1)
        .returning(|m| Ok(message(m.conversation_id.as_str(), m.sender_id.as_str(), &m.text)));
    let req = as_user(TestRequest::post().uri("/conversations/c1/messages"), "alice")
        .set_json(serde_json::json!({ "text": "  hi bob " }));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::CREATED);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["conversation_id"], "c1");
    assert_eq!(json["sender_id"], "alice");
}

#[actix_web::test]
async fn blank_messages_are_not_stored() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversation().never();
    backend.expect_append_message().never();
    let req = as_user(TestRequest::post().uri("/conversations/c1/messages"), "alice")
        .set_json(serde_json::json!({ "text": " \n\t " }));
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains(r#""success":false"#), "{body}");
}

#[actix_web::test]
async fn outsiders_cannot_post() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversation().returning(|id| Ok(Some(conversation(id.as_str(), "alice", "bob"))));
    backend.expect_append_message().never();
    let req = as_user(TestRequest::post().uri("/conversations/c1/messages"), "mallory")
        .set_json(serde_json::json!({ "text": "hello" }));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn posting_to_a_missing_conversation() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversation().returning(|_| Ok(None));
    backend.expect_append_message().never();
    let req = as_user(TestRequest::post().uri("/conversations/nope/messages"), "alice")
        .set_json(serde_json::json!({ "text": "hello" }));
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn message_stream_sends_snapshots() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversation().returning(|id| Ok(Some(conversation(id.as_str(), "alice", "bob"))));
    backend.expect_subscribe_messages().times(1).returning(|id| {
        // The feed is dropped straight away, so the stream ends after the first snapshot.
        let feed = ChangeFeed::new(4);
        feed.subscribe(id.clone(), |id| future::ready(Ok(vec![message(id.as_str(), "bob", "hello")])))
    });
    let req = as_user(TestRequest::get().uri("/conversations/c1/messages/stream"), "alice");
    let (status, body) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = body.find("event: snapshot\n").expect("no snapshot event");
    let error = body.find("event: error\n").expect("no error event");
    assert!(snapshot < error);
    assert!(body.contains(r#""text":"hello""#), "{body}");
    assert!(body.contains("change feed has shut down"), "{body}");
}

#[actix_web::test]
async fn outsiders_cannot_watch() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_conversation().returning(|id| Ok(Some(conversation(id.as_str(), "alice", "bob"))));
    backend.expect_subscribe_messages().never();
    let req = as_user(TestRequest::get().uri("/conversations/c1/messages/stream"), "mallory");
    let (status, _) = send_request(req, configure(backend)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
