use std::time::Duration;

use cucumber::{then, when};
use futures_util::StreamExt;
use skillswap_engine::{conversation_objects::SendOutcome, db_types::UserId, traits::ConversationManagement};

use crate::cucumber::SkillSwapWorld;

#[when(expr = "'{word}' looks for matches")]
async fn look_for_matches(world: &mut SkillSwapWorld, user: String) {
    let outcome = world.system().matches.matches_for(&UserId::from(user)).await.expect("Error loading matches");
    world.last_matches = Some(outcome);
}

#[then(expr = "the matches are {string}")]
async fn check_matches(world: &mut SkillSwapWorld, expected: String) {
    let outcome = world.last_matches.as_ref().expect("No matches were loaded");
    let actual = outcome
        .candidates()
        .iter()
        .map(|c| format!("{}:{}", c.profile.id, c.score))
        .collect::<Vec<_>>()
        .join(", ");
    assert_eq!(actual, expected);
}

#[then(expr = "{word} can teach the viewer {string}")]
async fn check_can_teach(world: &mut SkillSwapWorld, user: String, skills: String) {
    let outcome = world.last_matches.as_ref().expect("No matches were loaded");
    let candidate =
        outcome.candidates().iter().find(|c| c.profile.id.as_str() == user).expect("Candidate is not in the matches");
    assert_eq!(candidate.can_teach_viewer.iter().collect::<Vec<_>>().join(", "), skills);
}

#[then("the viewer is asked to complete their profile")]
async fn check_incomplete(world: &mut SkillSwapWorld) {
    let outcome = world.last_matches.as_ref().expect("No matches were loaded");
    assert!(outcome.is_incomplete_profile(), "Expected an incomplete profile, got {outcome:?}");
}

#[when(expr = "'{word}' opens a conversation with '{word}'")]
async fn open_conversation(world: &mut SkillSwapWorld, a: String, b: String) {
    let id = world
        .system()
        .conversations
        .resolve_or_create(&UserId::from(a), &UserId::from(b))
        .await
        .expect("Error resolving conversation");
    if let Some(previous) = &world.last_conversation {
        assert_eq!(previous, &id, "The pair resolved to a different conversation");
    }
    world.last_conversation = Some(id);
}

#[then(expr = "'{word}' has {int} conversation(s)")]
async fn count_conversations(world: &mut SkillSwapWorld, user: String, count: usize) {
    let conversations =
        world.system().db.fetch_conversations_for_user(&UserId::from(user)).await.expect("Error fetching conversations");
    assert_eq!(conversations.len(), count);
}

#[when(expr = "'{word}' watches the conversation")]
async fn watch(world: &mut SkillSwapWorld, _user: String) {
    let id = world.conversation();
    let mut timeline = world.system().conversations.watch_messages(&id).await.expect("Error opening subscription");
    let snapshot = timeline.next().await.expect("Subscription ended").expect("Snapshot failed");
    world.last_snapshot = snapshot;
    world.timeline = Some(timeline);
}

#[when(expr = "'{word}' sends {string}")]
async fn send(world: &mut SkillSwapWorld, user: String, text: String) {
    let id = world.conversation();
    let outcome =
        world.system().conversations.send(&id, &UserId::from(user), &text).await.expect("Error sending message");
    world.last_send = Some(outcome);
}

#[then("the message is rejected")]
async fn check_rejected(world: &mut SkillSwapWorld) {
    let outcome = world.last_send.as_ref().expect("Nothing was sent");
    assert!(outcome.is_rejected(), "Expected a rejection, got {outcome:?}");
}

#[then(expr = "the timeline ends with {string} from '{word}'")]
async fn check_timeline_tail(world: &mut SkillSwapWorld, text: String, sender: String) {
    let timeline = world.timeline.as_mut().expect("Nobody is watching the conversation");
    let snapshot = tokio::time::timeout(Duration::from_secs(5), timeline.next())
        .await
        .expect("Timed out waiting for a snapshot")
        .expect("Subscription ended")
        .expect("Snapshot failed");
    let last = snapshot.last().expect("Timeline is empty");
    assert_eq!(last.text, text);
    assert_eq!(last.sender_id.as_str(), sender);
    world.last_snapshot = snapshot;
}

#[then(expr = "the conversation has {int} message(s)")]
async fn count_messages(world: &mut SkillSwapWorld, count: usize) {
    let id = world.conversation();
    let messages = world.system().db.fetch_messages(&id).await.expect("Error fetching messages");
    assert_eq!(messages.len(), count);
    if let Some(SendOutcome::Sent(m)) = &world.last_send {
        assert_eq!(messages.last(), Some(m));
    }
}

#[when("the viewer stops watching")]
async fn stop_watching(world: &mut SkillSwapWorld) {
    if let Some(timeline) = world.timeline.as_mut() {
        timeline.cancel();
        timeline.cancel();
        assert!(timeline.next().await.is_none());
    }
    assert_eq!(world.system().db.feed().subscriber_count(), 0);
}
