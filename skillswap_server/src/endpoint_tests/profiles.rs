use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use mockall::predicate::eq;
use skillswap_engine::{
    db_types::{NewProfile, Profile, UserId},
    traits::ProfileApiError,
    MatchApi,
    ProfileApi,
};

use super::helpers::{as_user, profile, send_request};
use crate::{
    config::{DEFAULT_IDENTITY_HEADER, PROXY_KEY_HEADER},
    endpoint_tests::mocks::MockBackend,
    routes::{AddSkillRoute, MatchesRoute, MyProfileRoute, ProfileByIdRoute, SignupRoute},
};

fn configure_profiles(backend: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(SignupRoute::<MockBackend>::new())
            .service(MyProfileRoute::<MockBackend>::new())
            .service(AddSkillRoute::<MockBackend>::new())
            .service(ProfileByIdRoute::<MockBackend>::new())
            .app_data(web::Data::new(ProfileApi::new(backend)));
    }
}

fn configure_matches(backend: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(MatchesRoute::<MockBackend>::new()).app_data(web::Data::new(MatchApi::new(backend)));
    }
}

#[actix_web::test]
async fn requests_without_identity_are_rejected() {
    let _ = env_logger::try_init();
    let req = as_user(TestRequest::get().uri("/profile"), "");
    let (status, body) = send_request(req, configure_profiles(MockBackend::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No signed-in user"), "{body}");
}

#[actix_web::test]
async fn requests_must_come_through_the_proxy() {
    let _ = env_logger::try_init();
    let req = TestRequest::get()
        .uri("/profile")
        .insert_header((DEFAULT_IDENTITY_HEADER, "alice"))
        .insert_header((PROXY_KEY_HEADER, "guess"));
    let (status, body) = send_request(req, configure_profiles(MockBackend::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("authenticating proxy"), "{body}");
}

#[actix_web::test]
async fn fetch_my_profile() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_profile()
        .with(eq(UserId::from("alice")))
        .returning(|_| Ok(Some(profile("alice", &["Cooking"], &[]))));
    let req = as_user(TestRequest::get().uri("/profile"), "alice");
    let (status, body) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["id"], "alice");
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["skills_to_teach"], serde_json::json!(["Cooking"]));
    assert_eq!(json["credits"], 10);
}

#[actix_web::test]
async fn other_profiles_hide_email() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|id| Ok(Some(profile(id.as_str(), &[], &["Hindi"]))));
    let req = as_user(TestRequest::get().uri("/profile/bob"), "alice");
    let (status, body) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["id"], "bob");
    assert!(json.get("email").is_none(), "{body}");
}

#[actix_web::test]
async fn missing_profile_is_404() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|_| Ok(None));
    let req = as_user(TestRequest::get().uri("/profile"), "alice");
    let (status, _) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn signup_creates_a_profile() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend
        .expect_insert_profile()
        .withf(|p: &NewProfile| p.id.as_str() == "alice" && p.display_name == "Alice")
        .returning(|p| Ok(Profile::new_at_signup(p)));
    let req = as_user(TestRequest::post().uri("/signup"), "alice")
        .set_json(serde_json::json!({ "display_name": "Alice", "email": "alice@example.com" }));
    let (status, body) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::CREATED);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["credits"], 10);
    assert_eq!(json["skills_to_learn"], serde_json::json!([]));
}

#[actix_web::test]
async fn signing_up_twice_is_a_conflict() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend
        .expect_insert_profile()
        .returning(|p| Err(ProfileApiError::ProfileAlreadyExists(p.id)));
    let req = as_user(TestRequest::post().uri("/signup"), "alice").set_json(serde_json::json!({ "display_name": "A" }));
    let (status, _) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn blank_skills_are_unprocessable() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_upsert_profile().never();
    let req = as_user(TestRequest::post().uri("/profile/skills"), "alice")
        .set_json(serde_json::json!({ "kind": "teach", "skill": "   " }));
    let (status, body) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("cannot be empty"), "{body}");
}

#[actix_web::test]
async fn add_skill() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|_| Ok(Some(profile("alice", &[], &[]))));
    backend.expect_upsert_profile().times(1).returning(|_, update| {
        let mut p = profile("alice", &[], &[]);
        update.apply_to(&mut p);
        Ok(p)
    });
    let req = as_user(TestRequest::post().uri("/profile/skills"), "alice")
        .set_json(serde_json::json!({ "kind": "learn", "skill": " German " }));
    let (status, body) = send_request(req, configure_profiles(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["skills_to_learn"], serde_json::json!(["German"]));
}

#[actix_web::test]
async fn matches_are_ranked() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|_| Ok(Some(profile("viewer", &["Cooking", "Hindi"], &["Photography"]))));
    backend.expect_fetch_profiles_except().returning(|_| {
        Ok(vec![profile("b", &[], &["Hindi"]), profile("a", &["Photography"], &["Cooking"]), profile("c", &["Chess"], &[])])
    });
    let req = as_user(TestRequest::get().uri("/matches"), "viewer");
    let (status, body) = send_request(req, configure_matches(backend)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "matched");
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["profile"]["id"], "a");
    assert_eq!(matches[0]["score"], 2);
    assert_eq!(matches[0]["location"], "Not specified");
    assert!(matches[0]["profile"].get("email").is_none());
    assert_eq!(matches[1]["profile"]["id"], "b");
}

#[actix_web::test]
async fn incomplete_profile_is_not_an_error() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|_| Ok(Some(profile("viewer", &[], &[]))));
    backend.expect_fetch_profiles_except().never();
    let req = as_user(TestRequest::get().uri("/matches"), "viewer");
    let (status, body) = send_request(req, configure_matches(backend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"incomplete_profile"}"#);
}

#[actix_web::test]
async fn match_load_failure_is_retryable() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|_| Ok(Some(profile("viewer", &["Cooking"], &[]))));
    backend.expect_fetch_profiles_except().returning(|_| Err(ProfileApiError::DatabaseError("disk full".into())));
    let req = as_user(TestRequest::get().uri("/matches"), "viewer");
    let (status, body) = send_request(req, configure_matches(backend)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("retry"), "{body}");
}

#[actix_web::test]
async fn matches_without_a_profile() {
    let _ = env_logger::try_init();
    let mut backend = MockBackend::new();
    backend.expect_fetch_profile().returning(|_| Ok(None));
    let req = as_user(TestRequest::get().uri("/matches"), "ghost");
    let (status, _) = send_request(req, configure_matches(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
