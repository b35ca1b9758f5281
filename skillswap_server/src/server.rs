use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use skillswap_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    ConversationManager,
    MatchApi,
    ProfileApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        AddCertificateRoute,
        AddSkillRoute,
        ConversationsRoute,
        MatchesRoute,
        MessageStreamRoute,
        MyProfileRoute,
        ProfileByIdRoute,
        RemoveCertificateRoute,
        RemoveSkillRoute,
        SendMessageRoute,
        SignupRoute,
        SkillSuggestionsRoute,
        StartConversationRoute,
        UpdateProfileRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_feed_capacity(&config.database_url, 25, config.feed_buffer)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let handlers = EventHandlers::new(128, default_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db.clone(), producers)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    db.close().await;
    result
}

/// The server's own event hooks. They only log; notifications would hang off these.
pub fn default_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_conversation_created(|ev| {
        Box::pin(async move {
            let [a, b] = &ev.conversation.participants;
            info!("💬️ Conversation {} started between {a} and {b}", ev.conversation.id);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks.on_message_sent(|ev| {
        Box::pin(async move {
            debug!("💬️ {} sent message {} in {}", ev.message.sender_id, ev.message.id, ev.message.conversation_id);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let identity = web::Data::new(config.identity.clone());
    let srv = HttpServer::new(move || {
        let profile_api = ProfileApi::new(db.clone());
        let match_api = MatchApi::new(db.clone());
        let conversation_api = ConversationManager::new(db.clone(), producers.clone());
        let api_scope = web::scope("/api")
            .service(SignupRoute::<SqliteDatabase>::new())
            .service(MyProfileRoute::<SqliteDatabase>::new())
            .service(UpdateProfileRoute::<SqliteDatabase>::new())
            .service(SkillSuggestionsRoute::<SqliteDatabase>::new())
            .service(AddSkillRoute::<SqliteDatabase>::new())
            .service(RemoveSkillRoute::<SqliteDatabase>::new())
            .service(AddCertificateRoute::<SqliteDatabase>::new())
            .service(RemoveCertificateRoute::<SqliteDatabase>::new())
            .service(ProfileByIdRoute::<SqliteDatabase>::new())
            .service(MatchesRoute::<SqliteDatabase>::new())
            .service(ConversationsRoute::<SqliteDatabase>::new())
            .service(StartConversationRoute::<SqliteDatabase>::new())
            .service(MessageStreamRoute::<SqliteDatabase>::new())
            .service(SendMessageRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ssw::access_log"))
            .app_data(identity.clone())
            .app_data(web::Data::new(profile_api))
            .app_data(web::Data::new(match_api))
            .app_data(web::Data::new(conversation_api))
            .service(health)
            .service(api_scope)
    })
    // Live message streams hold their connection open
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("🚀️ Server listening on {}:{}", config.host, config.port);
    Ok(srv)
}
