//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every store operation is async for this reason, and live message
//! streams are driven by the change feed rather than by polling.
//!
//! All routes except `/health` expect the signed-in user in the identity header (see [`AuthenticatedUser`]).
use actix_web::{get, http::header, web, HttpResponse, Responder};
use futures::StreamExt;
use log::*;
use skillswap_engine::{
    conversation_objects::SendOutcome,
    db_types::{ConversationId, NewProfile, ProfileUpdate, SkillKind, UserId},
    traits::{ConversationManagement, MessageFeed, ProfileManagement},
    ConversationManager,
    MatchApi,
    ProfileApi,
};

use crate::{
    auth::AuthenticatedUser,
    data_objects::{
        public_profile,
        ConversationStarted,
        ConversationsQuery,
        JsonResponse,
        MatchesResponse,
        NewCertificateRequest,
        NewSkillRequest,
        SendMessageRequest,
        SignupRequest,
        StartConversationRequest,
    },
    errors::ServerError,
    helpers::sse_event,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Profiles  ----------------------------------------------------
route!(signup => Post "/signup" impl ProfileManagement);
/// Creates the profile for a user who has just signed up with the identity provider.
///
/// New profiles have no skills and the starting credit balance. Signing up twice is a conflict.
pub async fn signup<B: ProfileManagement>(
    user: AuthenticatedUser,
    body: web::Json<SignupRequest>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let SignupRequest { display_name, email } = body.into_inner();
    debug!("💻️ POST signup for {}", user.id());
    let mut profile = NewProfile::new(user.0, display_name);
    if let Some(email) = email {
        profile = profile.with_email(email);
    }
    let profile = api.create_profile(profile).await?;
    Ok(HttpResponse::Created().json(profile))
}

route!(my_profile => Get "/profile" impl ProfileManagement);
pub async fn my_profile<B: ProfileManagement>(
    user: AuthenticatedUser,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET profile for {}", user.id());
    let profile = api.profile(user.id()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(profile_by_id => Get "/profile/{id}" impl ProfileManagement);
/// Another user's profile, without their email address.
pub async fn profile_by_id<B: ProfileManagement>(
    _user: AuthenticatedUser,
    path: web::Path<UserId>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET profile for {id}");
    let profile = api.profile(&id).await?;
    Ok(HttpResponse::Ok().json(public_profile(profile)))
}

route!(update_profile => Put "/profile" impl ProfileManagement);
/// Merge-update of the caller's profile. Fields missing from the body are left as they are.
pub async fn update_profile<B: ProfileManagement>(
    user: AuthenticatedUser,
    body: web::Json<ProfileUpdate>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ PUT profile for {}", user.id());
    let profile = api.upsert_profile(user.id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(add_skill => Post "/profile/skills" impl ProfileManagement);
pub async fn add_skill<B: ProfileManagement>(
    user: AuthenticatedUser,
    body: web::Json<NewSkillRequest>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewSkillRequest { kind, skill } = body.into_inner();
    debug!("💻️ POST {kind} skill '{skill}' for {}", user.id());
    let profile = api.add_skill(user.id(), kind, &skill).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(remove_skill => Delete "/profile/skills/{kind}/{skill}" impl ProfileManagement);
pub async fn remove_skill<B: ProfileManagement>(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (kind, skill) = path.into_inner();
    let kind = kind.parse::<SkillKind>().map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    debug!("💻️ DELETE {kind} skill '{skill}' for {}", user.id());
    let profile = api.remove_skill(user.id(), kind, &skill).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(skill_suggestions => Get "/profile/skills/suggestions" impl ProfileManagement);
pub async fn skill_suggestions<B: ProfileManagement>(
    user: AuthenticatedUser,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET skill suggestions for {}", user.id());
    let suggestions = api.skill_suggestions(user.id()).await?;
    Ok(HttpResponse::Ok().json(suggestions))
}

route!(add_certificate => Post "/profile/certificates" impl ProfileManagement);
pub async fn add_certificate<B: ProfileManagement>(
    user: AuthenticatedUser,
    body: web::Json<NewCertificateRequest>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewCertificateRequest { name, url } = body.into_inner();
    debug!("💻️ POST certificate '{name}' for {}", user.id());
    let profile = api.add_certificate(user.id(), &name, &url).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(remove_certificate => Delete "/profile/certificates/{index}" impl ProfileManagement);
pub async fn remove_certificate<B: ProfileManagement>(
    user: AuthenticatedUser,
    path: web::Path<usize>,
    api: web::Data<ProfileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let index = path.into_inner();
    debug!("💻️ DELETE certificate #{index} for {}", user.id());
    let profile = api.remove_certificate(user.id(), index).await?;
    Ok(HttpResponse::Ok().json(profile))
}

//----------------------------------------------   Matches  ----------------------------------------------------
route!(matches => Get "/matches" impl ProfileManagement);
/// Ranks every other user against the caller's skills.
///
/// A caller who has listed no skills gets `{"status": "incomplete_profile"}`, which is not an error. A store failure
/// is a 503, so clients can tell "nothing to show" apart from "try again".
pub async fn matches<B: ProfileManagement>(
    user: AuthenticatedUser,
    api: web::Data<MatchApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET matches for {}", user.id());
    let outcome = api.matches_for(user.id()).await?;
    Ok(HttpResponse::Ok().json(MatchesResponse::from(outcome)))
}

//----------------------------------------------   Conversations  ----------------------------------------------------
route!(conversations => Get "/conversations" impl ConversationManagement, ProfileManagement);
/// The caller's conversations. The `active` query parameter carries the client's current selection; if it is absent
/// the first conversation is selected.
pub async fn conversations<B: ConversationManagement + ProfileManagement>(
    user: AuthenticatedUser,
    query: web::Query<ConversationsQuery>,
    api: web::Data<ConversationManager<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET conversations for {}", user.id());
    let mut list = api.list_conversations(user.id()).await?.with_active(query.into_inner().active);
    list.entries.iter_mut().for_each(|e| e.other_participant = public_profile(e.other_participant.clone()));
    Ok(HttpResponse::Ok().json(list))
}

route!(start_conversation => Post "/conversations" impl ConversationManagement);
pub async fn start_conversation<B: ConversationManagement>(
    user: AuthenticatedUser,
    body: web::Json<StartConversationRequest>,
    api: web::Data<ConversationManager<B>>,
) -> Result<HttpResponse, ServerError> {
    let other = body.into_inner().with;
    debug!("💻️ POST conversation between {} and {other}", user.id());
    let id = api.start_conversation(&user, &other).await?;
    Ok(HttpResponse::Ok().json(ConversationStarted { id }))
}

route!(send_message => Post "/conversations/{id}/messages" impl ConversationManagement);
pub async fn send_message<B: ConversationManagement>(
    user: AuthenticatedUser,
    path: web::Path<ConversationId>,
    body: web::Json<SendMessageRequest>,
    api: web::Data<ConversationManager<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ POST message to {id} from {}", user.id());
    match api.send(&id, user.id(), &body.text).await? {
        SendOutcome::Sent(message) => Ok(HttpResponse::Created().json(message)),
        SendOutcome::Rejected(reason) => {
            debug!("💻️ Message to {id} rejected: {reason:?}");
            Ok(HttpResponse::UnprocessableEntity().json(JsonResponse::failure("Message text cannot be empty")))
        },
    }
}

route!(message_stream => Get "/conversations/{id}/messages/stream" impl ConversationManagement, MessageFeed);
/// A live stream of the conversation's messages, as server-sent events.
///
/// Every event is a `snapshot` carrying the complete ordered message list. If the feed fails, a single `error` event
/// is sent and the stream closes. The subscription is released when the client disconnects.
pub async fn message_stream<B: ConversationManagement + MessageFeed>(
    user: AuthenticatedUser,
    path: web::Path<ConversationId>,
    api: web::Data<ConversationManager<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET message stream for {id} by {}", user.id());
    api.conversation_for_participant(&id, user.id()).await?;
    let subscription = api.watch_messages(&id).await?;
    let events = subscription.map(|item| {
        let event = match item {
            Ok(messages) => sse_event("snapshot", &messages),
            Err(e) => {
                warn!("💻️ Message stream ended with an error. {e}");
                sse_event("error", &serde_json::json!({ "error": e.to_string() }))
            },
        };
        Ok::<_, ServerError>(event)
    });
    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events))
}
