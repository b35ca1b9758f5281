use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use skillswap_engine::{
    traits::{ConversationError, ProfileApiError},
    MatchApiError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("The service is temporarily unavailable. Please retry. {0}")]
    ServiceUnavailable(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("The request could not be processed. {0}")]
    Unprocessable(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The record already exists. {0}")]
    RecordAlreadyExists(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingIdentity => StatusCode::UNAUTHORIZED,
                AuthError::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
                AuthError::ProxyKeyMismatch => StatusCode::UNAUTHORIZED,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::RecordAlreadyExists(_) => StatusCode::CONFLICT,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No signed-in user was supplied with the request.")]
    MissingIdentity,
    #[error("The user identity header is not valid. {0}")]
    InvalidIdentity(String),
    #[error("The request did not come through the authenticating proxy.")]
    ProxyKeyMismatch,
}

impl From<ProfileApiError> for ServerError {
    fn from(e: ProfileApiError) -> Self {
        match e {
            ProfileApiError::DatabaseError(_) | ProfileApiError::CorruptRecord(_) => Self::BackendError(e.to_string()),
            ProfileApiError::ProfileAlreadyExists(_) => Self::RecordAlreadyExists(e.to_string()),
            ProfileApiError::ProfileNotFound(_) | ProfileApiError::CertificateNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            ProfileApiError::EmptySkill | ProfileApiError::SkillAlreadyAdded { .. } => {
                Self::Unprocessable(e.to_string())
            },
            ProfileApiError::InvalidCertificate(_) => Self::Unprocessable(e.to_string()),
        }
    }
}

impl From<ConversationError> for ServerError {
    fn from(e: ConversationError) -> Self {
        match e {
            ConversationError::DatabaseError(_) | ConversationError::CorruptRecord(_) => {
                Self::BackendError(e.to_string())
            },
            ConversationError::FeedError(_) => Self::ServiceUnavailable(e.to_string()),
            ConversationError::ConversationNotFound(_) => Self::NoRecordFound(e.to_string()),
            ConversationError::SenderNotParticipant { .. } => Self::InsufficientPermissions(e.to_string()),
            ConversationError::SelfConversation(_) => Self::Unprocessable(e.to_string()),
            ConversationError::NotAuthenticated => Self::AuthenticationError(AuthError::MissingIdentity),
        }
    }
}

impl From<MatchApiError> for ServerError {
    fn from(e: MatchApiError) -> Self {
        match e {
            MatchApiError::ProfileNotFound(_) => Self::NoRecordFound(e.to_string()),
            MatchApiError::LoadFailed(_) => Self::ServiceUnavailable(e.to_string()),
        }
    }
}
