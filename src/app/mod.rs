pub mod settings;

use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use diesel::result::DatabaseErrorKind;
use serde_json::json;
use thiserror::Error;

use crate::{auth::token::Authenticator, database::Store, moderation::Moderator};

/** Shared services handed to every request handler */
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub moderator: Arc<dyn Moderator>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        moderator: Arc<dyn Moderator>,
        authenticator: Authenticator,
    ) -> Self {
        Self {
            store,
            moderator,
            authenticator: Arc::new(authenticator),
        }
    }
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            moderator: self.moderator.clone(),
            authenticator: self.authenticator.clone(),
        }
    }
}

/** Every failure an operation can report to the API layer */
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    ContentRejected(String),
    #[error("moderation service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    #[error("Could not validate credentials")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ContentRejected(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PersistenceFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            AppError::PersistenceFailure(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                String::from("Internal server error")
            }
            _ => self.to_string(),
        };

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::Unauthorized = self {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(json!({ "detail": detail }))
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        if let diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err
        {
            return AppError::BadRequest(info.message().to_string());
        }
        AppError::PersistenceFailure(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::PersistenceFailure(err.to_string())
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ServiceUnavailable(err.to_string())
    }
}
