pub mod password;
pub mod token;

use actix_web::{dev::Payload, http::header::Header, web::Data, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

use crate::{
    app::{AppError, AppState},
    database::{
        models::user::{User, UserForm},
        Store,
    },
};
use token::{Authenticator, Token};

pub const MIN_PASSWORD_LENGTH: usize = 10;

/// The user behind the request's `Authorization: Bearer` header.
/// Extracting it fails with [AppError::Unauthorized] for a missing, malformed,
/// expired or foreign token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(&req).await })
    }
}

async fn authenticate(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let app_state = req
        .app_data::<Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal(String::from("application state is not configured")))?;

    let bearer = Authorization::<Bearer>::parse(req)
        .map_err(|_| AppError::Unauthorized)?
        .into_scheme();

    let user = app_state
        .authenticator
        .resolve(bearer.token(), app_state.store.as_ref())
        .await?;

    Ok(CurrentUser(user))
}

/** Registers a new user. Usernames are trimmed and must be unique. */
pub async fn register(
    store: &dyn Store,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest(String::from("Username must not be empty")));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if store.find_user_by_username(username).await?.is_some() {
        return Err(AppError::BadRequest(String::from("Username already registered")));
    }

    let user = store
        .create_user(&UserForm {
            username: username.to_string(),
            hashed_password: password::hash(password),
        })
        .await?;
    log::info!("registered user {} ({})", user.username, user.id);

    Ok(user)
}

/** Checks a username/password pair and issues an access token for it */
pub async fn login(
    store: &dyn Store,
    authenticator: &Authenticator,
    username: &str,
    password: &str,
) -> Result<Token, AppError> {
    let user = store
        .find_user_by_username(username.trim())
        .await?
        .filter(|user| password::verify(password, &user.hashed_password))
        .ok_or(AppError::Unauthorized)?;

    authenticator.issue(&user)
}
