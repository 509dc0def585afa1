use actix_web::{
    get, post,
    web::{Data, Form, Json},
    HttpResponse,
};
use serde::Deserialize;

use crate::{
    app::{AppError, AppState},
    auth::{self, CurrentUser},
};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Pipe for creating an user
/// - url: `{domain}/users/`
///
/// # HTTP request requirements
/// ## body
/// - json object containing `username` and `password` keys
/// - `password` must be at least 10 characters long
///
/// # Example
/// ```
/// let request = actix_web::test::TestRequest::post()
///     .uri("/users/")
///     .set_json(json!({ "username": "Test username", "password": "Test password" }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - json of the created user, `{"id": 1, "username": "Test username"}`
/// ## Error
/// - Bad request
#[post("/users/")]
pub async fn create_new_user(
    credentials: Json<Credentials>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = auth::register(
        app_state.store.as_ref(),
        &credentials.username,
        &credentials.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Pipe for logging in as user
/// - url: `{domain}/token`
///
/// # HTTP request requirements
/// ## body
/// - url encoded form with `username` and `password` fields
///
/// # Response
/// ## Ok
/// - `{"access_token": "...", "token_type": "bearer"}`
/// ## Error
/// - Unauthorized
#[post("/token")]
pub async fn login(
    credentials: Form<Credentials>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = auth::login(
        app_state.store.as_ref(),
        &app_state.authenticator,
        &credentials.username,
        &credentials.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(token))
}

/// Pipe for getting the logged in user
/// - url: `{domain}/users/me`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer <access_token>`
///
/// # Response
/// ## Ok
/// - json of the user the token was issued for
/// ## Error
/// - Unauthorized
#[get("/users/me")]
pub async fn current_user(CurrentUser(user): CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user))
}
