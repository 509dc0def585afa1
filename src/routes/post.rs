use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::CurrentUser,
    blogs::{
        access,
        posts::{self, PostCreate, PostUpdate},
    },
    database::models::Page,
};

/// Pipe for creating a post
/// - url: `{domain}/posts/`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer <access_token>`
/// ## body
/// - json object with `title` and `content`
///
/// # Example
/// ```
/// let request = actix_web::test::TestRequest::post()
///     .uri("/posts/")
///     .insert_header(("Authorization", "Bearer test_token"))
///     .set_json(json!({ "title": "Test title", "content": "Test body" }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - json of the stored [post](crate::database::models::post::Post)
/// ## Error
/// - Unauthorized
/// - Bad request, when the title or the content is flagged by moderation
/// - Service unavailable, when moderation can not be reached
#[post("/posts/")]
pub async fn create_new_post(
    CurrentUser(user): CurrentUser,
    post: Json<PostCreate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let created = posts::create_post(
        app_state.store.as_ref(),
        app_state.moderator.as_ref(),
        user.id,
        post.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Pipe for getting a single post
/// - url: `{domain}/posts/{post_id}`
///
/// # Response
/// ## Ok
/// - json of the post
/// ## Error
/// - Unauthorized
/// - Not found
#[get("/posts/{post_id}")]
pub async fn get_post(
    _user: CurrentUser,
    post_id: Path<i32>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = posts::get_post(app_state.store.as_ref(), post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Pipe for listing posts
/// - url: `{domain}/all_posts/?skip=0&limit=10`
///
/// # Response
/// ## Ok
/// - json array of posts ordered by id
/// ## Error
/// - Unauthorized
#[get("/all_posts/")]
pub async fn get_posts(
    _user: CurrentUser,
    page: Query<Page>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let posts = posts::list_posts(app_state.store.as_ref(), page.into_inner()).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Pipe for editing a post
/// - url: `{domain}/posts/{post_id}`
///
/// # HTTP request requirements
/// ## body
/// - json object with an optional `title` and an optional `content`
///
/// # Response
/// ## Ok
/// - json of the updated post
/// ## Error
/// - Unauthorized
/// - Forbidden, when the post belongs to another user
/// - Not found
/// - Bad request, when the new text is flagged by moderation
/// - Service unavailable
#[put("/posts/{post_id}")]
pub async fn edit_post(
    CurrentUser(user): CurrentUser,
    post_id: Path<i32>,
    update: Json<PostUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let store = app_state.store.as_ref();
    let post = access::owned_post(store, &user, post_id.into_inner()).await?;

    let updated = posts::update_post(
        store,
        app_state.moderator.as_ref(),
        post.id,
        user.id,
        update.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Pipe for deleting a post together with its comments
/// - url: `{domain}/posts/{post_id}`
///
/// # Response
/// ## Ok
/// - `{"message": "Post deleted successfully"}`
/// ## Error
/// - Unauthorized
/// - Forbidden
/// - Not found
#[delete("/posts/{post_id}")]
pub async fn delete_post(
    CurrentUser(user): CurrentUser,
    post_id: Path<i32>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let store = app_state.store.as_ref();
    let post = access::owned_post(store, &user, post_id.into_inner()).await?;
    posts::delete_post(store, post.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted successfully" })))
}
