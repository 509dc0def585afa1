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
        comments::{self, CommentCreate, CommentUpdate},
    },
    database::models::Page,
};

/// Pipe for creating a comment
/// - url: `{domain}/posts/{post_id}/comments/`
///
/// # HTTP request requires
/// - `{post_id}` as a parameter
///
/// ## body
/// - json object with `content` and an optional `created_at`
///
/// # Example
/// ```
/// let request = actix_web::test::TestRequest::post()
///     .uri("/posts/1/comments/")
///     .insert_header(("Authorization", "Bearer test_token"))
///     .set_json(json!({ "content": "comment text" }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - json of the stored comment
/// ## Error
/// - Unauthorized
/// - Not found, when the post does not exist
/// - Bad request, when moderation flags the text. The comment is still kept
///   as blocked.
/// - Service unavailable
#[post("/posts/{post_id}/comments/")]
pub async fn create_comment(
    CurrentUser(user): CurrentUser,
    post_id: Path<i32>,
    comment: Json<CommentCreate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let created = comments::create_comment(
        app_state.store.as_ref(),
        app_state.moderator.as_ref(),
        user.id,
        post_id.into_inner(),
        comment.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Pipe for getting comments from a post
/// - url: `{domain}/posts/{post_id}/all_comments/?skip=0&limit=10`
///
/// # Response
/// ## Ok
/// - json array of the unblocked comments, oldest first
/// ```
/// [
///     {
///         "id": 3,
///         "content": "Comment body 1",
///         "post_id": 1,
///         "user_id": 2,
///         "created_at": "2023-06-25T12:00:00",
///         "updated_at": null,
///         "blocked": false
///     }
/// ]
/// ```
/// ## Error
/// - Unauthorized
#[get("/posts/{post_id}/all_comments/")]
pub async fn get_comments(
    _user: CurrentUser,
    post_id: Path<i32>,
    page: Query<Page>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let comments = comments::list_comments(
        app_state.store.as_ref(),
        post_id.into_inner(),
        page.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Pipe for editing a comment
/// - url: `{domain}/posts/{post_id}/comments/{comment_id}`
///
/// # Response
/// ## Ok
/// - json of the updated comment
/// ## Error
/// - Unauthorized
/// - Not found
/// - Forbidden, for someone else's comment, a blocked comment or flagged text
#[put("/posts/{post_id}/comments/{comment_id}")]
pub async fn edit_comment(
    CurrentUser(user): CurrentUser,
    path: Path<(i32, i32)>,
    update: Json<CommentUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (post_id, comment_id) = path.into_inner();
    let store = app_state.store.as_ref();
    let comment = access::owned_comment(store, &user, comment_id, post_id).await?;

    let updated = comments::update_comment(
        store,
        app_state.moderator.as_ref(),
        comment.id,
        update.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Pipe for deleting a comment from a certain post
/// - url: `{domain}/posts/{post_id}/comments/{comment_id}`
///
/// # Response
/// ## Ok
/// - `{"message": "Comment deleted successfully"}`
/// ## Error
/// - Unauthorized
/// - Not found
/// - Forbidden, for someone else's comment or a blocked comment
#[delete("/posts/{post_id}/comments/{comment_id}")]
pub async fn delete_comment(
    CurrentUser(user): CurrentUser,
    path: Path<(i32, i32)>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (post_id, comment_id) = path.into_inner();
    let store = app_state.store.as_ref();
    let comment = access::owned_comment(store, &user, comment_id, post_id).await?;
    comments::delete_comment(store, comment.id, post_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted successfully" })))
}
