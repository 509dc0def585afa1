use serde::{Deserialize, Serialize};

use crate::{
    app::AppError,
    database::{
        models::{
            post::{Post, PostChanges, PostForm},
            Page,
        },
        Store,
    },
    moderation::{first_flagged, Moderator},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
}

/// Absent fields are left as they are and are not sent to moderation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Moderates title and content, then stores the post.
/// Nothing is written when either text is flagged.
pub async fn create_post(
    store: &dyn Store,
    moderator: &dyn Moderator,
    owner_id: i32,
    post: PostCreate,
) -> Result<Post, AppError> {
    let texts = [post.title.as_str(), post.content.as_str()];
    if let Some(verdict) = first_flagged(moderator, &texts).await? {
        log::info!("rejected post by user {}: {}", owner_id, verdict.message);
        return Err(AppError::ContentRejected(verdict.message));
    }

    let created = store
        .insert_post(&PostForm {
            title: post.title,
            content: post.content,
            user_id: owner_id,
        })
        .await?;
    log::info!("user {} created post {}", owner_id, created.id);

    Ok(created)
}

pub async fn get_post(store: &dyn Store, post_id: i32) -> Result<Post, AppError> {
    store
        .find_post(post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))
}

pub async fn list_posts(store: &dyn Store, page: Page) -> Result<Vec<Post>, AppError> {
    store.list_posts(page).await
}

/// Rewrites the post `post_id` owned by `owner_id`.
/// A post owned by someone else is reported as `NotFound`.
pub async fn update_post(
    store: &dyn Store,
    moderator: &dyn Moderator,
    post_id: i32,
    owner_id: i32,
    update: PostUpdate,
) -> Result<Post, AppError> {
    let owned = store
        .find_post(post_id)
        .await?
        .filter(|post| post.user_id == owner_id);
    if owned.is_none() {
        return Err(AppError::NotFound("Post"));
    }

    let texts: Vec<&str> = [update.title.as_deref(), update.content.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if let Some(verdict) = first_flagged(moderator, &texts).await? {
        log::info!("rejected edit of post {}: {}", post_id, verdict.message);
        return Err(AppError::ContentRejected(verdict.message));
    }

    let changes = PostChanges {
        title: update.title,
        content: update.content,
    };
    store
        .update_post(post_id, owner_id, &changes)
        .await?
        .ok_or(AppError::NotFound("Post"))
}

/// Deletes a post without checking who asks; callers run the ownership guard first
pub async fn delete_post(store: &dyn Store, post_id: i32) -> Result<(), AppError> {
    if store.delete_post(post_id).await? {
        log::info!("deleted post {}", post_id);
        Ok(())
    } else {
        Err(AppError::NotFound("Post"))
    }
}
