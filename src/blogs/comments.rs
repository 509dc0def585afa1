use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppError,
    database::{
        models::{
            comment::{Comment, CommentChanges, CommentForm},
            Page,
        },
        Store,
    },
    moderation::Moderator,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub content: String,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentUpdate {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Stores a comment on `post_id` with `blocked` set to the moderation verdict.
///
/// A flagged comment is still committed, so it shows up in the analytics,
/// and only then reported to the caller as `ContentRejected`.
pub async fn create_comment(
    store: &dyn Store,
    moderator: &dyn Moderator,
    author_id: i32,
    post_id: i32,
    comment: CommentCreate,
) -> Result<Comment, AppError> {
    store
        .find_post(post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    let verdict = moderator.check(&comment.content).await?;
    let created = store
        .insert_comment(&CommentForm {
            content: comment.content,
            post_id,
            user_id: author_id,
            created_at: comment.created_at.unwrap_or_else(now),
            blocked: verdict.flagged,
        })
        .await?;

    if created.blocked {
        log::info!(
            "comment {} by user {} on post {} stored as blocked",
            created.id,
            author_id,
            post_id
        );
        return Err(AppError::ContentRejected(verdict.message));
    }

    Ok(created)
}

/** Unblocked comments of a post, oldest first */
pub async fn list_comments(
    store: &dyn Store,
    post_id: i32,
    page: Page,
) -> Result<Vec<Comment>, AppError> {
    store.list_visible_comments(post_id, page).await
}

/// Edits a comment. Blocked comments are frozen, and new content that fails
/// moderation is refused without touching the stored row.
pub async fn update_comment(
    store: &dyn Store,
    moderator: &dyn Moderator,
    comment_id: i32,
    update: CommentUpdate,
) -> Result<Comment, AppError> {
    let existing = store
        .find_comment(comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    if existing.blocked {
        return Err(AppError::Forbidden(String::from(
            "Cannot update blocked comment.",
        )));
    }

    if let Some(content) = &update.content {
        if moderator.check(content).await?.flagged {
            return Err(AppError::Forbidden(String::from(
                "Cannot update comment with profanity or inappropriate language.",
            )));
        }
    }

    let changes = CommentChanges {
        content: update.content,
        updated_at: Some(update.updated_at.unwrap_or_else(now)),
    };
    store
        .update_comment(comment_id, &changes)
        .await?
        .ok_or(AppError::NotFound("Comment"))
}

/// Deletes the comment `comment_id` posted on `post_id`. Blocked comments are kept.
pub async fn delete_comment(
    store: &dyn Store,
    comment_id: i32,
    post_id: i32,
) -> Result<(), AppError> {
    let existing = store
        .find_comment_on_post(comment_id, post_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    if existing.blocked {
        return Err(AppError::Forbidden(String::from(
            "Cannot delete blocked comment.",
        )));
    }

    if store.delete_comment(comment_id).await? {
        log::info!("deleted comment {} on post {}", comment_id, post_id);
        Ok(())
    } else {
        Err(AppError::NotFound("Comment"))
    }
}
