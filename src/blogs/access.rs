use crate::{
    app::AppError,
    database::{
        models::{comment::Comment, post::Post, user::User},
        Store,
    },
};

/// Anything that records which user created it
pub trait Owned {
    fn owner_id(&self) -> i32;
    fn noun(&self) -> &'static str;
}

impl Owned for Post {
    fn owner_id(&self) -> i32 {
        self.user_id
    }

    fn noun(&self) -> &'static str {
        "post"
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> i32 {
        self.user_id
    }

    fn noun(&self) -> &'static str {
        "comment"
    }
}

pub fn ensure_owner<R: Owned>(actor: &User, resource: &R) -> Result<(), AppError> {
    if resource.owner_id() == actor.id {
        return Ok(());
    }

    log::info!(
        "user {} denied access to {} owned by {}",
        actor.id,
        resource.noun(),
        resource.owner_id()
    );
    Err(AppError::Forbidden(format!(
        "You are not the owner of this {}",
        resource.noun()
    )))
}

/// Loads a post for mutation by `actor`: `NotFound` when it does not exist,
/// `Forbidden` when somebody else owns it
pub async fn owned_post(store: &dyn Store, actor: &User, post_id: i32) -> Result<Post, AppError> {
    let post = store
        .find_post(post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;
    ensure_owner(actor, &post)?;
    Ok(post)
}

/// Same as [owned_post] for a comment addressed through its post
pub async fn owned_comment(
    store: &dyn Store,
    actor: &User,
    comment_id: i32,
    post_id: i32,
) -> Result<Comment, AppError> {
    let comment = store
        .find_comment_on_post(comment_id, post_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;
    ensure_owner(actor, &comment)?;
    Ok(comment)
}
