pub mod db_utils;
pub mod models;

use actix_web::web;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::{
    r2d2::{ConnectionManager, Pool},
    result::Error as DieselError,
    Connection, PgConnection, QueryResult,
};

use crate::app::AppError;
use models::{
    comment::{Comment, CommentAnalytics, CommentChanges, CommentForm},
    post::{Post, PostChanges, PostForm},
    user::{User, UserForm},
    Page,
};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Transactional CRUD over users, posts and comments.
///
/// Each call is its own transaction: it either commits completely or leaves
/// nothing behind.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, form: &UserForm) -> Result<User, AppError>;
    async fn find_user(&self, user_id: i32) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn insert_post(&self, form: &PostForm) -> Result<Post, AppError>;
    async fn find_post(&self, post_id: i32) -> Result<Option<Post>, AppError>;
    async fn list_posts(&self, page: Page) -> Result<Vec<Post>, AppError>;
    /// Only touches the post when both `post_id` and `owner_id` match
    async fn update_post(
        &self,
        post_id: i32,
        owner_id: i32,
        changes: &PostChanges,
    ) -> Result<Option<Post>, AppError>;
    async fn delete_post(&self, post_id: i32) -> Result<bool, AppError>;

    async fn insert_comment(&self, form: &CommentForm) -> Result<Comment, AppError>;
    async fn find_comment(&self, comment_id: i32) -> Result<Option<Comment>, AppError>;
    async fn find_comment_on_post(
        &self,
        comment_id: i32,
        post_id: i32,
    ) -> Result<Option<Comment>, AppError>;
    /// Unblocked comments only, ordered by id
    async fn list_visible_comments(
        &self,
        post_id: i32,
        page: Page,
    ) -> Result<Vec<Comment>, AppError>;
    async fn update_comment(
        &self,
        comment_id: i32,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>, AppError>;
    async fn delete_comment(&self, comment_id: i32) -> Result<bool, AppError>;

    /// Per-day created/blocked counts for comments created in `[start, end]`,
    /// ascending by day, days without comments omitted
    async fn daily_comment_counts(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CommentAnalytics>, AppError>;
}

/** [Store] backed by PostgreSQL through an r2d2 pool.
 * Diesel calls run on actix's blocking thread pool so request workers never
 * wait on the database. */
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs `f` with a pooled connection on the blocking thread pool
    async fn blocking<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        web::block(move || {
            let conn = pool.get()?;
            Ok::<T, AppError>(f(&*conn)?)
        })
        .await?
    }

    /// Same as [PgStore::blocking], wrapped in a transaction
    async fn transaction<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |conn| conn.transaction::<_, DieselError, _>(|| f(conn)))
            .await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, form: &UserForm) -> Result<User, AppError> {
        let form = form.clone();
        self.transaction(move |conn| User::create(conn, &form)).await
    }

    async fn find_user(&self, user_id: i32) -> Result<Option<User>, AppError> {
        self.blocking(move |conn| User::find_by_id(conn, user_id)).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_string();
        self.blocking(move |conn| User::find_by_username(conn, &username))
            .await
    }

    async fn insert_post(&self, form: &PostForm) -> Result<Post, AppError> {
        let form = form.clone();
        self.transaction(move |conn| Post::create(conn, &form)).await
    }

    async fn find_post(&self, post_id: i32) -> Result<Option<Post>, AppError> {
        self.blocking(move |conn| Post::find(conn, post_id)).await
    }

    async fn list_posts(&self, page: Page) -> Result<Vec<Post>, AppError> {
        self.blocking(move |conn| Post::list(conn, page)).await
    }

    async fn update_post(
        &self,
        post_id: i32,
        owner_id: i32,
        changes: &PostChanges,
    ) -> Result<Option<Post>, AppError> {
        let changes = changes.clone();
        self.transaction(move |conn| Post::update_owned(conn, post_id, owner_id, &changes))
            .await
    }

    async fn delete_post(&self, post_id: i32) -> Result<bool, AppError> {
        let deleted = self
            .transaction(move |conn| Post::delete(conn, post_id))
            .await?;
        Ok(deleted > 0)
    }

    async fn insert_comment(&self, form: &CommentForm) -> Result<Comment, AppError> {
        let form = form.clone();
        self.transaction(move |conn| Comment::create(conn, &form))
            .await
    }

    async fn find_comment(&self, comment_id: i32) -> Result<Option<Comment>, AppError> {
        self.blocking(move |conn| Comment::find(conn, comment_id))
            .await
    }

    async fn find_comment_on_post(
        &self,
        comment_id: i32,
        post_id: i32,
    ) -> Result<Option<Comment>, AppError> {
        self.blocking(move |conn| Comment::find_on_post(conn, comment_id, post_id))
            .await
    }

    async fn list_visible_comments(
        &self,
        post_id: i32,
        page: Page,
    ) -> Result<Vec<Comment>, AppError> {
        self.blocking(move |conn| Comment::list_visible(conn, post_id, page))
            .await
    }

    async fn update_comment(
        &self,
        comment_id: i32,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>, AppError> {
        let changes = changes.clone();
        self.transaction(move |conn| Comment::update(conn, comment_id, &changes))
            .await
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<bool, AppError> {
        let deleted = self
            .transaction(move |conn| Comment::delete(conn, comment_id))
            .await?;
        Ok(deleted > 0)
    }

    async fn daily_comment_counts(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CommentAnalytics>, AppError> {
        self.blocking(move |conn| Comment::daily_counts(conn, start, end))
            .await
    }
}
