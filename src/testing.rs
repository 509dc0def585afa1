//! In-memory stand-ins for the database and the moderation service, shared by
//! the unit and handler tests.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::{
    app::{AppError, AppState},
    auth::{password, token::Authenticator},
    database::{
        models::{
            comment::{Comment, CommentAnalytics, CommentChanges, CommentForm},
            post::{Post, PostChanges, PostForm},
            user::{User, UserForm},
            Page,
        },
        Store,
    },
    moderation::{Moderator, Verdict},
};

pub const TEST_SECRET: &str = "test_secret";

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// [Store] over a few maps, with the same foreign keys and cascades as the
/// migrations
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

fn page_of<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.skip as usize).take(page.limit as usize).collect()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail like a broken database would
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Every stored comment, blocked ones included, ordered by id
    pub fn comments(&self) -> Vec<Comment> {
        self.tables().comments.values().cloned().collect()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn writable(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceFailure(String::from(
                "connection refused",
            )));
        }
        Ok(self.tables())
    }
}

fn foreign_key(table: &str) -> AppError {
    AppError::PersistenceFailure(format!("foreign key violation on {}", table))
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, form: &UserForm) -> Result<User, AppError> {
        let mut tables = self.writable()?;
        if tables.users.values().any(|user| user.username == form.username) {
            return Err(AppError::BadRequest(String::from(
                "duplicate key value violates unique constraint \"users_username_key\"",
            )));
        }

        let user = User {
            id: tables.next_id(),
            username: form.username.clone(),
            hashed_password: form.hashed_password.clone(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: i32) -> Result<Option<User>, AppError> {
        Ok(self.tables().users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn insert_post(&self, form: &PostForm) -> Result<Post, AppError> {
        let mut tables = self.writable()?;
        if !tables.users.contains_key(&form.user_id) {
            return Err(foreign_key("posts"));
        }

        let post = Post {
            id: tables.next_id(),
            title: form.title.clone(),
            content: form.content.clone(),
            user_id: form.user_id,
            blocked: false,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, post_id: i32) -> Result<Option<Post>, AppError> {
        Ok(self.tables().posts.get(&post_id).cloned())
    }

    async fn list_posts(&self, page: Page) -> Result<Vec<Post>, AppError> {
        Ok(page_of(self.tables().posts.values().cloned(), page))
    }

    async fn update_post(
        &self,
        post_id: i32,
        owner_id: i32,
        changes: &PostChanges,
    ) -> Result<Option<Post>, AppError> {
        let mut tables = self.writable()?;
        let post = match tables.posts.get_mut(&post_id) {
            Some(post) if post.user_id == owner_id => post,
            _ => return Ok(None),
        };

        if let Some(title) = &changes.title {
            post.title = title.clone();
        }
        if let Some(content) = &changes.content {
            post.content = content.clone();
        }
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, post_id: i32) -> Result<bool, AppError> {
        let mut tables = self.writable()?;
        if tables.posts.remove(&post_id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, comment| comment.post_id != post_id);
        Ok(true)
    }

    async fn insert_comment(&self, form: &CommentForm) -> Result<Comment, AppError> {
        let mut tables = self.writable()?;
        if !tables.posts.contains_key(&form.post_id) || !tables.users.contains_key(&form.user_id) {
            return Err(foreign_key("comments"));
        }

        let comment = Comment {
            id: tables.next_id(),
            content: form.content.clone(),
            post_id: form.post_id,
            user_id: form.user_id,
            created_at: form.created_at,
            updated_at: None,
            blocked: form.blocked,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, comment_id: i32) -> Result<Option<Comment>, AppError> {
        Ok(self.tables().comments.get(&comment_id).cloned())
    }

    async fn find_comment_on_post(
        &self,
        comment_id: i32,
        post_id: i32,
    ) -> Result<Option<Comment>, AppError> {
        Ok(self
            .find_comment(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id))
    }

    async fn list_visible_comments(&self, post_id: i32, page: Page) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables();
        let visible = tables
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id && !comment.blocked)
            .cloned();
        Ok(page_of(visible, page))
    }

    async fn update_comment(
        &self,
        comment_id: i32,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>, AppError> {
        let mut tables = self.writable()?;
        let comment = match tables.comments.get_mut(&comment_id) {
            Some(comment) => comment,
            None => return Ok(None),
        };

        if let Some(content) = &changes.content {
            comment.content = content.clone();
        }
        if changes.updated_at.is_some() {
            comment.updated_at = changes.updated_at;
        }
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<bool, AppError> {
        Ok(self.writable()?.comments.remove(&comment_id).is_some())
    }

    async fn daily_comment_counts(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CommentAnalytics>, AppError> {
        let mut days: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        for comment in self.tables().comments.values() {
            if comment.created_at < start || comment.created_at > end {
                continue;
            }
            let counts = days.entry(comment.created_at.date()).or_default();
            if comment.blocked {
                counts.1 += 1;
            } else {
                counts.0 += 1;
            }
        }

        Ok(days
            .into_iter()
            .map(|(day, (created, blocked))| CommentAnalytics {
                day,
                created_comments: created,
                blocked_comments: blocked,
            })
            .collect())
    }
}

/// [Moderator] flagging any text that contains one of its banned words
pub struct ScriptedModerator {
    banned: Vec<String>,
    unavailable: bool,
    checked: Mutex<Vec<String>>,
}

impl ScriptedModerator {
    pub fn banning(words: &[&str]) -> Self {
        Self {
            banned: words.iter().map(|word| word.to_lowercase()).collect(),
            unavailable: false,
            checked: Mutex::new(Vec::new()),
        }
    }

    /// Fails every check like an unreachable moderation service
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Texts sent for checking so far, in order
    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

impl Default for ScriptedModerator {
    fn default() -> Self {
        Self::banning(&["damn", "heck"])
    }
}

#[async_trait]
impl Moderator for ScriptedModerator {
    async fn check(&self, text: &str) -> Result<Verdict, AppError> {
        self.checked.lock().unwrap().push(text.to_string());
        if self.unavailable {
            return Err(AppError::ServiceUnavailable(String::from(
                "connection refused",
            )));
        }

        let text = text.to_lowercase();
        if self.banned.iter().any(|word| text.contains(word.as_str())) {
            Ok(Verdict::flagged())
        } else {
            Ok(Verdict::clean())
        }
    }
}

pub async fn seed_user(store: &MemoryStore, username: &str) -> User {
    store
        .create_user(&UserForm {
            username: username.to_string(),
            hashed_password: password::hash("test_password123"),
        })
        .await
        .unwrap()
}

pub async fn seed_post(store: &MemoryStore, owner: &User) -> Post {
    store
        .insert_post(&PostForm {
            title: String::from("Test title"),
            content: String::from("Test body"),
            user_id: owner.id,
        })
        .await
        .unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn app_state(store: Arc<MemoryStore>, moderator: Arc<ScriptedModerator>) -> AppState {
    AppState::new(
        store,
        moderator,
        Authenticator::new(TEST_SECRET, Duration::minutes(30)),
    )
}

/// `Authorization` header carrying a fresh token for `user`
pub fn bearer(state: &AppState, user: &User) -> (&'static str, String) {
    let token = state.authenticator.issue(user).unwrap();
    ("Authorization", format!("Bearer {}", token.access_token))
}
