use diesel::{pg::PgConnection, prelude::*};
use serde::{Deserialize, Serialize};

use super::Page;
use crate::schema::posts;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    /// Present in the table but never set by any write path
    pub blocked: bool,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "posts"]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub user_id: i32,
}

/// Fields left as `None` keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[table_name = "posts"]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl Post {
    pub fn create(conn: &PgConnection, form: &PostForm) -> QueryResult<Post> {
        diesel::insert_into(posts::table)
            .values(form)
            .get_result(conn)
    }

    pub fn find(conn: &PgConnection, post_id: i32) -> QueryResult<Option<Post>> {
        posts::table.find(post_id).first(conn).optional()
    }

    /** Finds a post only if `owner_id` created it */
    pub fn find_owned(conn: &PgConnection, post_id: i32, owner_id: i32) -> QueryResult<Option<Post>> {
        posts::table
            .filter(posts::id.eq(post_id))
            .filter(posts::user_id.eq(owner_id))
            .first(conn)
            .optional()
    }

    pub fn list(conn: &PgConnection, page: Page) -> QueryResult<Vec<Post>> {
        posts::table
            .order(posts::id.asc())
            .offset(page.offset())
            .limit(page.size())
            .load(conn)
    }

    /** Applies `changes` to the post with `post_id` owned by `owner_id`.
     * Returns `None` when no such post exists. */
    pub fn update_owned(
        conn: &PgConnection,
        post_id: i32,
        owner_id: i32,
        changes: &PostChanges,
    ) -> QueryResult<Option<Post>> {
        if changes.is_empty() {
            return Post::find_owned(conn, post_id, owner_id);
        }

        diesel::update(
            posts::table
                .filter(posts::id.eq(post_id))
                .filter(posts::user_id.eq(owner_id)),
        )
        .set(changes)
        .get_result(conn)
        .optional()
    }

    pub fn delete(conn: &PgConnection, post_id: i32) -> QueryResult<usize> {
        diesel::delete(posts::table.find(post_id)).execute(conn)
    }
}
