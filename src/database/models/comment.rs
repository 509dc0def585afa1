use chrono::{NaiveDate, NaiveDateTime};
use diesel::{
    pg::PgConnection,
    prelude::*,
    sql_types::{BigInt, Date, Timestamp},
};
use serde::{Deserialize, Serialize};

use super::Page;
use crate::schema::comments;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub post_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    /// Set from the moderation verdict at creation, never cleared
    pub blocked: bool,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "comments"]
pub struct CommentForm {
    pub content: String,
    pub post_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub blocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[table_name = "comments"]
pub struct CommentChanges {
    pub content: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// One row of the daily comment breakdown
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize, Deserialize)]
pub struct CommentAnalytics {
    #[sql_type = "Date"]
    #[serde(rename = "date")]
    pub day: NaiveDate,
    #[sql_type = "BigInt"]
    pub created_comments: i64,
    #[sql_type = "BigInt"]
    pub blocked_comments: i64,
}

const DAILY_COUNTS_SQL: &str = "\
    SELECT date(created_at) AS day, \
           COUNT(*) FILTER (WHERE NOT blocked) AS created_comments, \
           COUNT(*) FILTER (WHERE blocked) AS blocked_comments \
    FROM comments \
    WHERE created_at >= $1 AND created_at <= $2 \
    GROUP BY date(created_at) \
    ORDER BY date(created_at)";

impl Comment {
    pub fn create(conn: &PgConnection, form: &CommentForm) -> QueryResult<Comment> {
        diesel::insert_into(comments::table)
            .values(form)
            .get_result(conn)
    }

    pub fn find(conn: &PgConnection, comment_id: i32) -> QueryResult<Option<Comment>> {
        comments::table.find(comment_id).first(conn).optional()
    }

    /** Returns the comment only if it was posted on `post_id` */
    pub fn find_on_post(
        conn: &PgConnection,
        comment_id: i32,
        post_id: i32,
    ) -> QueryResult<Option<Comment>> {
        comments::table
            .filter(comments::id.eq(comment_id))
            .filter(comments::post_id.eq(post_id))
            .first(conn)
            .optional()
    }

    /** Returns the unblocked comments of a post in insertion order */
    pub fn list_visible(conn: &PgConnection, post_id: i32, page: Page) -> QueryResult<Vec<Comment>> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .filter(comments::blocked.eq(false))
            .order(comments::id.asc())
            .offset(page.offset())
            .limit(page.size())
            .load(conn)
    }

    pub fn update(
        conn: &PgConnection,
        comment_id: i32,
        changes: &CommentChanges,
    ) -> QueryResult<Option<Comment>> {
        diesel::update(comments::table.find(comment_id))
            .set(changes)
            .get_result(conn)
            .optional()
    }

    pub fn delete(conn: &PgConnection, comment_id: i32) -> QueryResult<usize> {
        diesel::delete(comments::table.find(comment_id)).execute(conn)
    }

    /** Counts unblocked and blocked comments per calendar day of `created_at`,
     * for rows with `start <= created_at <= end` */
    pub fn daily_counts(
        conn: &PgConnection,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> QueryResult<Vec<CommentAnalytics>> {
        diesel::sql_query(DAILY_COUNTS_SQL)
            .bind::<Timestamp, _>(start)
            .bind::<Timestamp, _>(end)
            .load(conn)
    }
}
