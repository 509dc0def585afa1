use diesel::{pg::PgConnection, prelude::*};
use serde::Serialize;

use crate::schema::users;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// `<salt>$<sha256 hex>` of the password, see [crate::auth::password]
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "users"]
pub struct UserForm {
    pub username: String,
    pub hashed_password: String,
}

impl User {
    /// Pushes a new user row and returns it with its generated id
    pub fn create(conn: &PgConnection, form: &UserForm) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(form)
            .get_result(conn)
    }

    pub fn find_by_id(conn: &PgConnection, user_id: i32) -> QueryResult<Option<User>> {
        users::table.find(user_id).first(conn).optional()
    }

    /// Returns the user registered under `name`, if any.
    ///
    /// # Example
    /// ```
    /// match User::find_by_username(&conn, "username")? {
    ///     Some(user) => println!("{:?}", user),
    ///     None => println!("No user found"),
    /// }
    /// ```
    pub fn find_by_username(conn: &PgConnection, name: &str) -> QueryResult<Option<User>> {
        users::table
            .filter(users::username.eq(name))
            .first(conn)
            .optional()
    }
}
