use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};

use super::PgPool;
use crate::app::AppError;

embed_migrations!("migrations");

/// Builds a connection pool for the database at `database_url`.
///
/// # Example
/// ```
/// let pool = psql_connect_to_db(&settings.database_url, settings.database_pool_size)?;
/// ```
pub fn psql_connect_to_db(database_url: &str, max_size: u32) -> Result<PgPool, AppError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}

/// Applies every migration under `migrations/` that the database has not seen yet
pub fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let conn = pool.get()?;
    embedded_migrations::run(&*conn).map_err(|err| AppError::PersistenceFailure(err.to_string()))
}
