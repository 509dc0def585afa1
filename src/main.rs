#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod app;
pub mod database;
pub mod schema;

mod auth;
mod blogs;
mod moderation;
mod routes;
#[cfg(test)]
mod testing;

use std::{io, sync::Arc};

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;

use crate::{
    app::{settings::Settings, AppState},
    auth::token::Authenticator,
    database::{db_utils, PgStore},
    moderation::ProfanityClient,
};

fn startup_error(err: impl ToString) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env().map_err(startup_error)?;

    let postgres_pool =
        db_utils::psql_connect_to_db(&settings.database_url, settings.database_pool_size)
            .map_err(startup_error)?;
    db_utils::run_migrations(&postgres_pool).map_err(startup_error)?;

    let moderator = ProfanityClient::new(settings.moderation_url.as_str(), settings.moderation_timeout)
        .map_err(startup_error)?;
    let authenticator = Authenticator::new(
        &settings.jwt_secret,
        chrono::Duration::minutes(settings.access_token_expire_minutes),
    );

    let app_state = AppState::new(
        Arc::new(PgStore::new(postgres_pool)),
        Arc::new(moderator),
        authenticator,
    );

    log::info!(
        "Server running on {}:{}",
        settings.bind_address,
        settings.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((settings.bind_address.as_str(), settings.port))?
    .run()
    .await
}
