use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_MODERATION_URL: &str = "https://www.purgomalum.com/service/containsprofanity";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("environment variable '{0}' not set")]
    Missing(&'static str),
    #[error("environment variable '{key}' has an invalid value: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration, read once at start-up and passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_pool_size: u32,
    pub bind_address: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub moderation_url: String,
    pub moderation_timeout: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    /// Requires `DATABASE_URL` and `JWT_SECRET`; everything else has a default.
    pub fn from_env() -> Result<Settings, SettingsError> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(SettingsError::Missing(key));

        Ok(Settings {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            database_pool_size: parsed(&lookup, "DATABASE_POOL_SIZE", 10)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| String::from("127.0.0.1")),
            port: parsed(&lookup, "PORT", 8080)?,
            access_token_expire_minutes: parsed(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            moderation_url: lookup("MODERATION_URL")
                .unwrap_or_else(|| String::from(DEFAULT_MODERATION_URL)),
            moderation_timeout: Duration::from_secs(parsed(&lookup, "MODERATION_TIMEOUT_SECS", 5)?),
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| SettingsError::Invalid { key, value }),
        None => Ok(default),
    }
}
