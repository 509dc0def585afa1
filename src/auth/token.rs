use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppError,
    database::{models::user::User, Store},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder
    pub sub: String,
    /// User id of the token holder
    pub uid: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Body returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Issues and validates bearer tokens.
/// Built from configuration at start-up, there is no global signing key.
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl Authenticator {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<Token, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AppError::Internal(err.to_string()))?;

        Ok(Token {
            access_token,
            token_type: String::from("bearer"),
        })
    }

    /// Checks signature and expiry
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                log::debug!("rejected bearer token: {}", err);
                AppError::Unauthorized
            })
    }

    /** Resolves a bearer token to the user it was issued for */
    pub async fn resolve(&self, token: &str, store: &dyn Store) -> Result<User, AppError> {
        let claims = self.decode(token)?;
        match store.find_user(claims.uid).await? {
            Some(user) if user.username == claims.sub => Ok(user),
            _ => Err(AppError::Unauthorized),
        }
    }
}
