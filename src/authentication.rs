use std::sync::Arc;

use crate::errors::RequestError;
use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
struct AuthClaim {
    id: i64,
    exp: i64,
}

/// Signing material for bearer tokens, shared with handlers through an
/// `Extension` layer.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: time::Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry: time::Duration::days(expiry_days),
        }
    }

    pub fn issue_token(&self, id: i64) -> Result<String> {
        let expiry_date = OffsetDateTime::now_utc() + self.expiry;
        self.encode(AuthClaim {
            id,
            exp: expiry_date.unix_timestamp(),
        })
    }

    fn encode(&self, claim: AuthClaim) -> Result<String> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claim, &self.encoding)
            .context("Failed to generate jwt token")
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify_token(&self, token: &str) -> Option<i64> {
        match jsonwebtoken::decode::<AuthClaim>(
            token,
            &self.decoding,
            &jsonwebtoken::Validation::default(),
        ) {
            Ok(token_data) => Some(token_data.claims.id),
            Err(e) => {
                log::debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }
}

/// An authenticated caller. Used directly as an extractor it rejects
/// anonymous requests with 401.
pub struct AuthUser {
    pub id: i64,
}

/// Optional identity. A missing, malformed or expired token is treated the
/// same as no token at all.
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn get_id(&self) -> Option<i64> {
        self.0.as_ref().map(|a| a.id)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let keys = match parts.extensions.get::<Arc<JwtKeys>>() {
            Some(keys) => keys,
            None => {
                log::error!("JwtKeys extension is missing from the router");
                return Err(RequestError::ServerError);
            }
        };
        let id = bearer_token(parts).and_then(|token| keys.verify_token(token));
        Ok(MaybeUser(id.map(|id| AuthUser { id })))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(user),
            MaybeUser(None) => Err(RequestError::NotAuthorized("Authentication required")),
        }
    }
}

pub async fn verify_password_argon2(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Stored password hash is malformed"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
