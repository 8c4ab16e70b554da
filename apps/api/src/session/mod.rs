//! Sessions: the opaque token a student's device keeps to skip logging in again.
//!
//! Tokens are random UUID v4 values issued at login and mapped to a student id in
//! Redis with a sliding TTL. Anything that does not look like a hyphenated v4 UUID
//! is treated as absent and the client is told to purge it.

pub mod auth;
pub mod extractor;
pub mod handlers;

use std::fmt;

use async_trait::async_trait;
use redis::Client as RedisClient;
use tracing::{debug, warn};
use uuid::{Uuid, Variant};

use crate::errors::AppError;

const KEY_PREFIX: &str = "session:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        SessionToken(Uuid::new_v4())
    }

    /// Accepts only the canonical hyphenated form of a version-4 UUID
    /// (case-insensitive, surrounding whitespace ignored).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        if bytes.len() != 36 || [8, 13, 18, 23].iter().any(|&i| bytes[i] != b'-') {
            return None;
        }
        let id = Uuid::parse_str(raw).ok()?;
        (id.get_version_num() == 4 && id.get_variant() == Variant::RFC4122)
            .then_some(SessionToken(id))
    }

    fn key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Where token → student mappings live.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, token: &SessionToken, student_id: Uuid, ttl_secs: u64) -> Result<(), AppError>;
    async fn get(&self, token: &SessionToken) -> Result<Option<Uuid>, AppError>;
    async fn remove(&self, token: &SessionToken) -> Result<(), AppError>;
}

pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, token: &SessionToken, student_id: Uuid, ttl_secs: u64) -> Result<(), AppError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(token.key())
            .arg(student_id.to_string())
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut con)
            .await?;
        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Uuid>, AppError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = redis::cmd("GET")
            .arg(token.key())
            .query_async(&mut con)
            .await?;
        match stored.map(|s| Uuid::parse_str(&s)) {
            Some(Ok(student_id)) => Ok(Some(student_id)),
            Some(Err(_)) => {
                warn!("Purging corrupt session entry");
                redis::cmd("DEL")
                    .arg(token.key())
                    .query_async::<_, i64>(&mut con)
                    .await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: &SessionToken) -> Result<(), AppError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(token.key())
            .query_async::<_, i64>(&mut con)
            .await?;
        Ok(())
    }
}

/// What a presented token turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Missing,
    /// Not a hyphenated UUID v4: the client should purge it.
    Malformed,
    /// Well-formed but unknown or expired: also purged.
    Unknown(SessionToken),
    Active(SessionToken, Uuid),
}

pub async fn resolve_token(
    store: &dyn SessionStore,
    raw: Option<&str>,
) -> Result<TokenState, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(TokenState::Missing);
    };
    let Some(token) = SessionToken::parse(raw) else {
        debug!("Rejecting malformed session token");
        return Ok(TokenState::Malformed);
    };
    Ok(match store.get(&token).await? {
        Some(student_id) => TokenState::Active(token, student_id),
        None => TokenState::Unknown(token),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-process store for router tests; TTLs are ignored.
    #[derive(Default)]
    pub struct MemorySessionStore {
        entries: Mutex<HashMap<Uuid, Uuid>>,
    }

    #[async_trait]
    impl SessionStore for MemorySessionStore {
        async fn put(&self, token: &SessionToken, student_id: Uuid, _ttl_secs: u64) -> Result<(), AppError> {
            self.entries.lock().unwrap().insert(token.0, student_id);
            Ok(())
        }

        async fn get(&self, token: &SessionToken) -> Result<Option<Uuid>, AppError> {
            Ok(self.entries.lock().unwrap().get(&token.0).copied())
        }

        async fn remove(&self, token: &SessionToken) -> Result<(), AppError> {
            self.entries.lock().unwrap().remove(&token.0);
            Ok(())
        }
    }
}
