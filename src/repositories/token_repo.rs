use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::error::Result;

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access: String,
    pub expires_at: DateTime<Utc>,
}

/// Opaque bearer tokens issued at login.
#[derive(Clone)]
pub struct TokenRepository {
    pool: DbPool,
}

impl TokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn issue(&self, user_id: &str) -> Result<IssuedToken> {
        let user_id = user_id.to_string();
        let now = Utc::now();
        let issued = IssuedToken {
            access: Uuid::new_v4().simple().to_string(),
            expires_at: now + Duration::days(TOKEN_TTL_DAYS),
        };
        let record = issued.clone();

        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO auth_tokens (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![record.access, user_id, now, record.expires_at],
            )?;
            Ok(())
        })
        .await?;

        Ok(issued)
    }

    /// The owning user id of a live token. Expired tokens are deleted on sight.
    pub async fn find_user_id(&self, token: &str) -> Result<Option<String>> {
        let token = token.to_string();
        let now = Utc::now();

        db::blocking(&self.pool, move |conn| {
            let found: Option<(String, DateTime<Utc>)> = conn
                .query_row(
                    "SELECT user_id, expires_at FROM auth_tokens WHERE token = ?",
                    [&token],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match found {
                Some((_, expires_at)) if expires_at <= now => {
                    conn.execute("DELETE FROM auth_tokens WHERE token = ?", [&token])?;
                    Ok(None)
                }
                Some((user_id, _)) => Ok(Some(user_id)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn revoke(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        db::blocking(&self.pool, move |conn| {
            conn.execute("DELETE FROM auth_tokens WHERE token = ?", [&token])?;
            Ok(())
        })
        .await
    }

    pub async fn cleanup_expired(&self) -> Result<usize> {
        let now = Utc::now();
        db::blocking(&self.pool, move |conn| {
            let removed = conn.execute(
                "DELETE FROM auth_tokens WHERE expires_at <= ?",
                rusqlite::params![now],
            )?;
            Ok(removed)
        })
        .await
    }
}
