use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{self, is_unique_violation, DbPool};
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, Profile, ProfileInput};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: DbPool,
}

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Profile>> {
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            Ok(Profile::query_all(
                conn,
                "SELECT * FROM profiles WHERE user_id = ?",
                [&user_id],
            )?)
        })
        .await
    }

    pub async fn find(&self, id: &str, user_id: &str) -> Result<Profile> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            Profile::query_opt(
                conn,
                "SELECT * FROM profiles WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?
            .ok_or_else(|| AppError::not_found("Profile"))
        })
        .await
    }

    pub async fn create(&self, user_id: &str, input: ProfileInput) -> Result<Profile> {
        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            weight: input.weight.flatten(),
            height: input.height.flatten(),
            created_at: Utc::now(),
        };
        profile.validate()?;
        let record = profile.clone();

        db::blocking(&self.pool, move |conn| {
            let exists: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM profiles WHERE user_id = ?",
                [&record.user_id],
                |row| row.get(0),
            )?;
            if exists {
                return Err(profile_exists());
            }

            insert_profile(conn, &record)
        })
        .await?;

        Ok(profile)
    }

    pub async fn update(&self, id: &str, user_id: &str, changes: ProfileInput) -> Result<Profile> {
        let mut profile = self.find(id, user_id).await?;
        profile.apply(changes);
        profile.validate()?;
        let record = profile.clone();

        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "UPDATE profiles SET weight = ?, height = ? WHERE id = ? AND user_id = ?",
                rusqlite::params![record.weight, record.height, record.id, record.user_id],
            )?;
            Ok(())
        })
        .await?;

        Ok(profile)
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM profiles WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}

fn profile_exists() -> AppError {
    AppError::validation("user", "You already have a profile.")
}

/// `UNIQUE(user_id)` catches a create that raced past the existence check.
fn insert_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, user_id, weight, height, created_at)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![
            profile.id,
            profile.user_id,
            profile.weight,
            profile.height,
            profile.created_at
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            profile_exists()
        } else {
            e.into()
        }
    })?;
    Ok(())
}
