use chrono::Utc;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::error::{AppError, Result};
use crate::models::weight_log::validate_weight;
use crate::models::{CreateWeightLog, FromSqliteRow, UpdateWeightLog, WeightLog};

#[derive(Clone)]
pub struct WeightLogRepository {
    pool: DbPool,
}

impl WeightLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<WeightLog>> {
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            Ok(WeightLog::query_all(
                conn,
                "SELECT * FROM weight_logs WHERE user_id = ? ORDER BY date DESC, created_at DESC",
                [&user_id],
            )?)
        })
        .await
    }

    pub async fn find(&self, id: &str, user_id: &str) -> Result<WeightLog> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            WeightLog::query_opt(
                conn,
                "SELECT * FROM weight_logs WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?
            .ok_or_else(|| AppError::not_found("Weight log"))
        })
        .await
    }

    /// Logged against today's date.
    pub async fn create(&self, user_id: &str, form: CreateWeightLog) -> Result<WeightLog> {
        validate_weight(form.weight)?;
        let now = Utc::now();
        let log = WeightLog {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            weight: form.weight,
            date: now.date_naive(),
            created_at: now,
        };
        let record = log.clone();

        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO weight_logs (id, user_id, weight, date, created_at) VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    record.id,
                    record.user_id,
                    record.weight,
                    record.date,
                    record.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(log)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        form: UpdateWeightLog,
    ) -> Result<WeightLog> {
        validate_weight(form.weight)?;
        let mut log = self.find(id, user_id).await?;
        log.weight = form.weight;
        let record = log.clone();

        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "UPDATE weight_logs SET weight = ? WHERE id = ? AND user_id = ?",
                rusqlite::params![record.weight, record.id, record.user_id],
            )?;
            Ok(())
        })
        .await?;

        Ok(log)
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM weight_logs WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
