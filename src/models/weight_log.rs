use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightLog {
    pub id: String,
    pub user_id: String,
    pub weight: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WeightLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub fn validate_weight(weight: f64) -> Result<()> {
    if !(weight.is_finite() && weight > 0.0) {
        return Err(AppError::validation("weight", "Must be a positive number."));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateWeightLog {
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWeightLog {
    pub weight: f64,
}
