use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{nullable, FromSqliteRow};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl Profile {
    pub fn apply(&mut self, changes: ProfileInput) {
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(height) = changes.height {
            self.height = height;
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("weight", self.weight), ("height", self.height)] {
            if matches!(value, Some(v) if !(v.is_finite() && v > 0.0)) {
                return Err(AppError::validation(field, "Must be a positive number."));
            }
        }
        Ok(())
    }
}

/// Body metrics for both create and partial update.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileInput {
    #[serde(default, deserialize_with = "nullable")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub height: Option<Option<f64>>,
}
