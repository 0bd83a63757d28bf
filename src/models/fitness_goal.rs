use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{require_text, FromSqliteRow, UnknownVariant};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Weight,
    Exercise,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Weight => "weight",
            GoalType::Exercise => "exercise",
        }
    }
}

impl FromStr for GoalType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weight" => Ok(GoalType::Weight),
            "exercise" => Ok(GoalType::Exercise),
            other => Err(UnknownVariant {
                kind: "goal type",
                value: other.to_string(),
            }),
        }
    }
}

sql_text_enum!(GoalType);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessGoal {
    pub id: String,
    pub user_id: String,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub description: String,
    pub achieved: bool,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for FitnessGoal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            goal_type: row.get("goal_type")?,
            target_value: row.get("target_value")?,
            description: row.get("description")?,
            achieved: row.get("achieved")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl FitnessGoal {
    pub fn validate(&self) -> Result<()> {
        require_text("description", &self.description, 255)
    }

    pub fn apply(&mut self, changes: UpdateFitnessGoal) {
        if let Some(goal_type) = changes.goal_type {
            self.goal_type = goal_type;
        }
        if let Some(target_value) = changes.target_value {
            self.target_value = target_value;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(achieved) = changes.achieved {
            self.achieved = achieved;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFitnessGoal {
    pub goal_type: GoalType,
    pub target_value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achieved: bool,
}

impl CreateFitnessGoal {
    pub fn into_goal(self, user_id: &str) -> FitnessGoal {
        FitnessGoal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            goal_type: self.goal_type,
            target_value: self.target_value,
            description: self.description,
            achieved: self.achieved,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFitnessGoal {
    pub goal_type: Option<GoalType>,
    pub target_value: Option<f64>,
    pub description: Option<String>,
    pub achieved: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalQuery {
    pub achieved: Option<bool>,
}
