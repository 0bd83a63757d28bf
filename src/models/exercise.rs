use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{nullable, require_text, FromSqliteRow};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub target_muscles: String,
    pub equipment: Option<String>,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            instructions: row.get("instructions")?,
            target_muscles: row.get("target_muscles")?,
            equipment: row.get("equipment")?,
        })
    }
}

impl Exercise {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name, 255)?;
        require_text("description", &self.description, 10_000)?;
        require_text("instructions", &self.instructions, 10_000)?;
        require_text("target_muscles", &self.target_muscles, 255)?;
        Ok(())
    }

    pub fn apply(&mut self, changes: UpdateExercise) {
        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(instructions) = changes.instructions {
            self.instructions = instructions;
        }
        if let Some(target_muscles) = changes.target_muscles {
            self.target_muscles = target_muscles;
        }
        if let Some(equipment) = changes.equipment {
            self.equipment = equipment;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub target_muscles: String,
    pub equipment: Option<String>,
}

impl CreateExercise {
    pub fn into_exercise(self) -> Exercise {
        Exercise {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            description: self.description,
            instructions: self.instructions,
            target_muscles: self.target_muscles,
            equipment: self.equipment.filter(|e| !e.trim().is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub target_muscles: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub equipment: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseQuery {
    pub search: Option<String>,
}

impl ExerciseQuery {
    /// LIKE pattern for the search term, escaped with `\`.
    pub fn like_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{}%", escaped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        let query = |s: &str| ExerciseQuery {
            search: Some(s.to_string()),
        };
        assert_eq!(query("chest").like_pattern().as_deref(), Some("%chest%"));
        assert_eq!(query("  ").like_pattern(), None);
        assert_eq!(query("50%").like_pattern().as_deref(), Some("%50\\%%"));
        assert_eq!(ExerciseQuery::default().like_pattern(), None);
    }

    #[test]
    fn test_create_requires_fields() {
        let exercise = CreateExercise {
            name: "Push Ups".to_string(),
            description: String::new(),
            instructions: "Lower and push".to_string(),
            target_muscles: "chest".to_string(),
            equipment: Some("".to_string()),
        }
        .into_exercise();
        assert!(exercise.validate().is_err());
        assert_eq!(exercise.equipment, None);
    }
}
