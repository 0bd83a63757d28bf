use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{nullable, require_text, Exercise, FromSqliteRow};
use crate::error::{AppError, Result};

fn default_frequency() -> i64 {
    3
}

fn default_session_duration() -> i64 {
    60
}

fn default_sets() -> i64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub goal: Option<String>,
    pub frequency_per_week: i64,
    pub session_duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutPlan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            goal: row.get("goal")?,
            frequency_per_week: row.get("frequency_per_week")?,
            session_duration_minutes: row.get("session_duration_minutes")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl WorkoutPlan {
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title, 255)?;
        if self.frequency_per_week < 1 {
            return Err(AppError::validation(
                "frequency_per_week",
                "Ensure this value is greater than or equal to 1.",
            ));
        }
        if self.session_duration_minutes < 1 {
            return Err(AppError::validation(
                "session_duration_minutes",
                "Ensure this value is greater than or equal to 1.",
            ));
        }
        Ok(())
    }

    pub fn apply(&mut self, changes: UpdateWorkoutPlan) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(goal) = changes.goal {
            self.goal = goal;
        }
        if let Some(frequency) = changes.frequency_per_week {
            self.frequency_per_week = frequency;
        }
        if let Some(duration) = changes.session_duration_minutes {
            self.session_duration_minutes = duration;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutPlan {
    #[serde(default)]
    pub title: String,
    pub goal: Option<String>,
    #[serde(default = "default_frequency")]
    pub frequency_per_week: i64,
    #[serde(default = "default_session_duration")]
    pub session_duration_minutes: i64,
}

impl CreateWorkoutPlan {
    pub fn into_plan(self, user_id: &str) -> WorkoutPlan {
        WorkoutPlan {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: self.title,
            goal: self.goal,
            frequency_per_week: self.frequency_per_week,
            session_duration_minutes: self.session_duration_minutes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkoutPlan {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub goal: Option<Option<String>>,
    pub frequency_per_week: Option<i64>,
    pub session_duration_minutes: Option<i64>,
}

/// One exercise prescription inside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub workout_plan_id: String,
    pub exercise_id: String,
    #[serde(rename = "order")]
    pub position: i64,
    pub sets: i64,
    pub repetitions: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub distance_meters: Option<i64>,
}

impl FromSqliteRow for PlanItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_plan_id: row.get("workout_plan_id")?,
            exercise_id: row.get("exercise_id")?,
            position: row.get("position")?,
            sets: row.get("sets")?,
            repetitions: row.get("repetitions")?,
            duration_seconds: row.get("duration_seconds")?,
            distance_meters: row.get("distance_meters")?,
        })
    }
}

impl PlanItem {
    /// Sets must be positive; at most one of reps/duration/distance may be prescribed,
    /// and a prescribed one may be zero but not negative.
    pub fn validate(&self) -> Result<()> {
        if self.sets < 1 {
            return Err(AppError::validation(
                "sets",
                "Ensure this value is greater than or equal to 1.",
            ));
        }

        let metrics = [
            ("repetitions", self.repetitions),
            ("duration_seconds", self.duration_seconds),
            ("distance_meters", self.distance_meters),
        ];
        for (field, value) in metrics {
            if matches!(value, Some(v) if v < 0) {
                return Err(AppError::validation(
                    field,
                    "Ensure this value is greater than or equal to 0.",
                ));
            }
        }

        if metrics.iter().filter(|(_, v)| v.is_some()).count() > 1 {
            return Err(AppError::validation(
                "repetitions",
                "Specify only one of repetitions, duration_seconds or distance_meters.",
            ));
        }

        Ok(())
    }

    pub fn apply(&mut self, changes: UpdatePlanItem) {
        if let Some(exercise_id) = changes.exercise_id {
            self.exercise_id = exercise_id;
        }
        if let Some(sets) = changes.sets {
            self.sets = sets;
        }
        if let Some(repetitions) = changes.repetitions {
            self.repetitions = repetitions;
        }
        if let Some(duration) = changes.duration_seconds {
            self.duration_seconds = duration;
        }
        if let Some(distance) = changes.distance_meters {
            self.distance_meters = distance;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanItemDetail {
    #[serde(flatten)]
    pub item: PlanItem,
    pub exercise: Exercise,
}

/// Expects the item columns plus the joined exercise columns prefixed `exercise_`.
impl FromSqliteRow for PlanItemDetail {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let item = PlanItem::from_row(row)?;
        let exercise = Exercise {
            id: item.exercise_id.clone(),
            name: row.get("exercise_name")?,
            description: row.get("exercise_description")?,
            instructions: row.get("exercise_instructions")?,
            target_muscles: row.get("exercise_target_muscles")?,
            equipment: row.get("exercise_equipment")?,
        };
        Ok(Self { item, exercise })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutPlanDetail {
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub exercises: Vec<PlanItemDetail>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanItem {
    #[serde(default)]
    pub workout_plan_id: String,
    #[serde(default)]
    pub exercise_id: String,
    #[serde(default = "default_sets")]
    pub sets: i64,
    pub repetitions: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub distance_meters: Option<i64>,
}

impl CreatePlanItem {
    pub fn check_references(&self) -> Result<()> {
        require_text("workout_plan_id", &self.workout_plan_id, 64)?;
        require_text("exercise_id", &self.exercise_id, 64)
    }

    /// Position is assigned by the repository on insert.
    pub fn into_item(self) -> PlanItem {
        PlanItem {
            id: Uuid::new_v4().to_string(),
            workout_plan_id: self.workout_plan_id,
            exercise_id: self.exercise_id,
            position: 0,
            sets: self.sets,
            repetitions: self.repetitions,
            duration_seconds: self.duration_seconds,
            distance_meters: self.distance_meters,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlanItem {
    pub exercise_id: Option<String>,
    pub sets: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub repetitions: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub duration_seconds: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub distance_meters: Option<Option<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanItemQuery {
    pub workout_plan: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> PlanItem {
        PlanItem {
            id: "i1".to_string(),
            workout_plan_id: "p1".to_string(),
            exercise_id: "e1".to_string(),
            position: 0,
            sets: 3,
            repetitions: Some(12),
            duration_seconds: None,
            distance_meters: None,
        }
    }

    #[test]
    fn test_single_metric_is_valid() {
        assert!(item().validate().is_ok());

        let mut sets_only = item();
        sets_only.repetitions = None;
        assert!(sets_only.validate().is_ok());
    }

    #[test]
    fn test_two_metrics_rejected() {
        let mut both = item();
        both.duration_seconds = Some(60);
        assert!(matches!(
            both.validate(),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_zero_metric_allowed_negative_rejected() {
        let mut zero = item();
        zero.repetitions = Some(0);
        assert!(zero.validate().is_ok());

        let mut negative = item();
        negative.repetitions = None;
        negative.distance_meters = Some(-5);
        match negative.validate() {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "distance_meters"),
            other => panic!("expected distance_meters validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_sets_rejected() {
        let mut zero = item();
        zero.sets = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_switch_metric_with_patch() {
        let mut switched = item();
        switched.apply(
            serde_json::from_str(r#"{"repetitions": null, "duration_seconds": 45}"#).unwrap(),
        );
        assert_eq!(switched.repetitions, None);
        assert_eq!(switched.duration_seconds, Some(45));
        assert!(switched.validate().is_ok());
    }

    #[test]
    fn test_create_plan_defaults() {
        let form: CreateWorkoutPlan = serde_json::from_str(r#"{"title": "Push"}"#).unwrap();
        let plan = form.into_plan("u1");
        assert_eq!(plan.frequency_per_week, 3);
        assert_eq!(plan.session_duration_minutes, 60);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_plan_item_serializes_order() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["order"], 0);
        assert!(json.get("position").is_none());
    }
}
