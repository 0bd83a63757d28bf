//! Live workout sessions.
//!
//! A session is a snapshot of a plan: one [`SessionExercise`] per plan item and
//! one placeholder [`SetLog`] per planned set, all created when the session
//! starts. The transitions below are pure; the repository applies them inside
//! a write transaction.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{require_text, FromSqliteRow, PlanItem, UnknownVariant};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::InProgress)
    }
}

impl FromStr for SessionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(UnknownVariant {
                kind: "session status",
                value: other.to_string(),
            }),
        }
    }
}

sql_text_enum!(SessionStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl ExerciseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseStatus::Pending => "pending",
            ExerciseStatus::InProgress => "in_progress",
            ExerciseStatus::Completed => "completed",
            ExerciseStatus::Skipped => "skipped",
        }
    }

    /// Still waiting to be (or being) performed.
    pub fn is_open(&self) -> bool {
        matches!(self, ExerciseStatus::Pending | ExerciseStatus::InProgress)
    }

    pub fn is_finished(&self) -> bool {
        !self.is_open()
    }
}

impl FromStr for ExerciseStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ExerciseStatus::Pending),
            "in_progress" => Ok(ExerciseStatus::InProgress),
            "completed" => Ok(ExerciseStatus::Completed),
            "skipped" => Ok(ExerciseStatus::Skipped),
            other => Err(UnknownVariant {
                kind: "exercise status",
                value: other.to_string(),
            }),
        }
    }
}

sql_text_enum!(ExerciseStatus);

/// Whole minutes between start and finish, truncated.
pub fn duration_minutes(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> i64 {
    (completed_at - started_at).num_minutes().max(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub workout_plan_id: Option<String>,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_duration_minutes: Option<i64>,
    pub notes: Option<String>,
}

impl FromSqliteRow for WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            workout_plan_id: row.get("workout_plan_id")?,
            status: row.get("status")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            total_duration_minutes: row.get("total_duration_minutes")?,
            notes: row.get("notes")?,
        })
    }
}

impl WorkoutSession {
    pub fn start(user_id: &str, workout_plan_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            workout_plan_id: Some(workout_plan_id.to_string()),
            status: SessionStatus::InProgress,
            started_at: now,
            completed_at: None,
            total_duration_minutes: None,
            notes: None,
        }
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if !self.status.is_active() {
            return Err(AppError::Conflict(
                "Workout session is not in progress".to_string(),
            ));
        }
        Ok(())
    }

    pub fn complete(&mut self, notes: Option<String>, now: DateTime<Utc>) -> Result<()> {
        self.ensure_in_progress()?;
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        self.total_duration_minutes = Some(duration_minutes(self.started_at, now));
        self.notes = notes;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_in_progress()?;
        self.status = SessionStatus::Cancelled;
        self.completed_at = Some(now);
        Ok(())
    }
}

/// Progress on one exercise within a session; targets are copied from the plan item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExercise {
    pub id: String,
    pub session_id: String,
    pub workout_exercise_id: Option<String>,
    pub exercise_id: Option<String>,
    pub exercise_name: String,
    #[serde(rename = "order")]
    pub position: i64,
    pub planned_sets: i64,
    pub planned_repetitions: Option<i64>,
    pub planned_duration_seconds: Option<i64>,
    pub planned_distance_meters: Option<i64>,
    pub status: ExerciseStatus,
    pub completed_sets: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl FromSqliteRow for SessionExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            workout_exercise_id: row.get("workout_exercise_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            position: row.get("position")?,
            planned_sets: row.get("planned_sets")?,
            planned_repetitions: row.get("planned_repetitions")?,
            planned_duration_seconds: row.get("planned_duration_seconds")?,
            planned_distance_meters: row.get("planned_distance_meters")?,
            status: row.get("status")?,
            completed_sets: row.get("completed_sets")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            notes: row.get("notes")?,
        })
    }
}

impl SessionExercise {
    pub fn snapshot(session_id: &str, item: &PlanItem, exercise_name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            workout_exercise_id: Some(item.id.clone()),
            exercise_id: Some(item.exercise_id.clone()),
            exercise_name: exercise_name.to_string(),
            position: item.position,
            planned_sets: item.sets,
            planned_repetitions: item.repetitions,
            planned_duration_seconds: item.duration_seconds,
            planned_distance_meters: item.distance_meters,
            status: ExerciseStatus::Pending,
            completed_sets: 0,
            started_at: None,
            completed_at: None,
            notes: None,
        }
    }

    /// Empty set records numbered 1..=planned_sets.
    pub fn placeholder_sets(&self) -> Vec<SetLog> {
        (1..=self.planned_sets)
            .map(|n| SetLog::placeholder(&self.id, n))
            .collect()
    }

    /// Store the completed-set count; reaching the plan completes the exercise.
    pub fn record_completed_sets(&mut self, completed_sets: i64, now: DateTime<Utc>) {
        self.completed_sets = completed_sets;
        if completed_sets >= self.planned_sets {
            self.status = ExerciseStatus::Completed;
            self.completed_at.get_or_insert(now);
        }
    }

    /// Manual transition. Any status may follow any other; timestamps are only
    /// stamped the first time.
    pub fn set_status(
        &mut self,
        status: ExerciseStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        if status == ExerciseStatus::InProgress {
            self.started_at.get_or_insert(now);
        }
        if status.is_finished() {
            self.completed_at.get_or_insert(now);
        }
        self.status = status;
        if notes.is_some() {
            self.notes = notes;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    pub id: String,
    pub session_exercise_id: String,
    pub set_number: i64,
    pub completed: bool,
    pub repetitions: Option<i64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i64>,
    pub distance_meters: Option<f64>,
    pub rest_seconds: Option<i64>,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl FromSqliteRow for SetLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_exercise_id: row.get("session_exercise_id")?,
            set_number: row.get("set_number")?,
            completed: row.get("completed")?,
            repetitions: row.get("repetitions")?,
            weight_kg: row.get("weight_kg")?,
            duration_seconds: row.get("duration_seconds")?,
            distance_meters: row.get("distance_meters")?,
            rest_seconds: row.get("rest_seconds")?,
            notes: row.get("notes")?,
            completed_at: row.get("completed_at")?,
        })
    }
}

impl SetLog {
    pub fn placeholder(session_exercise_id: &str, set_number: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_exercise_id: session_exercise_id.to_string(),
            set_number,
            completed: false,
            repetitions: None,
            weight_kg: None,
            duration_seconds: None,
            distance_meters: None,
            rest_seconds: None,
            notes: None,
            completed_at: None,
        }
    }

    /// Fill in actual values. A set is completed once; a second attempt is a conflict.
    pub fn complete(&mut self, actual: CompleteSet, now: DateTime<Utc>) -> Result<()> {
        if self.completed {
            return Err(AppError::Conflict("Set already completed".to_string()));
        }
        self.completed = true;
        self.repetitions = actual.repetitions;
        self.weight_kg = actual.weight_kg;
        self.duration_seconds = actual.duration_seconds;
        self.distance_meters = actual.distance_meters;
        self.rest_seconds = actual.rest_seconds;
        self.notes = actual.notes;
        self.completed_at = Some(now);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionExerciseDetail {
    #[serde(flatten)]
    pub exercise: SessionExercise,
    pub sets: Vec<SetLog>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSessionDetail {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub session_exercises: Vec<SessionExerciseDetail>,
}

impl WorkoutSessionDetail {
    pub fn set_count(&self) -> usize {
        self.session_exercises.iter().map(|e| e.sets.len()).sum()
    }
}

/// Result of the "what's next" queries.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep<T> {
    Pending(T),
    AllComplete,
}

#[derive(Debug, Deserialize)]
pub struct StartSession {
    #[serde(default)]
    pub workout_plan_id: String,
}

impl StartSession {
    pub fn validate(&self) -> Result<()> {
        require_text("workout_plan_id", &self.workout_plan_id, 64)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteSession {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExerciseStatus {
    pub status: ExerciseStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteSet {
    pub repetitions: Option<i64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i64>,
    pub distance_meters: Option<f64>,
    pub rest_seconds: Option<i64>,
    pub notes: Option<String>,
}

impl CompleteSet {
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("repetitions", self.repetitions),
            ("duration_seconds", self.duration_seconds),
            ("rest_seconds", self.rest_seconds),
        ];
        for (field, value) in counts {
            if matches!(value, Some(v) if v < 0) {
                return Err(AppError::validation(field, "Must not be negative."));
            }
        }
        let measures = [
            ("weight_kg", self.weight_kg),
            ("distance_meters", self.distance_meters),
        ];
        for (field, value) in measures {
            if matches!(value, Some(v) if !(v.is_finite() && v >= 0.0)) {
                return Err(AppError::validation(field, "Must not be negative."));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub status: Option<SessionStatus>,
}
