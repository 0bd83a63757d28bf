/// Stores a closed enum as its `as_str()` text and reads it back through `FromStr`.
macro_rules! sql_text_enum {
    ($ty:ty) => {
        impl rusqlite::types::ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl rusqlite::types::FromSql for $ty {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value.as_str().and_then(|s| {
                    s.parse()
                        .map_err(|e| rusqlite::types::FromSqlError::Other(Box::new(e)))
                })
            }
        }
    };
}

pub mod exercise;
pub mod fitness_goal;
pub mod from_row;
pub mod plan;
pub mod profile;
pub mod user;
pub mod weight_log;
pub mod workout_session;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub use exercise::{CreateExercise, Exercise, ExerciseQuery, UpdateExercise};
pub use fitness_goal::{CreateFitnessGoal, FitnessGoal, GoalQuery, GoalType, UpdateFitnessGoal};
pub use from_row::FromSqliteRow;
pub use plan::{
    CreatePlanItem, CreateWorkoutPlan, PlanItem, PlanItemDetail, PlanItemQuery, UpdatePlanItem,
    UpdateWorkoutPlan, WorkoutPlan, WorkoutPlanDetail,
};
pub use profile::{Profile, ProfileInput};
pub use user::{LoginCredentials, RegisterUser, User};
pub use weight_log::{CreateWeightLog, UpdateWeightLog, WeightLog};
pub use workout_session::{
    CompleteSession, CompleteSet, ExerciseStatus, NextStep, SessionExercise,
    SessionExerciseDetail, SessionQuery, SessionStatus, SetLog, StartSession,
    UpdateExerciseStatus, WorkoutSession, WorkoutSessionDetail,
};

#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// For PATCH bodies: absent stays `None`, explicit `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Required text field with a "missing" message shared across payloads.
pub(crate) fn require_text(
    field: &str,
    value: &str,
    max_len: usize,
) -> crate::error::Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AppError::validation(
            field,
            "This field is required.",
        ));
    }
    if trimmed.chars().count() > max_len {
        return Err(crate::error::AppError::validation(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        ));
    }
    Ok(())
}
