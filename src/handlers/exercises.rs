use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, deleted, AppJson, AppQuery};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, Exercise, ExerciseQuery, UpdateExercise};
use crate::repositories::ExerciseRepository;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

pub async fn list(
    State(state): State<ExercisesState>,
    AppQuery(query): AppQuery<ExerciseQuery>,
) -> Result<Json<Vec<Exercise>>> {
    Ok(Json(state.exercise_repo.search(&query).await?))
}

pub async fn show(
    State(state): State<ExercisesState>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>> {
    let exercise = state
        .exercise_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Exercise"))?;
    Ok(Json(exercise))
}

pub async fn create(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
    AppJson(form): AppJson<CreateExercise>,
) -> Result<Response> {
    let exercise = state.exercise_repo.create(form).await?;
    Ok(created(exercise))
}

pub async fn update(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(changes): AppJson<UpdateExercise>,
) -> Result<Json<Exercise>> {
    Ok(Json(state.exercise_repo.update(&id, changes).await?))
}

pub async fn delete(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(state.exercise_repo.delete(&id).await?, "Exercise")
}
