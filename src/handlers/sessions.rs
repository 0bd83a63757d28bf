use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{created, deleted, AppJson, AppQuery, Detail, MaybeJson};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{
    CompleteSession, CompleteSet, NextStep, SessionExercise, SessionExerciseDetail, SessionQuery,
    SetLog, StartSession, UpdateExerciseStatus, WorkoutSession, WorkoutSessionDetail,
};
use crate::repositories::WorkoutRepository;

#[derive(Clone)]
pub struct SessionsState {
    pub workout_repo: WorkoutRepository,
}

fn next_step<T: serde::Serialize>(step: NextStep<T>, done: &'static str) -> Response {
    match step {
        NextStep::Pending(next) => Json(next).into_response(),
        NextStep::AllComplete => Json(Detail { detail: done }).into_response(),
    }
}

pub async fn list(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    AppQuery(query): AppQuery<SessionQuery>,
) -> Result<Json<Vec<WorkoutSessionDetail>>> {
    Ok(Json(
        state
            .workout_repo
            .list_sessions(&auth_user.id, &query)
            .await?,
    ))
}

pub async fn start(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<StartSession>,
) -> Result<Response> {
    let session = state.workout_repo.start_session(&auth_user.id, form).await?;
    Ok(created(session))
}

pub async fn active(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
) -> Result<Json<WorkoutSessionDetail>> {
    Ok(Json(state.workout_repo.find_active(&auth_user.id).await?))
}

pub async fn show(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutSessionDetail>> {
    Ok(Json(state.workout_repo.get_session(&id, &auth_user.id).await?))
}

pub async fn delete(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(
        state.workout_repo.delete_session(&id, &auth_user.id).await?,
        "Workout session",
    )
}

/// Body is optional; an empty request completes without notes.
pub async fn complete(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    MaybeJson(form): MaybeJson<CompleteSession>,
) -> Result<Json<WorkoutSession>> {
    Ok(Json(
        state
            .workout_repo
            .complete_session(&id, &auth_user.id, form)
            .await?,
    ))
}

pub async fn cancel(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutSession>> {
    Ok(Json(
        state
            .workout_repo
            .cancel_session(&id, &auth_user.id)
            .await?,
    ))
}

pub async fn next_exercise(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let step = state.workout_repo.next_exercise(&id, &auth_user.id).await?;
    Ok(next_step(step, "All exercises completed"))
}

pub async fn show_exercise(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionExerciseDetail>> {
    Ok(Json(
        state
            .workout_repo
            .get_session_exercise(&id, &auth_user.id)
            .await?,
    ))
}

pub async fn update_exercise_status(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(form): AppJson<UpdateExerciseStatus>,
) -> Result<Json<SessionExercise>> {
    Ok(Json(
        state
            .workout_repo
            .update_exercise_status(&id, &auth_user.id, form)
            .await?,
    ))
}

pub async fn next_set(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let step = state.workout_repo.next_set(&id, &auth_user.id).await?;
    Ok(next_step(step, "All sets completed"))
}

/// Body is optional; an empty request records the set without actuals.
pub async fn complete_set(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    MaybeJson(form): MaybeJson<CompleteSet>,
) -> Result<Json<SetLog>> {
    Ok(Json(
        state
            .workout_repo
            .complete_set(&id, &auth_user.id, form)
            .await?,
    ))
}
