use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, deleted, AppJson, AppQuery};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateFitnessGoal, FitnessGoal, GoalQuery, UpdateFitnessGoal};
use crate::repositories::GoalRepository;

#[derive(Clone)]
pub struct GoalsState {
    pub goal_repo: GoalRepository,
}

pub async fn list(
    State(state): State<GoalsState>,
    auth_user: AuthUser,
    AppQuery(query): AppQuery<GoalQuery>,
) -> Result<Json<Vec<FitnessGoal>>> {
    Ok(Json(
        state.goal_repo.find_by_user(&auth_user.id, &query).await?,
    ))
}

pub async fn create(
    State(state): State<GoalsState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<CreateFitnessGoal>,
) -> Result<Response> {
    let goal = state.goal_repo.create(&auth_user.id, form).await?;
    Ok(created(goal))
}

pub async fn show(
    State(state): State<GoalsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FitnessGoal>> {
    Ok(Json(state.goal_repo.find(&id, &auth_user.id).await?))
}

pub async fn update(
    State(state): State<GoalsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(changes): AppJson<UpdateFitnessGoal>,
) -> Result<Json<FitnessGoal>> {
    Ok(Json(
        state.goal_repo.update(&id, &auth_user.id, changes).await?,
    ))
}

pub async fn delete(
    State(state): State<GoalsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(
        state.goal_repo.delete(&id, &auth_user.id).await?,
        "Fitness goal",
    )
}
