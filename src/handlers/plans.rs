use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, deleted, AppJson};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateWorkoutPlan, UpdateWorkoutPlan, WorkoutPlanDetail};
use crate::repositories::PlanRepository;

#[derive(Clone)]
pub struct PlansState {
    pub plan_repo: PlanRepository,
}

pub async fn list(
    State(state): State<PlansState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<WorkoutPlanDetail>>> {
    Ok(Json(state.plan_repo.list_plans(&auth_user.id).await?))
}

pub async fn create(
    State(state): State<PlansState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<CreateWorkoutPlan>,
) -> Result<Response> {
    let plan = state.plan_repo.create_plan(&auth_user.id, form).await?;
    Ok(created(plan))
}

pub async fn show(
    State(state): State<PlansState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutPlanDetail>> {
    Ok(Json(state.plan_repo.find_plan(&id, &auth_user.id).await?))
}

pub async fn update(
    State(state): State<PlansState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(changes): AppJson<UpdateWorkoutPlan>,
) -> Result<Json<WorkoutPlanDetail>> {
    Ok(Json(
        state
            .plan_repo
            .update_plan(&id, &auth_user.id, changes)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<PlansState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(
        state.plan_repo.delete_plan(&id, &auth_user.id).await?,
        "Workout plan",
    )
}
