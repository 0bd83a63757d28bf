use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, deleted, AppJson, AppQuery};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreatePlanItem, PlanItemDetail, PlanItemQuery, UpdatePlanItem};
use crate::repositories::PlanRepository;

#[derive(Clone)]
pub struct PlanItemsState {
    pub plan_repo: PlanRepository,
}

pub async fn list(
    State(state): State<PlanItemsState>,
    auth_user: AuthUser,
    AppQuery(query): AppQuery<PlanItemQuery>,
) -> Result<Json<Vec<PlanItemDetail>>> {
    Ok(Json(state.plan_repo.list_items(&auth_user.id, &query).await?))
}

pub async fn create(
    State(state): State<PlanItemsState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<CreatePlanItem>,
) -> Result<Response> {
    let item = state.plan_repo.create_item(&auth_user.id, form).await?;
    Ok(created(item))
}

pub async fn show(
    State(state): State<PlanItemsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PlanItemDetail>> {
    Ok(Json(state.plan_repo.find_item(&id, &auth_user.id).await?))
}

pub async fn update(
    State(state): State<PlanItemsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(changes): AppJson<UpdatePlanItem>,
) -> Result<Json<PlanItemDetail>> {
    Ok(Json(
        state
            .plan_repo
            .update_item(&id, &auth_user.id, changes)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<PlanItemsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(
        state.plan_repo.delete_item(&id, &auth_user.id).await?,
        "Workout exercise",
    )
}
