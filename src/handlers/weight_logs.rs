use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, deleted, AppJson};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateWeightLog, UpdateWeightLog, WeightLog};
use crate::repositories::WeightLogRepository;

#[derive(Clone)]
pub struct WeightLogsState {
    pub weight_log_repo: WeightLogRepository,
}

pub async fn list(
    State(state): State<WeightLogsState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<WeightLog>>> {
    Ok(Json(state.weight_log_repo.find_by_user(&auth_user.id).await?))
}

pub async fn create(
    State(state): State<WeightLogsState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<CreateWeightLog>,
) -> Result<Response> {
    let log = state.weight_log_repo.create(&auth_user.id, form).await?;
    Ok(created(log))
}

pub async fn show(
    State(state): State<WeightLogsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WeightLog>> {
    Ok(Json(state.weight_log_repo.find(&id, &auth_user.id).await?))
}

pub async fn update(
    State(state): State<WeightLogsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(form): AppJson<UpdateWeightLog>,
) -> Result<Json<WeightLog>> {
    Ok(Json(
        state
            .weight_log_repo
            .update(&id, &auth_user.id, form)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<WeightLogsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(
        state.weight_log_repo.delete(&id, &auth_user.id).await?,
        "Weight log",
    )
}
