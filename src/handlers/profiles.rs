use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, deleted, AppJson};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{Profile, ProfileInput};
use crate::repositories::ProfileRepository;

#[derive(Clone)]
pub struct ProfilesState {
    pub profile_repo: ProfileRepository,
}

pub async fn list(
    State(state): State<ProfilesState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(state.profile_repo.find_by_user(&auth_user.id).await?))
}

pub async fn create(
    State(state): State<ProfilesState>,
    auth_user: AuthUser,
    AppJson(form): AppJson<ProfileInput>,
) -> Result<Response> {
    let profile = state.profile_repo.create(&auth_user.id, form).await?;
    Ok(created(profile))
}

pub async fn show(
    State(state): State<ProfilesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>> {
    Ok(Json(state.profile_repo.find(&id, &auth_user.id).await?))
}

pub async fn update(
    State(state): State<ProfilesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(changes): AppJson<ProfileInput>,
) -> Result<Json<Profile>> {
    Ok(Json(
        state
            .profile_repo
            .update(&id, &auth_user.id, changes)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<ProfilesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    deleted(state.profile_repo.delete(&id, &auth_user.id).await?, "Profile")
}
