use axum::{extract::State, http::StatusCode, response::Response, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::{created, AppJson};
use crate::cookie::{create_token_cookie, remove_token_cookie};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{LoginCredentials, RegisterUser, User};
use crate::repositories::{IssuedToken, TokenRepository, UserRepository};

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub token_repo: TokenRepository,
}

#[derive(Serialize)]
struct Registered {
    message: &'static str,
    user: User,
}

pub async fn register(
    State(state): State<AuthState>,
    AppJson(form): AppJson<RegisterUser>,
) -> Result<Response> {
    form.validate()?;
    let user = state.user_repo.register(&form).await?;

    Ok(created(Registered {
        message: "User registered successfully",
        user,
    }))
}

pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    AppJson(credentials): AppJson<LoginCredentials>,
) -> Result<(CookieJar, Json<IssuedToken>)> {
    let user = state
        .user_repo
        .verify_credentials(&credentials.email, &credentials.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let issued = state.token_repo.issue(&user.id).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    let jar = jar.add(create_token_cookie(&issued.access));
    Ok((jar, Json(issued)))
}

pub async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
    auth_user: AuthUser,
) -> Result<(CookieJar, StatusCode)> {
    state.token_repo.revoke(&auth_user.token).await?;
    Ok((jar.add(remove_token_cookie()), StatusCode::NO_CONTENT))
}

pub async fn me(State(state): State<AuthState>, auth_user: AuthUser) -> Result<Json<User>> {
    let user = state
        .user_repo
        .find_by_id(&auth_user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user))
}
