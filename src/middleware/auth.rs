use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::cookie::get_token;
use crate::error::AppError;
use crate::repositories::TokenRepository;

/// The account behind a live bearer token, taken from the `Authorization`
/// header or the `token` cookie.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub token: String,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = parts
            .extensions
            .get::<TokenRepository>()
            .cloned()
            .ok_or_else(|| AppError::Internal("token repository not installed".to_string()))?;

        let token = bearer_token(parts)
            .or_else(|| get_token(&CookieJar::from_headers(&parts.headers)))
            .ok_or(AppError::Unauthorized)?;

        let id = tokens
            .find_user_id(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser { id, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(
            bearer_token(&parts_with_header("Bearer abc123")).as_deref(),
            Some("abc123")
        );
        assert_eq!(bearer_token(&parts_with_header("Basic abc123")), None);
        assert_eq!(bearer_token(&parts_with_header("Bearer ")), None);
    }
}
