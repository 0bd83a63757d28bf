use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

use crate::repositories::token_repo::TOKEN_TTL_DAYS;

pub const TOKEN_COOKIE_NAME: &str = "token";

pub fn create_token_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(TOKEN_TTL_DAYS))
        .build()
}

pub fn get_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

pub fn remove_token_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cookie_attributes() {
        let cookie = create_token_cookie("abc");
        assert_eq!(cookie.name(), TOKEN_COOKIE_NAME);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_get_token_from_jar() {
        let jar = CookieJar::new().add(create_token_cookie("abc"));
        assert_eq!(get_token(&jar).as_deref(), Some("abc"));
        assert_eq!(get_token(&CookieJar::new()), None);
    }
}
