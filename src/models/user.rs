use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{require_text, FromSqliteRow};
use crate::error::{AppError, Result};

const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "12345678", "123456789", "1234567890",
    "qwerty123", "qwertyuiop", "iloveyou", "sunshine", "football", "baseball",
    "welcome1", "abc12345", "letmein1", "trustno1", "superman", "11111111",
    "passw0rd", "admin123",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterUser {
    /// Shape checks only; uniqueness is checked against the database.
    pub fn validate(&self) -> Result<()> {
        require_text("username", &self.username, 150)?;
        require_text("email", &self.email, 254)?;
        if !is_valid_email(self.email.trim()) {
            return Err(AppError::validation("email", "Enter a valid email address."));
        }
        require_text("password", &self.password, 255)?;
        require_text("confirm_password", &self.confirm_password, 255)?;
        validate_password(&self.password, self.username.trim(), self.email.trim())?;
        if self.password != self.confirm_password {
            return Err(AppError::validation("password", "Passwords must match."));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

pub fn validate_password(password: &str, username: &str, email: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(
            "password",
            format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "password",
            "This password is entirely numeric.",
        ));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(AppError::validation("password", "This password is too common."));
    }

    let email_local = email.split('@').next().unwrap_or_default();
    for attribute in [username, email_local] {
        let attribute = attribute.to_lowercase();
        if attribute.len() >= 3 && lowered.contains(&attribute) {
            return Err(AppError::validation(
                "password",
                "The password is too similar to the username or email.",
            ));
        }
    }

    Ok(())
}
