use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{self, is_unique_violation, DbPool};
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, RegisterUser, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        db::blocking(&self.pool, move |conn| {
            Ok(User::query_opt(conn, "SELECT * FROM users WHERE id = ?", [&id])?)
        })
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_string();
        db::blocking(&self.pool, move |conn| {
            Ok(User::query_opt(conn, "SELECT * FROM users WHERE email = ?", [&email])?)
        })
        .await
    }

    /// Create an account from an already validated registration form.
    pub async fn register(&self, form: &RegisterUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password_hash: hash_password(&form.password)?,
            created_at: Utc::now(),
        };
        let record = user.clone();

        db::blocking(&self.pool, move |conn| {
            let taken = |sql: &str, value: &str| -> rusqlite::Result<bool> {
                conn.query_row(sql, [value], |row| row.get(0))
            };
            if taken("SELECT COUNT(*) > 0 FROM users WHERE username = ?", &record.username)? {
                return Err(AppError::validation("username", "Username already exists"));
            }
            if taken("SELECT COUNT(*) > 0 FROM users WHERE email = ?", &record.email)? {
                return Err(AppError::validation("email", "Email already exists"));
            }

            insert_user(conn, &record)
        })
        .await?;

        tracing::info!(user_id = %user.id, "Registered user {}", user.username);
        Ok(user)
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        match self.find_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

/// Inserts `user`, turning a lost race on either unique column into the
/// matching field error.
fn insert_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, password_hash, created_at)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![
            user.id,
            user.username,
            user.email,
            user.password_hash,
            user.created_at
        ],
    )
    .map_err(|e| match duplicate_column(&e) {
        Some("email") => AppError::validation("email", "Email already exists"),
        Some(_) => AppError::validation("username", "Username already exists"),
        None => e.into(),
    })?;
    Ok(())
}

/// The `users` column named by a unique-constraint failure.
fn duplicate_column(err: &rusqlite::Error) -> Option<&'static str> {
    if !is_unique_violation(err) {
        return None;
    }
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("users.email") => {
            Some("email")
        }
        _ => Some("username"),
    }
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    fn form(username: &str, email: &str) -> RegisterUser {
        RegisterUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "Strong#123".to_string(),
            confirm_password: "Strong#123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_verify() {
        let repo = UserRepository::new(setup_test_db());
        let user = repo.register(&form("sergo", "sergo@example.com")).await.unwrap();

        assert_ne!(user.password_hash, "Strong#123");

        let verified = repo
            .verify_credentials("sergo@example.com", "Strong#123")
            .await
            .unwrap();
        assert_eq!(verified.map(|u| u.id), Some(user.id));

        assert!(repo
            .verify_credentials("sergo@example.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .verify_credentials("nobody@example.com", "Strong#123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_email_lookup_ignores_case() {
        let repo = UserRepository::new(setup_test_db());
        repo.register(&form("sergo", "Sergo@Example.com")).await.unwrap();

        assert!(repo.find_by_email("sergo@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let repo = UserRepository::new(setup_test_db());
        repo.register(&form("admin", "admin@gmail.com")).await.unwrap();

        match repo.register(&form("admin", "other@gmail.com")).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "username"),
            other => panic!("expected username validation error, got {:?}", other),
        }
        match repo.register(&form("other", "ADMIN@gmail.com")).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "email"),
            other => panic!("expected email validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_race_reports_colliding_column() {
        let pool = setup_test_db();
        let repo = UserRepository::new(pool.clone());
        let existing = repo.register(&form("admin", "admin@gmail.com")).await.unwrap();
        let conn = pool.get().unwrap();

        let same_email = User {
            id: Uuid::new_v4().to_string(),
            username: "someone".to_string(),
            email: "Admin@Gmail.com".to_string(),
            ..existing.clone()
        };
        match insert_user(&conn, &same_email) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "email"),
            other => panic!("expected email validation error, got {:?}", other),
        }

        let same_username = User {
            id: Uuid::new_v4().to_string(),
            email: "fresh@gmail.com".to_string(),
            ..existing
        };
        match insert_user(&conn, &same_username) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "username"),
            other => panic!("expected username validation error, got {:?}", other),
        }
    }
}
