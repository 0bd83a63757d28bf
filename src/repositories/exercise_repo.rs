use rusqlite::Connection;

use crate::db::{self, is_unique_violation, DbPool};
use crate::error::{AppError, Result};
use crate::models::{CreateExercise, Exercise, ExerciseQuery, FromSqliteRow, UpdateExercise};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

fn name_taken(conn: &Connection, name: &str, except_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM exercises WHERE name = ? COLLATE NOCASE AND id != ?",
        [name, except_id],
        |row| row.get(0),
    )
}

fn duplicate_name() -> AppError {
    AppError::validation("name", "Exercise with this name already exists.")
}

fn map_unique(e: rusqlite::Error) -> AppError {
    if is_unique_violation(&e) {
        duplicate_name()
    } else {
        e.into()
    }
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        let id = id.to_string();
        db::blocking(&self.pool, move |conn| {
            Ok(Exercise::query_opt(conn, "SELECT * FROM exercises WHERE id = ?", [&id])?)
        })
        .await
    }

    /// Catalog listing, optionally narrowed by a term matched against name,
    /// description and target muscles.
    pub async fn search(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>> {
        let pattern = query.like_pattern();
        db::blocking(&self.pool, move |conn| {
            Ok(Exercise::query_all(
                conn,
                "SELECT * FROM exercises
                 WHERE ?1 IS NULL
                    OR name LIKE ?1 ESCAPE '\\'
                    OR description LIKE ?1 ESCAPE '\\'
                    OR target_muscles LIKE ?1 ESCAPE '\\'
                 ORDER BY name",
                [&pattern],
            )?)
        })
        .await
    }

    pub async fn create(&self, form: CreateExercise) -> Result<Exercise> {
        let exercise = form.into_exercise();
        exercise.validate()?;
        let record = exercise.clone();

        db::blocking(&self.pool, move |conn| {
            if name_taken(conn, &record.name, &record.id)? {
                return Err(duplicate_name());
            }
            conn.execute(
                "INSERT INTO exercises (id, name, description, instructions, target_muscles, equipment)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    record.id,
                    record.name,
                    record.description,
                    record.instructions,
                    record.target_muscles,
                    record.equipment
                ],
            )
            .map_err(map_unique)?;
            Ok(())
        })
        .await?;

        tracing::debug!(exercise_id = %exercise.id, "Created exercise {}", exercise.name);
        Ok(exercise)
    }

    pub async fn update(&self, id: &str, changes: UpdateExercise) -> Result<Exercise> {
        let mut exercise = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise"))?;
        exercise.apply(changes);
        exercise.validate()?;
        let record = exercise.clone();

        db::blocking(&self.pool, move |conn| {
            if name_taken(conn, &record.name, &record.id)? {
                return Err(duplicate_name());
            }
            conn.execute(
                "UPDATE exercises
                 SET name = ?, description = ?, instructions = ?, target_muscles = ?, equipment = ?
                 WHERE id = ?",
                rusqlite::params![
                    record.name,
                    record.description,
                    record.instructions,
                    record.target_muscles,
                    record.equipment,
                    record.id
                ],
            )
            .map_err(map_unique)?;
            Ok(())
        })
        .await?;

        Ok(exercise)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM exercises WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }
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

    fn form(name: &str, target_muscles: &str) -> CreateExercise {
        CreateExercise {
            name: name.to_string(),
            description: format!("{} description", name),
            instructions: "Do it slowly".to_string(),
            target_muscles: target_muscles.to_string(),
            equipment: Some("bodyweight".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_exercise() {
        let repo = ExerciseRepository::new(setup_test_db());

        let exercise = repo.create(form("Push Ups", "chest, triceps")).await.unwrap();
        let found = repo.find_by_id(&exercise.id).await.unwrap();

        assert_eq!(found, Some(exercise));
    }

    #[tokio::test]
    async fn test_find_by_id_not_exists() {
        let repo = ExerciseRepository::new(setup_test_db());

        assert!(repo.find_by_id("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_name() {
        let repo = ExerciseRepository::new(setup_test_db());
        repo.create(form("Push Ups", "chest")).await.unwrap();

        match repo.create(form("push ups", "chest")).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("expected name validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_rejected() {
        let repo = ExerciseRepository::new(setup_test_db());
        repo.create(form("Push Ups", "chest")).await.unwrap();
        let squats = repo.create(form("Squats", "legs")).await.unwrap();

        let renamed = repo
            .update(
                &squats.id,
                UpdateExercise {
                    name: Some("Push Ups".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(renamed, Err(AppError::Validation { .. })));

        let kept = repo
            .update(
                &squats.id,
                UpdateExercise {
                    name: Some("Squats".to_string()),
                    equipment: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(kept.equipment, None);
    }

    #[tokio::test]
    async fn test_search_by_target_muscles() {
        let repo = ExerciseRepository::new(setup_test_db());
        repo.create(form("Push Ups", "chest, triceps")).await.unwrap();
        repo.create(form("Squats", "quadriceps, glutes")).await.unwrap();

        let all = repo.search(&ExerciseQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let chest = repo
            .search(&ExerciseQuery {
                search: Some("CHEST".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(chest.len(), 1);
        assert_eq!(chest[0].name, "Push Ups");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = ExerciseRepository::new(setup_test_db());
        let exercise = repo.create(form("Push Ups", "chest")).await.unwrap();

        assert!(repo.delete(&exercise.id).await.unwrap());
        assert!(!repo.delete(&exercise.id).await.unwrap());
    }
}
