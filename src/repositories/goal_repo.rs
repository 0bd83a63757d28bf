use crate::db::{self, DbPool};
use crate::error::{AppError, Result};
use crate::models::{CreateFitnessGoal, FitnessGoal, FromSqliteRow, GoalQuery, UpdateFitnessGoal};

#[derive(Clone)]
pub struct GoalRepository {
    pool: DbPool,
}

impl GoalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: &str, query: &GoalQuery) -> Result<Vec<FitnessGoal>> {
        let user_id = user_id.to_string();
        let achieved = query.achieved;
        db::blocking(&self.pool, move |conn| {
            Ok(FitnessGoal::query_all(
                conn,
                "SELECT * FROM fitness_goals
                 WHERE user_id = ?1 AND (?2 IS NULL OR achieved = ?2)
                 ORDER BY created_at DESC",
                rusqlite::params![user_id, achieved],
            )?)
        })
        .await
    }

    pub async fn find(&self, id: &str, user_id: &str) -> Result<FitnessGoal> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            FitnessGoal::query_opt(
                conn,
                "SELECT * FROM fitness_goals WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?
            .ok_or_else(|| AppError::not_found("Fitness goal"))
        })
        .await
    }

    pub async fn create(&self, user_id: &str, form: CreateFitnessGoal) -> Result<FitnessGoal> {
        let goal = form.into_goal(user_id);
        goal.validate()?;
        let record = goal.clone();

        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO fitness_goals (id, user_id, goal_type, target_value, description, achieved, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    record.id,
                    record.user_id,
                    record.goal_type,
                    record.target_value,
                    record.description,
                    record.achieved,
                    record.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(goal)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        changes: UpdateFitnessGoal,
    ) -> Result<FitnessGoal> {
        let mut goal = self.find(id, user_id).await?;
        let newly_achieved = changes.achieved == Some(true) && !goal.achieved;
        goal.apply(changes);
        goal.validate()?;
        let record = goal.clone();

        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "UPDATE fitness_goals
                 SET goal_type = ?, target_value = ?, description = ?, achieved = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    record.goal_type,
                    record.target_value,
                    record.description,
                    record.achieved,
                    record.id,
                    record.user_id
                ],
            )?;
            Ok(())
        })
        .await?;

        if newly_achieved {
            tracing::info!(goal_id = %goal.id, "Fitness goal achieved");
        }
        Ok(goal)
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM fitness_goals WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
