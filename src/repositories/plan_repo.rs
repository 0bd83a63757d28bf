use rusqlite::{Connection, TransactionBehavior};

use crate::db::{self, DbPool};
use crate::error::{AppError, Result};
use crate::models::{
    CreatePlanItem, CreateWorkoutPlan, FromSqliteRow, PlanItemDetail, PlanItemQuery,
    UpdatePlanItem, UpdateWorkoutPlan, WorkoutPlan, WorkoutPlanDetail,
};

/// Plan items joined to their exercise and owning plan. Callers append the
/// WHERE clause; `p.user_id` is always available for ownership filtering.
const ITEM_DETAIL_SELECT: &str = "
    SELECT wi.id AS id,
           wi.workout_plan_id AS workout_plan_id,
           wi.exercise_id AS exercise_id,
           wi.position AS position,
           wi.sets AS sets,
           wi.repetitions AS repetitions,
           wi.duration_seconds AS duration_seconds,
           wi.distance_meters AS distance_meters,
           e.name AS exercise_name,
           e.description AS exercise_description,
           e.instructions AS exercise_instructions,
           e.target_muscles AS exercise_target_muscles,
           e.equipment AS exercise_equipment
    FROM workout_exercises wi
    JOIN exercises e ON e.id = wi.exercise_id
    JOIN workout_plans p ON p.id = wi.workout_plan_id";

#[derive(Clone)]
pub struct PlanRepository {
    pool: DbPool,
}

fn find_plan(conn: &Connection, id: &str, user_id: &str) -> Result<WorkoutPlan> {
    WorkoutPlan::query_opt(
        conn,
        "SELECT * FROM workout_plans WHERE id = ? AND user_id = ?",
        [id, user_id],
    )?
    .ok_or_else(|| AppError::not_found("Workout plan"))
}

fn plan_items(conn: &Connection, plan_id: &str) -> Result<Vec<PlanItemDetail>> {
    let sql = format!(
        "{} WHERE wi.workout_plan_id = ? ORDER BY wi.position, wi.rowid",
        ITEM_DETAIL_SELECT
    );
    Ok(PlanItemDetail::query_all(conn, &sql, [plan_id])?)
}

fn plan_detail(conn: &Connection, id: &str, user_id: &str) -> Result<WorkoutPlanDetail> {
    let plan = find_plan(conn, id, user_id)?;
    let exercises = plan_items(conn, &plan.id)?;
    Ok(WorkoutPlanDetail { plan, exercises })
}

fn find_item(conn: &Connection, id: &str, user_id: &str) -> Result<PlanItemDetail> {
    let sql = format!("{} WHERE wi.id = ? AND p.user_id = ?", ITEM_DETAIL_SELECT);
    PlanItemDetail::query_opt(conn, &sql, [id, user_id])?
        .ok_or_else(|| AppError::not_found("Workout exercise"))
}

fn ensure_exercise_exists(conn: &Connection, exercise_id: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM exercises WHERE id = ?",
        [exercise_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(AppError::validation(
            "exercise_id",
            "Exercise does not exist.",
        ));
    }
    Ok(())
}

impl PlanRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The user's plans, newest first, each with its ordered items.
    pub async fn list_plans(&self, user_id: &str) -> Result<Vec<WorkoutPlanDetail>> {
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let conn: &Connection = conn;
            let plans = WorkoutPlan::query_all(
                conn,
                "SELECT * FROM workout_plans WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
                [&user_id],
            )?;

            plans
                .into_iter()
                .map(|plan| {
                    let exercises = plan_items(conn, &plan.id)?;
                    Ok(WorkoutPlanDetail { plan, exercises })
                })
                .collect()
        })
        .await
    }

    pub async fn find_plan(&self, id: &str, user_id: &str) -> Result<WorkoutPlanDetail> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| plan_detail(conn, &id, &user_id)).await
    }

    pub async fn create_plan(
        &self,
        user_id: &str,
        form: CreateWorkoutPlan,
    ) -> Result<WorkoutPlanDetail> {
        let plan = form.into_plan(user_id);
        plan.validate()?;

        let record = plan.clone();
        db::blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO workout_plans (id, user_id, title, goal, frequency_per_week, session_duration_minutes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    record.id,
                    record.user_id,
                    record.title,
                    record.goal,
                    record.frequency_per_week,
                    record.session_duration_minutes,
                    record.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        tracing::debug!(plan_id = %plan.id, "Created workout plan {}", plan.title);
        Ok(WorkoutPlanDetail {
            plan,
            exercises: Vec::new(),
        })
    }

    pub async fn update_plan(
        &self,
        id: &str,
        user_id: &str,
        changes: UpdateWorkoutPlan,
    ) -> Result<WorkoutPlanDetail> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let mut plan = find_plan(conn, &id, &user_id)?;
            plan.apply(changes);
            plan.validate()?;

            conn.execute(
                "UPDATE workout_plans
                 SET title = ?, goal = ?, frequency_per_week = ?, session_duration_minutes = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    plan.title,
                    plan.goal,
                    plan.frequency_per_week,
                    plan.session_duration_minutes,
                    plan.id,
                    plan.user_id
                ],
            )?;

            let exercises = plan_items(conn, &plan.id)?;
            Ok(WorkoutPlanDetail { plan, exercises })
        })
        .await
    }

    /// Items go with the plan; sessions started from it keep their snapshot.
    pub async fn delete_plan(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_plans WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn list_items(
        &self,
        user_id: &str,
        query: &PlanItemQuery,
    ) -> Result<Vec<PlanItemDetail>> {
        let user_id = user_id.to_string();
        let plan_id = query.workout_plan.clone();
        db::blocking(&self.pool, move |conn| {
            let sql = format!(
                "{} WHERE p.user_id = ?1 AND (?2 IS NULL OR wi.workout_plan_id = ?2)
                 ORDER BY wi.workout_plan_id, wi.position, wi.rowid",
                ITEM_DETAIL_SELECT
            );
            Ok(PlanItemDetail::query_all(
                conn,
                &sql,
                rusqlite::params![user_id, plan_id],
            )?)
        })
        .await
    }

    pub async fn find_item(&self, id: &str, user_id: &str) -> Result<PlanItemDetail> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| find_item(conn, &id, &user_id)).await
    }

    /// Append an item to an owned plan. Position is one past the current last.
    pub async fn create_item(&self, user_id: &str, form: CreatePlanItem) -> Result<PlanItemDetail> {
        form.check_references()?;
        let mut item = form.into_item();
        item.validate()?;

        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            find_plan(&tx, &item.workout_plan_id, &user_id)?;
            ensure_exercise_exists(&tx, &item.exercise_id)?;

            item.position = tx.query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM workout_exercises WHERE workout_plan_id = ?",
                [&item.workout_plan_id],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO workout_exercises
                 (id, workout_plan_id, exercise_id, position, sets, repetitions, duration_seconds, distance_meters)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    item.id,
                    item.workout_plan_id,
                    item.exercise_id,
                    item.position,
                    item.sets,
                    item.repetitions,
                    item.duration_seconds,
                    item.distance_meters
                ],
            )?;

            let detail = find_item(&tx, &item.id, &user_id)?;
            tx.commit()?;
            Ok(detail)
        })
        .await
    }

    pub async fn update_item(
        &self,
        id: &str,
        user_id: &str,
        changes: UpdatePlanItem,
    ) -> Result<PlanItemDetail> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let mut item = find_item(conn, &id, &user_id)?.item;
            item.apply(changes);
            item.validate()?;
            ensure_exercise_exists(conn, &item.exercise_id)?;

            conn.execute(
                "UPDATE workout_exercises
                 SET exercise_id = ?, sets = ?, repetitions = ?, duration_seconds = ?, distance_meters = ?
                 WHERE id = ?",
                rusqlite::params![
                    item.exercise_id,
                    item.sets,
                    item.repetitions,
                    item.duration_seconds,
                    item.distance_meters,
                    item.id
                ],
            )?;

            find_item(conn, &item.id, &user_id)
        })
        .await
    }

    pub async fn delete_item(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_exercises
                 WHERE id = ?
                   AND workout_plan_id IN (SELECT id FROM workout_plans WHERE user_id = ?)",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
