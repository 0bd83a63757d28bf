//! The session engine. Every transition runs in a `BEGIN IMMEDIATE`
//! transaction so the read-check-write sequence holds SQLite's write lock.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};

use crate::db::{self, is_unique_violation, DbPool};
use crate::error::{AppError, Result};
use crate::models::{
    CompleteSession, CompleteSet, FromSqliteRow, NextStep, PlanItem, SessionExercise,
    SessionExerciseDetail, SessionQuery, SetLog, StartSession, UpdateExerciseStatus,
    WorkoutSession, WorkoutSessionDetail,
};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

fn active_session_exists() -> AppError {
    AppError::Conflict("You already have an active workout session".to_string())
}

fn find_session(conn: &Connection, id: &str, user_id: &str) -> Result<WorkoutSession> {
    WorkoutSession::query_opt(
        conn,
        "SELECT * FROM workout_sessions WHERE id = ? AND user_id = ?",
        [id, user_id],
    )?
    .ok_or_else(|| AppError::not_found("Workout session"))
}

fn find_session_exercise(conn: &Connection, id: &str, user_id: &str) -> Result<SessionExercise> {
    SessionExercise::query_opt(
        conn,
        "SELECT se.* FROM session_exercises se
         JOIN workout_sessions s ON s.id = se.session_id
         WHERE se.id = ? AND s.user_id = ?",
        [id, user_id],
    )?
    .ok_or_else(|| AppError::not_found("Session exercise"))
}

fn find_set(conn: &Connection, id: &str, user_id: &str) -> Result<SetLog> {
    SetLog::query_opt(
        conn,
        "SELECT sl.* FROM set_logs sl
         JOIN session_exercises se ON se.id = sl.session_exercise_id
         JOIN workout_sessions s ON s.id = se.session_id
         WHERE sl.id = ? AND s.user_id = ?",
        [id, user_id],
    )?
    .ok_or_else(|| AppError::not_found("Set log"))
}

fn sets_for(conn: &Connection, session_exercise_id: &str) -> Result<Vec<SetLog>> {
    Ok(SetLog::query_all(
        conn,
        "SELECT * FROM set_logs WHERE session_exercise_id = ? ORDER BY set_number",
        [session_exercise_id],
    )?)
}

fn exercise_detail(conn: &Connection, exercise: SessionExercise) -> Result<SessionExerciseDetail> {
    let sets = sets_for(conn, &exercise.id)?;
    Ok(SessionExerciseDetail { exercise, sets })
}

fn session_detail(conn: &Connection, session: WorkoutSession) -> Result<WorkoutSessionDetail> {
    let exercises = SessionExercise::query_all(
        conn,
        "SELECT * FROM session_exercises WHERE session_id = ? ORDER BY position, rowid",
        [&session.id],
    )?;

    let session_exercises = exercises
        .into_iter()
        .map(|exercise| exercise_detail(conn, exercise))
        .collect::<Result<Vec<_>>>()?;

    Ok(WorkoutSessionDetail {
        session,
        session_exercises,
    })
}

fn save_session(conn: &Connection, session: &WorkoutSession) -> Result<()> {
    conn.execute(
        "UPDATE workout_sessions
         SET status = ?, completed_at = ?, total_duration_minutes = ?, notes = ?
         WHERE id = ?",
        rusqlite::params![
            session.status,
            session.completed_at,
            session.total_duration_minutes,
            session.notes,
            session.id
        ],
    )?;
    Ok(())
}

fn save_session_exercise(conn: &Connection, exercise: &SessionExercise) -> Result<()> {
    conn.execute(
        "UPDATE session_exercises
         SET status = ?, completed_sets = ?, started_at = ?, completed_at = ?, notes = ?
         WHERE id = ?",
        rusqlite::params![
            exercise.status,
            exercise.completed_sets,
            exercise.started_at,
            exercise.completed_at,
            exercise.notes,
            exercise.id
        ],
    )?;
    Ok(())
}

fn insert_snapshot(conn: &Connection, exercise: &SessionExercise) -> Result<()> {
    conn.execute(
        "INSERT INTO session_exercises
         (id, session_id, workout_exercise_id, exercise_id, exercise_name, position,
          planned_sets, planned_repetitions, planned_duration_seconds, planned_distance_meters,
          status, completed_sets)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            exercise.id,
            exercise.session_id,
            exercise.workout_exercise_id,
            exercise.exercise_id,
            exercise.exercise_name,
            exercise.position,
            exercise.planned_sets,
            exercise.planned_repetitions,
            exercise.planned_duration_seconds,
            exercise.planned_distance_meters,
            exercise.status,
            exercise.completed_sets
        ],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO set_logs (id, session_exercise_id, set_number, completed) VALUES (?, ?, ?, ?)",
    )?;
    for set in exercise.placeholder_sets() {
        stmt.execute(rusqlite::params![
            set.id,
            set.session_exercise_id,
            set.set_number,
            set.completed
        ])?;
    }
    Ok(())
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Snapshot an owned plan into a new in-progress session with one
    /// placeholder set per planned set.
    pub async fn start_session(
        &self,
        user_id: &str,
        form: StartSession,
    ) -> Result<WorkoutSessionDetail> {
        form.validate()?;
        let user_id = user_id.to_string();

        let detail = db::blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let plan_owned: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM workout_plans WHERE id = ? AND user_id = ?",
                [&form.workout_plan_id, &user_id],
                |row| row.get(0),
            )?;
            if !plan_owned {
                return Err(AppError::not_found("Workout plan"));
            }

            let active: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM workout_sessions WHERE user_id = ? AND status = 'in_progress'",
                [&user_id],
                |row| row.get(0),
            )?;
            if active {
                return Err(active_session_exists());
            }

            let session = WorkoutSession::start(&user_id, &form.workout_plan_id, Utc::now());
            tx.execute(
                "INSERT INTO workout_sessions (id, user_id, workout_plan_id, status, started_at)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    session.id,
                    session.user_id,
                    session.workout_plan_id,
                    session.status,
                    session.started_at
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    active_session_exists()
                } else {
                    e.into()
                }
            })?;

            let items = {
                let mut stmt = tx.prepare(
                    "SELECT wi.*, e.name AS exercise_name
                     FROM workout_exercises wi
                     JOIN exercises e ON e.id = wi.exercise_id
                     WHERE wi.workout_plan_id = ?
                     ORDER BY wi.position, wi.rowid",
                )?;
                let rows = stmt.query_map([&form.workout_plan_id], |row| {
                    Ok((PlanItem::from_row(row)?, row.get::<_, String>("exercise_name")?))
                })?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            };

            for (item, exercise_name) in &items {
                insert_snapshot(&tx, &SessionExercise::snapshot(&session.id, item, exercise_name))?;
            }

            let detail = session_detail(&tx, session)?;
            tx.commit()?;
            Ok(detail)
        })
        .await?;

        tracing::info!(
            session_id = %detail.session.id,
            exercises = detail.session_exercises.len(),
            sets = detail.set_count(),
            "Started workout session"
        );
        Ok(detail)
    }

    /// Record actual values for one set and roll the count up to its exercise.
    pub async fn complete_set(&self, id: &str, user_id: &str, form: CompleteSet) -> Result<SetLog> {
        form.validate()?;
        let id = id.to_string();
        let user_id = user_id.to_string();

        db::blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let now = Utc::now();

            let mut set = find_set(&tx, &id, &user_id)?;
            set.complete(form, now)?;
            tx.execute(
                "UPDATE set_logs
                 SET completed = ?, repetitions = ?, weight_kg = ?, duration_seconds = ?,
                     distance_meters = ?, rest_seconds = ?, notes = ?, completed_at = ?
                 WHERE id = ?",
                rusqlite::params![
                    set.completed,
                    set.repetitions,
                    set.weight_kg,
                    set.duration_seconds,
                    set.distance_meters,
                    set.rest_seconds,
                    set.notes,
                    set.completed_at,
                    set.id
                ],
            )?;

            let completed: i64 = tx.query_row(
                "SELECT COUNT(*) FROM set_logs WHERE session_exercise_id = ? AND completed = 1",
                [&set.session_exercise_id],
                |row| row.get(0),
            )?;
            let mut exercise = find_session_exercise(&tx, &set.session_exercise_id, &user_id)?;
            exercise.record_completed_sets(completed, now);
            save_session_exercise(&tx, &exercise)?;

            tx.commit()?;
            tracing::info!(
                set_id = %set.id,
                session_exercise_id = %exercise.id,
                completed_sets = exercise.completed_sets,
                "Completed set {}",
                set.set_number
            );
            Ok(set)
        })
        .await
    }

    pub async fn update_exercise_status(
        &self,
        id: &str,
        user_id: &str,
        form: UpdateExerciseStatus,
    ) -> Result<SessionExercise> {
        let id = id.to_string();
        let user_id = user_id.to_string();

        db::blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut exercise = find_session_exercise(&tx, &id, &user_id)?;
            exercise.set_status(form.status, form.notes, Utc::now());
            save_session_exercise(&tx, &exercise)?;

            tx.commit()?;
            tracing::info!(
                session_exercise_id = %exercise.id,
                "Session exercise moved to {}",
                exercise.status.as_str()
            );
            Ok(exercise)
        })
        .await
    }

    pub async fn complete_session(
        &self,
        id: &str,
        user_id: &str,
        form: CompleteSession,
    ) -> Result<WorkoutSession> {
        let id = id.to_string();
        let user_id = user_id.to_string();

        db::blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut session = find_session(&tx, &id, &user_id)?;
            session.complete(form.notes, Utc::now())?;
            save_session(&tx, &session)?;

            tx.commit()?;
            tracing::info!(
                session_id = %session.id,
                minutes = session.total_duration_minutes,
                "Completed workout session"
            );
            Ok(session)
        })
        .await
    }

    pub async fn cancel_session(&self, id: &str, user_id: &str) -> Result<WorkoutSession> {
        let id = id.to_string();
        let user_id = user_id.to_string();

        db::blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut session = find_session(&tx, &id, &user_id)?;
            session.cancel(Utc::now())?;
            save_session(&tx, &session)?;

            tx.commit()?;
            tracing::info!(session_id = %session.id, "Cancelled workout session");
            Ok(session)
        })
        .await
    }

    pub async fn find_active(&self, user_id: &str) -> Result<WorkoutSessionDetail> {
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let session = WorkoutSession::query_opt(
                conn,
                "SELECT * FROM workout_sessions WHERE user_id = ? AND status = 'in_progress'",
                [&user_id],
            )?
            .ok_or_else(|| AppError::NotFound("No active workout session".to_string()))?;
            session_detail(conn, session)
        })
        .await
    }

    /// Newest first, optionally narrowed to one status.
    pub async fn list_sessions(
        &self,
        user_id: &str,
        query: &SessionQuery,
    ) -> Result<Vec<WorkoutSessionDetail>> {
        let user_id = user_id.to_string();
        let status = query.status;
        db::blocking(&self.pool, move |conn| {
            let conn: &Connection = conn;
            let sessions = WorkoutSession::query_all(
                conn,
                "SELECT * FROM workout_sessions
                 WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)
                 ORDER BY started_at DESC, rowid DESC",
                rusqlite::params![user_id, status],
            )?;

            sessions
                .into_iter()
                .map(|session| session_detail(conn, session))
                .collect()
        })
        .await
    }

    pub async fn get_session(&self, id: &str, user_id: &str) -> Result<WorkoutSessionDetail> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let session = find_session(conn, &id, &user_id)?;
            session_detail(conn, session)
        })
        .await
    }

    pub async fn get_session_exercise(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<SessionExerciseDetail> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let exercise = find_session_exercise(conn, &id, &user_id)?;
            exercise_detail(conn, exercise)
        })
        .await
    }

    pub async fn delete_session(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_sessions WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    /// First exercise still pending or in progress, by order.
    pub async fn next_exercise(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<NextStep<SessionExerciseDetail>> {
        let session_id = session_id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let session = find_session(conn, &session_id, &user_id)?;
            let next = SessionExercise::query_opt(
                conn,
                "SELECT * FROM session_exercises
                 WHERE session_id = ? AND status IN ('pending', 'in_progress')
                 ORDER BY position, rowid
                 LIMIT 1",
                [&session.id],
            )?;

            match next {
                Some(exercise) => Ok(NextStep::Pending(exercise_detail(conn, exercise)?)),
                None => Ok(NextStep::AllComplete),
            }
        })
        .await
    }

    /// First uncompleted set of an exercise, by set number.
    pub async fn next_set(
        &self,
        session_exercise_id: &str,
        user_id: &str,
    ) -> Result<NextStep<SetLog>> {
        let session_exercise_id = session_exercise_id.to_string();
        let user_id = user_id.to_string();
        db::blocking(&self.pool, move |conn| {
            let exercise = find_session_exercise(conn, &session_exercise_id, &user_id)?;
            let next = SetLog::query_opt(
                conn,
                "SELECT * FROM set_logs
                 WHERE session_exercise_id = ? AND completed = 0
                 ORDER BY set_number
                 LIMIT 1",
                [&exercise.id],
            )?;

            Ok(next.map_or(NextStep::AllComplete, NextStep::Pending))
        })
        .await
    }
}
