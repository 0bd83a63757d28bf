//! Schema migrations, embedded into the binary.

use crate::db::DbPool;

/// Applied in order; each entry is (name, sql).
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_users.sql",
        include_str!("../migrations/001_create_users.sql"),
    ),
    (
        "002_create_profiles.sql",
        include_str!("../migrations/002_create_profiles.sql"),
    ),
    (
        "003_create_exercises.sql",
        include_str!("../migrations/003_create_exercises.sql"),
    ),
    (
        "004_create_workout_plans.sql",
        include_str!("../migrations/004_create_workout_plans.sql"),
    ),
    (
        "005_create_workout_sessions.sql",
        include_str!("../migrations/005_create_workout_sessions.sql"),
    ),
    (
        "006_create_weight_logs.sql",
        include_str!("../migrations/006_create_weight_logs.sql"),
    ),
    (
        "007_create_fitness_goals.sql",
        include_str!("../migrations/007_create_fitness_goals.sql"),
    ),
];

/// Apply every migration not yet recorded in `_migrations`.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    tracing::info!("Running migrations...");

    let conn = pool.get()?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    for (name, sql) in MIGRATIONS {
        let applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
            [name],
            |row| row.get(0),
        )?;

        if applied {
            tracing::debug!("Skipping already applied migration: {}", name);
            continue;
        }

        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO _migrations (name) VALUES (?)", [name])?;
    }

    tracing::info!("Migrations completed");
    Ok(())
}

/// Apply all migrations without bookkeeping. Meant for fresh in-memory databases.
pub fn run_migrations_for_tests(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    for (_name, sql) in MIGRATIONS {
        conn.execute_batch(sql)?;
    }

    Ok(())
}
