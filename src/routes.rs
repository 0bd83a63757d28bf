use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    auth, exercises, goals, health, plan_items, plans, profiles, sessions, weight_logs,
};
use crate::repositories::Repositories;

pub fn create_router(repos: Repositories) -> Router {
    let auth_state = auth::AuthState {
        user_repo: repos.users.clone(),
        token_repo: repos.tokens.clone(),
    };
    let profiles_state = profiles::ProfilesState {
        profile_repo: repos.profiles.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo: repos.exercises.clone(),
    };
    let plans_state = plans::PlansState {
        plan_repo: repos.plans.clone(),
    };
    let plan_items_state = plan_items::PlanItemsState {
        plan_repo: repos.plans.clone(),
    };
    let sessions_state = sessions::SessionsState {
        workout_repo: repos.workouts.clone(),
    };
    let weight_logs_state = weight_logs::WeightLogsState {
        weight_log_repo: repos.weight_logs.clone(),
    };
    let goals_state = goals::GoalsState {
        goal_repo: repos.goals.clone(),
    };

    Router::new()
        .route("/health", get(health::health_check))
        .with_state(repos.pool.clone())
        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .with_state(auth_state)
        // Profiles
        .route("/api/profiles", get(profiles::list).post(profiles::create))
        .route(
            "/api/profiles/{id}",
            get(profiles::show)
                .put(profiles::update)
                .patch(profiles::update)
                .delete(profiles::delete),
        )
        .with_state(profiles_state)
        // Exercise catalog
        .route("/api/exercises", get(exercises::list).post(exercises::create))
        .route(
            "/api/exercises/{id}",
            get(exercises::show)
                .put(exercises::update)
                .patch(exercises::update)
                .delete(exercises::delete),
        )
        .with_state(exercises_state)
        // Plans
        .route("/api/workout-plans", get(plans::list).post(plans::create))
        .route(
            "/api/workout-plans/{id}",
            get(plans::show)
                .put(plans::update)
                .patch(plans::update)
                .delete(plans::delete),
        )
        .with_state(plans_state)
        .route(
            "/api/workout-exercises",
            get(plan_items::list).post(plan_items::create),
        )
        .route(
            "/api/workout-exercises/{id}",
            get(plan_items::show)
                .put(plan_items::update)
                .patch(plan_items::update)
                .delete(plan_items::delete),
        )
        .with_state(plan_items_state)
        // Live sessions
        .route("/api/workout-sessions", get(sessions::list))
        .route("/api/workout-sessions/start", post(sessions::start))
        .route("/api/workout-sessions/active", get(sessions::active))
        .route(
            "/api/workout-sessions/{id}",
            get(sessions::show).delete(sessions::delete),
        )
        .route(
            "/api/workout-sessions/{id}/complete",
            post(sessions::complete),
        )
        .route("/api/workout-sessions/{id}/cancel", post(sessions::cancel))
        .route(
            "/api/workout-sessions/{id}/next-exercise",
            get(sessions::next_exercise),
        )
        .route("/api/session-exercises/{id}", get(sessions::show_exercise))
        .route(
            "/api/session-exercises/{id}/status",
            patch(sessions::update_exercise_status),
        )
        .route(
            "/api/session-exercises/{id}/next-set",
            get(sessions::next_set),
        )
        .route("/api/set-logs/{id}/complete", post(sessions::complete_set))
        .with_state(sessions_state)
        // Body metrics
        .route(
            "/api/weight-logs",
            get(weight_logs::list).post(weight_logs::create),
        )
        .route(
            "/api/weight-logs/{id}",
            get(weight_logs::show)
                .put(weight_logs::update)
                .patch(weight_logs::update)
                .delete(weight_logs::delete),
        )
        .with_state(weight_logs_state)
        .route("/api/fitness-goals", get(goals::list).post(goals::create))
        .route(
            "/api/fitness-goals/{id}",
            get(goals::show)
                .put(goals::update)
                .patch(goals::update)
                .delete(goals::delete),
        )
        .with_state(goals_state)
        // Token lookup for the AuthUser extractor
        .layer(Extension(repos.tokens))
        .layer(TraceLayer::new_for_http())
}
