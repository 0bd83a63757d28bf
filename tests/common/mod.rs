use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gymtrack::db::{create_memory_pool, DbPool};
use gymtrack::migrations::run_migrations_for_tests;
use gymtrack::models::{
    CreateExercise, CreatePlanItem, CreateWorkoutPlan, Exercise, RegisterUser, User,
    WorkoutPlanDetail,
};
use gymtrack::repositories::{
    ExerciseRepository, PlanRepository, Repositories, TokenRepository, UserRepository,
};

pub const TEST_PASSWORD: &str = "Sturdy#Pass42";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    gymtrack::routes::create_router(Repositories::new(pool))
}

pub async fn create_test_user(pool: &DbPool, username: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .register(&RegisterUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: TEST_PASSWORD.to_string(),
            confirm_password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap()
}

/// A live bearer token for `user`.
pub async fn create_token(pool: &DbPool, user: &User) -> String {
    let token_repo = TokenRepository::new(pool.clone());
    token_repo.issue(&user.id).await.unwrap().access
}

pub async fn create_test_exercise(pool: &DbPool, name: &str) -> Exercise {
    let exercise_repo = ExerciseRepository::new(pool.clone());
    exercise_repo
        .create(CreateExercise {
            name: name.to_string(),
            description: format!("{} description", name),
            instructions: "Keep good form".to_string(),
            target_muscles: "full body".to_string(),
            equipment: None,
        })
        .await
        .unwrap()
}

/// A plan owned by `user_id` with one item per entry of `sets`, each a
/// distinct exercise prescribing 10 repetitions.
pub async fn create_test_plan(pool: &DbPool, user_id: &str, sets: &[i64]) -> WorkoutPlanDetail {
    let plan_repo = PlanRepository::new(pool.clone());
    let plan = plan_repo
        .create_plan(
            user_id,
            CreateWorkoutPlan {
                title: "Test plan".to_string(),
                goal: None,
                frequency_per_week: 3,
                session_duration_minutes: 60,
            },
        )
        .await
        .unwrap();

    for (i, &count) in sets.iter().enumerate() {
        let exercise = create_test_exercise(pool, &format!("Exercise {} {}", i + 1, user_id)).await;
        plan_repo
            .create_item(
                user_id,
                CreatePlanItem {
                    workout_plan_id: plan.plan.id.clone(),
                    exercise_id: exercise.id,
                    sets: count,
                    repetitions: Some(10),
                    duration_seconds: None,
                    distance_meters: None,
                },
            )
            .await
            .unwrap();
    }

    plan_repo.find_plan(&plan.plan.id, user_id).await.unwrap()
}

/// Send a request and decode the JSON response body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
