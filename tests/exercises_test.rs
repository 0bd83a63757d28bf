mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_catalog_is_public_but_writes_need_auth() {
    let pool = common::setup_test_db();
    let exercise = common::create_test_exercise(&pool, "Push Ups").await;
    let app = common::create_test_app(pool);

    let (status, list) = common::send(&app, Method::GET, "/api/exercises", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, found) = common::send(
        &app,
        Method::GET,
        &format!("/api/exercises/{}", exercise.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["name"], "Push Ups");

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/exercises",
        None,
        Some(json!({"name": "Squats"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_search() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice").await;
    let token = common::create_token(&pool, &user).await;
    let app = common::create_test_app(pool);

    for (name, muscles) in [("Bench Press", "chest, triceps"), ("Deadlift", "back, hamstrings")] {
        let (status, _) = common::send(
            &app,
            Method::POST,
            "/api/exercises",
            Some(&token),
            Some(json!({
                "name": name,
                "description": "Compound lift",
                "instructions": "Brace and lift",
                "target_muscles": muscles,
                "equipment": "barbell"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, found) =
        common::send(&app, Method::GET, "/api/exercises?search=HAMSTRING", None, None).await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Deadlift");

    let (_, all) = common::send(&app, Method::GET, "/api/exercises", None, None).await;
    let names: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Bench Press", "Deadlift"]);
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice").await;
    let token = common::create_token(&pool, &user).await;
    common::create_test_exercise(&pool, "Push Ups").await;
    let app = common::create_test_app(pool);

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/exercises",
        Some(&token),
        Some(json!({
            "name": "Push Ups",
            "description": "Again",
            "instructions": "Again",
            "target_muscles": "chest"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn test_deleting_exercise_keeps_session_snapshot() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice").await;
    let token = common::create_token(&pool, &user).await;
    let plan = common::create_test_plan(&pool, &user.id, &[2]).await;
    let exercise_id = plan.exercises[0].exercise.id.clone();
    let exercise_name = plan.exercises[0].exercise.name.clone();
    let app = common::create_test_app(pool);

    let (_, session) = common::send(
        &app,
        Method::POST,
        "/api/workout-sessions/start",
        Some(&token),
        Some(json!({ "workout_plan_id": plan.plan.id })),
    )
    .await;

    let (status, _) = common::send(
        &app,
        Method::DELETE,
        &format!("/api/exercises/{}", exercise_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, plan_after) = common::send(
        &app,
        Method::GET,
        &format!("/api/workout-plans/{}", plan.plan.id),
        Some(&token),
        None,
    )
    .await;
    assert!(plan_after["exercises"].as_array().unwrap().is_empty());

    let (_, session_after) = common::send(
        &app,
        Method::GET,
        &format!("/api/workout-sessions/{}", session["id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;
    let snapshot = &session_after["session_exercises"][0];
    assert_eq!(snapshot["exercise_name"], exercise_name.as_str());
    assert_eq!(snapshot["exercise_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_missing_exercise_not_found() {
    let app = common::create_test_app(common::setup_test_db());

    let (status, body) =
        common::send(&app, Method::GET, "/api/exercises/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Exercise not found");
}
