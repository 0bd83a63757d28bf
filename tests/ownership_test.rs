mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

/// Account A starts a session; account B gets NotFound on every operation on it.
#[tokio::test]
async fn test_other_account_cannot_touch_session() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice").await;
    let bob = common::create_test_user(&pool, "bob").await;
    let alice_token = common::create_token(&pool, &alice).await;
    let bob_token = common::create_token(&pool, &bob).await;
    let plan = common::create_test_plan(&pool, &alice.id, &[2]).await;
    let app = common::create_test_app(pool);

    let (_, session) = common::send(
        &app,
        Method::POST,
        "/api/workout-sessions/start",
        Some(&alice_token),
        Some(json!({ "workout_plan_id": plan.plan.id })),
    )
    .await;
    let session_id = session["id"].as_str().unwrap();
    let exercise_id = session["session_exercises"][0]["id"].as_str().unwrap();
    let set_id = session["session_exercises"][0]["sets"][0]["id"].as_str().unwrap();

    let attempts = [
        (Method::GET, format!("/api/workout-sessions/{}", session_id), None),
        (
            Method::GET,
            format!("/api/workout-sessions/{}/next-exercise", session_id),
            None,
        ),
        (
            Method::POST,
            format!("/api/workout-sessions/{}/complete", session_id),
            None,
        ),
        (
            Method::POST,
            format!("/api/workout-sessions/{}/cancel", session_id),
            None,
        ),
        (Method::GET, format!("/api/session-exercises/{}", exercise_id), None),
        (
            Method::GET,
            format!("/api/session-exercises/{}/next-set", exercise_id),
            None,
        ),
        (
            Method::PATCH,
            format!("/api/session-exercises/{}/status", exercise_id),
            Some(json!({"status": "completed"})),
        ),
        (Method::POST, format!("/api/set-logs/{}/complete", set_id), None),
        (Method::DELETE, format!("/api/workout-sessions/{}", session_id), None),
    ];

    for (method, uri, body) in attempts {
        let (status, _) = common::send(&app, method.clone(), &uri, Some(&bob_token), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }

    let (status, _) = common::send(
        &app,
        Method::GET,
        "/api/workout-sessions/active",
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob cannot start a session from Alice's plan either.
    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/workout-sessions/start",
        Some(&bob_token),
        Some(json!({ "workout_plan_id": plan.plan.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice's session is untouched.
    let (_, mine) = common::send(
        &app,
        Method::GET,
        &format!("/api/workout-sessions/{}", session_id),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(mine["status"], "in_progress");
    assert_eq!(mine["session_exercises"][0]["status"], "pending");
    assert_eq!(mine["session_exercises"][0]["sets"][0]["completed"], false);
}

#[tokio::test]
async fn test_other_account_cannot_touch_plan() {
    let pool = common::setup_test_db();
    let alice = common::create_test_user(&pool, "alice").await;
    let bob = common::create_test_user(&pool, "bob").await;
    let bob_token = common::create_token(&pool, &bob).await;
    let plan = common::create_test_plan(&pool, &alice.id, &[3]).await;
    let item_id = plan.exercises[0].item.id.clone();
    let app = common::create_test_app(pool);

    let (status, _) = common::send(
        &app,
        Method::GET,
        &format!("/api/workout-plans/{}", plan.plan.id),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/workout-exercises/{}", item_id),
        Some(&bob_token),
        Some(json!({"sets": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, plans) =
        common::send(&app, Method::GET, "/api/workout-plans", Some(&bob_token), None).await;
    assert!(plans.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_private_routes_require_auth() {
    let app = common::create_test_app(common::setup_test_db());

    for uri in [
        "/api/profiles",
        "/api/workout-plans",
        "/api/workout-exercises",
        "/api/workout-sessions",
        "/api/workout-sessions/active",
        "/api/weight-logs",
        "/api/fitness-goals",
    ] {
        let (status, body) = common::send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"], "unauthorized");
    }
}
