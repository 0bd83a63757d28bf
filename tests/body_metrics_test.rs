mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_profile_once_per_user() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice").await;
    let token = common::create_token(&pool, &user).await;
    let app = common::create_test_app(pool);

    let (status, profile) = common::send(
        &app,
        Method::POST,
        "/api/profiles",
        Some(&token),
        Some(json!({"weight": 72.5, "height": 178.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["user_id"], user.id.as_str());

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/profiles",
        Some(&token),
        Some(json!({"weight": 70.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "You already have a profile.");

    let (status, updated) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/profiles/{}", profile["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({"height": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["weight"], 72.5);
    assert_eq!(updated["height"], serde_json::Value::Null);

    let (_, list) = common::send(&app, Method::GET, "/api/profiles", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_weight_log_lifecycle() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice").await;
    let token = common::create_token(&pool, &user).await;
    let app = common::create_test_app(pool);

    let (status, log) = common::send(
        &app,
        Method::POST,
        "/api/weight-logs",
        Some(&token),
        Some(json!({"weight": 81.3})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        log["date"],
        chrono::Utc::now().date_naive().to_string().as_str()
    );
    let uri = format!("/api/weight-logs/{}", log["id"].as_str().unwrap());

    let (status, updated) = common::send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"weight": 80.9})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["weight"], 80.9);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/weight-logs",
        Some(&token),
        Some(json!({"weight": -1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_goals_filter_by_achieved() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice").await;
    let token = common::create_token(&pool, &user).await;
    let app = common::create_test_app(pool);

    let (status, goal) = common::send(
        &app,
        Method::POST,
        "/api/fitness-goals",
        Some(&token),
        Some(json!({"goal_type": "weight", "target_value": 70.0, "description": "Reach 70kg"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["achieved"], false);

    common::send(
        &app,
        Method::POST,
        "/api/fitness-goals",
        Some(&token),
        Some(json!({"goal_type": "exercise", "target_value": 100.0, "description": "100 push ups"})),
    )
    .await;

    let (status, achieved) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/fitness-goals/{}", goal["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({"achieved": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(achieved["achieved"], true);

    let (_, done) = common::send(
        &app,
        Method::GET,
        "/api/fitness-goals?achieved=true",
        Some(&token),
        None,
    )
    .await;
    let done = done.as_array().unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["description"], "Reach 70kg");

    let (_, open) = common::send(
        &app,
        Method::GET,
        "/api/fitness-goals?achieved=false",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(open.as_array().unwrap().len(), 1);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/fitness-goals",
        Some(&token),
        Some(json!({"goal_type": "strength", "target_value": 1.0, "description": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
