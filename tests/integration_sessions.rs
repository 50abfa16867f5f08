mod common;

use axum::http::StatusCode;
use common::{create_class_via_api, empty_request, json_request, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_list_sessions_ordered_by_number(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-03-01", 5, 5).await;
    let id = class["id"].as_str().unwrap();

    let (status, sessions) = send(&app, empty_request("GET", &format!("/api/classes/{id}/sessions"))).await;
    assert_eq!(status, StatusCode::OK);

    let numbers: Vec<i64> = sessions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    // 2024-03-01 is itself a Friday
    assert_eq!(sessions[0]["date"], "2024-03-01");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_single_session(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 3).await;
    let id = class["id"].as_str().unwrap();

    let (status, session) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{id}/sessions/3"),
            json!({ "date": "2024-01-17", "status": "rescheduled" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["session_number"], 3);
    assert_eq!(session["date"], "2024-01-17");
    assert_eq!(session["status"], "rescheduled");

    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/classes/{id}/sessions/9"), json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_sessions_updates_total(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 4).await;
    let id = class["id"].as_str().unwrap();

    let (status, sessions) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{id}/sessions"),
            json!({
                "sessions": [
                    { "number": 2, "date": "2024-02-12" },
                    { "number": 1, "date": "2024-02-05", "status": "completed" },
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["session_number"], 1);
    assert_eq!(sessions[0]["status"], "completed");
    assert_eq!(sessions[1]["status"], "scheduled");

    let (_, detail) = send(&app, empty_request("GET", &format!("/api/classes/{id}"))).await;
    assert_eq!(detail["total_sessions"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_sessions_rejects_gaps(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;
    let id = class["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{id}/sessions"),
            json!({
                "sessions": [
                    { "number": 1, "date": "2024-02-05" },
                    { "number": 3, "date": "2024-02-19" },
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The original schedule is untouched
    let (_, sessions) = send(&app, empty_request("GET", &format!("/api/classes/{id}/sessions"))).await;
    assert_eq!(sessions.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_sessions_unknown_class(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{}/sessions", Uuid::new_v4()),
            json!({ "sessions": [{ "number": 1, "date": "2024-02-05" }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_sessions_accepts_every_status(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 4).await;
    let id = class["id"].as_str().unwrap();

    let (status, sessions) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{id}/sessions"),
            json!({
                "sessions": [
                    { "number": 1, "date": "2024-01-01", "status": "completed" },
                    { "number": 2, "date": "2024-01-08", "status": "cancelled", "note": "Holiday" },
                    { "number": 3, "date": "2024-01-17", "status": "rescheduled" },
                    { "number": 4, "date": "2024-01-22", "status": "scheduled" },
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "unexpected: {sessions}");
    let statuses: Vec<&str> = sessions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["completed", "cancelled", "rescheduled", "scheduled"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_sessions_over_cap_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;
    let id = class["id"].as_str().unwrap();

    let sessions: Vec<_> = (1..=501)
        .map(|number| json!({ "number": number, "date": "2024-01-01" }))
        .collect();
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/classes/{id}/sessions"), json!({ "sessions": sessions })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, stored) = send(&app, empty_request("GET", &format!("/api/classes/{id}/sessions"))).await;
    assert_eq!(stored.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_session_null_note_clears_it(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;
    let id = class["id"].as_str().unwrap();
    let uri = format!("/api/classes/{id}/sessions/1");

    let (_, session) = send(&app, json_request("PUT", &uri, json!({ "note": "Bring laptops" }))).await;
    assert_eq!(session["note"], "Bring laptops");

    let (_, session) = send(&app, json_request("PUT", &uri, json!({ "status": "completed" }))).await;
    assert_eq!(session["note"], "Bring laptops");

    let (status, session) = send(&app, json_request("PUT", &uri, json!({ "note": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(session["note"].is_null());
    assert_eq!(session["status"], "completed");
}
