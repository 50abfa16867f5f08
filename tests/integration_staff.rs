mod common;

use axum::http::StatusCode;
use common::{empty_request, json_request, send, setup_test_app, unique_code};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_crud(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, teacher) = send(
        &app,
        json_request(
            "POST",
            "/api/teachers",
            json!({ "code": "T-1", "name": "Hoa Nguyen", "subject": "Mathematics" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(teacher["class_count"], 0);
    assert_eq!(teacher["active"], true);
    let id = teacher["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        json_request("PUT", &format!("/api/teachers/{id}"), json!({ "subject": "Physics" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["subject"], "Physics");
    assert_eq!(updated["name"], "Hoa Nguyen");

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/teachers/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("GET", &format!("/api/teachers/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_class_count_and_filters(pool: PgPool) {
    let app = setup_test_app(pool);

    let (_, busy) = send(
        &app,
        json_request("POST", "/api/teachers", json!({ "code": "T-10", "name": "Busy Teacher" })),
    )
    .await;
    let (_, idle) = send(
        &app,
        json_request("POST", "/api/teachers", json!({ "code": "T-11", "name": "Idle Teacher" })),
    )
    .await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/classes",
                json!({
                    "code": unique_code("C"),
                    "name": "Taught",
                    "start_date": "2024-01-01",
                    "total_sessions": 1,
                    "teacher_id": busy["id"],
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let idle_id = idle["id"].as_str().unwrap();
    send(
        &app,
        json_request("PUT", &format!("/api/teachers/{idle_id}"), json!({ "active": false })),
    )
    .await;

    let (status, teachers) = send(&app, empty_request("GET", "/api/teachers")).await;
    assert_eq!(status, StatusCode::OK);
    let teachers = teachers.as_array().unwrap();
    assert_eq!(teachers.len(), 2);
    assert_eq!(teachers[0]["name"], "Busy Teacher");
    assert_eq!(teachers[0]["class_count"], 2);

    let (_, active) = send(&app, empty_request("GET", "/api/teachers?active=true")).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let (_, searched) = send(&app, empty_request("GET", "/api/teachers?search=idle")).await;
    assert_eq!(searched[0]["code"], "T-11");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_duplicate_code_conflict(pool: PgPool) {
    let app = setup_test_app(pool);
    let body = json!({ "code": "T-DUP", "name": "Twin" });

    let (status, _) = send(&app, json_request("POST", "/api/teachers", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, json_request("POST", "/api/teachers", body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_teacher_keeps_class(pool: PgPool) {
    let app = setup_test_app(pool);

    let (_, teacher) = send(
        &app,
        json_request("POST", "/api/teachers", json!({ "code": "T-20", "name": "Leaving" })),
    )
    .await;
    let (_, class) = send(
        &app,
        json_request(
            "POST",
            "/api/classes",
            json!({
                "code": unique_code("C"),
                "name": "Kept",
                "start_date": "2024-01-01",
                "teacher_id": teacher["id"],
            }),
        ),
    )
    .await;

    let teacher_id = teacher["id"].as_str().unwrap();
    send(&app, empty_request("DELETE", &format!("/api/teachers/{teacher_id}"))).await;

    let class_id = class["id"].as_str().unwrap();
    let (status, detail) = send(&app, empty_request("GET", &format!("/api/classes/{class_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(detail["teacher_id"].is_null());
    assert!(detail["teacher_name"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manager_crud_and_classes(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, manager) = send(
        &app,
        json_request(
            "POST",
            "/api/managers",
            json!({ "code": "M-1", "name": "Thu Le", "email": "thu@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = manager["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/classes",
            json!({
                "code": "MGD-1",
                "name": "Managed",
                "start_date": "2024-01-01",
                "total_sessions": 2,
                "manager_id": id,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, classes) = send(&app, empty_request("GET", &format!("/api/managers/{id}/classes"))).await;
    assert_eq!(status, StatusCode::OK);
    let classes = classes.as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["code"], "MGD-1");
    assert_eq!(classes[0]["manager_name"], "Thu Le");

    let (status, fetched) = send(&app, empty_request("GET", &format!("/api/managers/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["class_count"], 1);

    let (status, updated) = send(
        &app,
        json_request("PUT", &format!("/api/managers/{id}"), json!({ "phone": "555-2000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-2000");
    assert_eq!(updated["class_count"], 1);

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/managers/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("GET", &format!("/api/managers/{id}/classes"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manager_invalid_email_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/managers", json!({ "code": "M-2", "name": "X", "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
