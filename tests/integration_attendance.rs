mod common;

use axum::http::StatusCode;
use common::{
    create_class_via_api, create_test_student, empty_request, json_request, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn class_with_students(pool: &PgPool, app: &axum::Router, count: usize) -> (Uuid, Vec<Uuid>) {
    let class = create_class_via_api(app, "2024-01-01", 1, 4).await;
    let class_id = Uuid::parse_str(class["id"].as_str().unwrap()).unwrap();

    let mut students = Vec::new();
    for idx in 0..count {
        students.push(create_test_student(pool, &format!("Student {idx}"), Some(class_id)).await);
    }
    (class_id, students)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_attendance_returns_stats(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 4).await;

    let (status, saved) = send(
        &app,
        json_request(
            "POST",
            "/api/attendance",
            json!({
                "class_id": class_id,
                "session": 1,
                "records": [
                    { "student_id": students[0], "status": "on-time" },
                    { "student_id": students[1], "status": "on-time" },
                    { "student_id": students[2], "status": "on-time" },
                    { "student_id": students[3], "status": "absent", "note": "Sick" },
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["saved"], 4);
    assert_eq!(saved["stats"]["on_time"], 3);
    assert_eq!(saved["stats"]["absent"], 1);
    assert_eq!(saved["stats"]["total"], 4);
    assert_eq!(saved["stats"]["rate"], 75.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_attendance_replaces_session_roster(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 2).await;

    let save = |records: serde_json::Value| {
        json_request(
            "POST",
            "/api/attendance",
            json!({ "class_id": class_id, "session": 2, "records": records }),
        )
    };

    send(
        &app,
        save(json!([
            { "student_id": students[0], "status": "absent" },
            { "student_id": students[1], "status": "absent" },
        ])),
    )
    .await;
    let (status, _) = send(&app, save(json!([{ "student_id": students[0], "status": "late" }]))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, records) = send(
        &app,
        empty_request("GET", &format!("/api/classes/{class_id}/attendance?session=2")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "late");
    assert_eq!(records[0]["session"], 2);
    assert_eq!(records[0]["student_name"], "Student 0");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_attendance_unknown_session_or_class(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 1).await;
    let records = json!([{ "student_id": students[0], "status": "on-time" }]);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/attendance",
            json!({ "class_id": class_id, "session": 5, "records": records }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/attendance",
            json!({ "class_id": Uuid::new_v4(), "session": 1, "records": records }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_attendance_unknown_student_rolls_back(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 1).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/attendance",
            json!({
                "class_id": class_id,
                "session": 1,
                "records": [
                    { "student_id": students[0], "status": "on-time" },
                    { "student_id": Uuid::new_v4(), "status": "late" },
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_attendance_duplicate_student_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 1).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/attendance",
            json!({
                "class_id": class_id,
                "session": 1,
                "records": [
                    { "student_id": students[0], "status": "on-time" },
                    { "student_id": students[0], "status": "late" },
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_and_student_stats(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 2).await;

    for (session, first, second) in [(1, "on-time", "absent"), (2, "late", "excused")] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/attendance",
                json!({
                    "class_id": class_id,
                    "session": session,
                    "records": [
                        { "student_id": students[0], "status": first },
                        { "student_id": students[1], "status": second },
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, stats) = send(
        &app,
        empty_request("GET", &format!("/api/classes/{class_id}/attendance/stats")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["rate"], 50.0);

    let (_, session_stats) = send(
        &app,
        empty_request("GET", &format!("/api/classes/{class_id}/attendance/stats?session=1")),
    )
    .await;
    assert_eq!(session_stats["total"], 2);
    assert_eq!(session_stats["on_time"], 1);

    let (status, summaries) = send(
        &app,
        empty_request("GET", &format!("/api/classes/{class_id}/attendance/students")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["student_name"], "Student 0");
    assert_eq!(summaries[0]["stats"]["rate"], 100.0);
    assert_eq!(summaries[1]["stats"]["rate"], 0.0);

    let (status, student) = send(
        &app,
        empty_request("GET", &format!("/api/students/{}/attendance/stats", students[1])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["stats"]["absent"], 1);
    assert_eq!(student["stats"]["excused"], 1);
    assert_eq!(student["stats"]["rate"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_class_stats_are_zero(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;
    let id = class["id"].as_str().unwrap();

    let (status, stats) = send(&app, empty_request("GET", &format!("/api/classes/{id}/attendance/stats"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["rate"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_attendance_record(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 1).await;

    send(
        &app,
        json_request(
            "POST",
            "/api/attendance",
            json!({
                "class_id": class_id,
                "session": 1,
                "records": [{ "student_id": students[0], "status": "on-time" }]
            }),
        ),
    )
    .await;

    let (_, records) = send(&app, empty_request("GET", &format!("/api/classes/{class_id}/attendance"))).await;
    let record_id = records[0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/attendance/{record_id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/attendance/{record_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_shrinking_schedule_drops_attendance_past_last_session(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, students) = class_with_students(&pool, &app, 1).await;

    for (session, status) in [(1, "on-time"), (3, "absent"), (4, "absent")] {
        let (code, _) = send(
            &app,
            json_request(
                "POST",
                "/api/attendance",
                json!({
                    "class_id": class_id,
                    "session": session,
                    "records": [{ "student_id": students[0], "status": status }]
                }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
    }

    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/classes/{class_id}"), json!({ "total_sessions": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(
        &app,
        empty_request("GET", &format!("/api/classes/{class_id}/attendance/stats")),
    )
    .await;
    assert_eq!(stats["total"], 2);

    // Manual replacement follows the same rule.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{class_id}/sessions"),
            json!({ "sessions": [{ "number": 1, "date": "2024-01-01" }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, student) = send(
        &app,
        empty_request("GET", &format!("/api/students/{}/attendance/stats", students[0])),
    )
    .await;
    assert_eq!(student["stats"]["total"], 1);
    assert_eq!(student["stats"]["rate"], 100.0);
}
