mod common;

use axum::http::StatusCode;
use common::{
    create_class_via_api, create_test_student, empty_request, json_request, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn class_with_two_students(pool: &PgPool, app: &axum::Router) -> (Uuid, Uuid, Uuid) {
    let class = create_class_via_api(app, "2024-01-01", 1, 2).await;
    let class_id = Uuid::parse_str(class["id"].as_str().unwrap()).unwrap();
    let ana = create_test_student(pool, "Ana", Some(class_id)).await;
    let ben = create_test_student(pool, "Ben", Some(class_id)).await;
    (class_id, ana, ben)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_comments_drops_blank_entries(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, ana, ben) = class_with_two_students(&pool, &app).await;

    let (status, comments) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{class_id}/comments"),
            json!({
                "comments": [
                    { "student_id": ana, "comment": "Great progress" },
                    { "student_id": ben, "comment": "   " },
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["student_name"], "Ana");
    assert_eq!(comments[0]["comment"], "Great progress");

    // A second replace wipes what was there before
    let (_, replaced) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{class_id}/comments"),
            json!({ "comments": [{ "student_id": ben, "comment": "Needs practice" }] }),
        ),
    )
    .await;
    let replaced = replaced.as_array().unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced[0]["student_name"], "Ben");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_comment_overwrites_and_blank_deletes(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, ana, _) = class_with_two_students(&pool, &app).await;
    let uri = format!("/api/classes/{class_id}/comments/{ana}");

    let (status, first) = send(&app, json_request("PUT", &uri, json!({ "comment": "Good" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["comment"], "Good");

    let (status, second) = send(&app, json_request("PUT", &uri, json!({ "comment": " Better " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["comment"], "Better");
    assert_eq!(second["id"], first["id"]);

    let (status, body) = send(&app, json_request("PUT", &uri, json!({ "comment": "" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (_, comments) = send(&app, empty_request("GET", &format!("/api/classes/{class_id}/comments"))).await;
    assert!(comments.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_errors(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (class_id, ana, _) = class_with_two_students(&pool, &app).await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{class_id}/comments/{}", Uuid::new_v4()),
            json!({ "comment": "Who?" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/classes/{}/comments/{ana}", Uuid::new_v4()),
            json!({ "comment": "Lost" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        empty_request("DELETE", &format!("/api/classes/{class_id}/comments/{ana}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
