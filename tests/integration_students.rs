mod common;

use axum::http::StatusCode;
use common::{
    create_class_via_api, create_test_student, empty_request, json_request, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_in_class(pool: PgPool) {
    let app = setup_test_app(pool);
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;

    let (status, student) = send(
        &app,
        json_request(
            "POST",
            "/api/students",
            json!({
                "code": "S-100",
                "name": "Linh Tran",
                "email": "linh@example.com",
                "class_id": class["id"],
                "parent_name": "Mai Tran",
                "date_of_birth": "2012-06-01",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(student["code"], "S-100");
    assert_eq!(student["active"], true);
    assert_eq!(student["class_code"], class["code"]);
    assert_eq!(student["date_of_birth"], "2012-06-01");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_validation_and_conflicts(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/students",
            json!({ "code": "S-1", "name": "Bad Email", "email": "not-an-email" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/students",
            json!({ "code": "S-2", "name": "No Class", "class_id": Uuid::new_v4() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "code": "S-3", "name": "Twin" });
    let (status, _) = send(&app, json_request("POST", "/api/students", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, json_request("POST", "/api/students", body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_filters(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;
    let class_id = Uuid::parse_str(class["id"].as_str().unwrap()).unwrap();

    create_test_student(&pool, "Alice Nguyen", Some(class_id)).await;
    create_test_student(&pool, "Bob Le", Some(class_id)).await;
    create_test_student(&pool, "Carol Pham", None).await;

    let (status, all) = send(&app, empty_request("GET", "/api/students")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["meta"]["total"], 3);

    let (_, in_class) = send(&app, empty_request("GET", &format!("/api/students?class_id={class_id}"))).await;
    assert_eq!(in_class["meta"]["total"], 2);
    let names: Vec<&str> = in_class["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice Nguyen", "Bob Le"]);

    let (_, searched) = send(&app, empty_request("GET", "/api/students?search=pham")).await;
    assert_eq!(searched["data"].as_array().unwrap().len(), 1);
    assert!(searched["data"][0]["class_id"].is_null());

    let (_, paged) = send(&app, empty_request("GET", "/api/students?limit=1&offset=1")).await;
    assert_eq!(paged["data"].as_array().unwrap().len(), 1);
    assert_eq!(paged["data"][0]["name"], "Bob Le");
    assert_eq!(paged["meta"]["limit"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_deactivate_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let id = create_test_student(&pool, "Dung Vo", None).await;

    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/students/{id}"),
            json!({ "phone": "555-0101", "active": false }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-0101");
    assert_eq!(updated["active"], false);
    assert_eq!(updated["name"], "Dung Vo");

    let (_, inactive) = send(&app, empty_request("GET", "/api/students?active=false")).await;
    assert_eq!(inactive["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_and_delete_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let id = create_test_student(&pool, "Em Ho", None).await;

    let (status, student) = send(&app, empty_request("GET", &format!("/api/students/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["id"], id.to_string());

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/students/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, empty_request("GET", &format!("/api/students/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_class_unassigns_students(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let class = create_class_via_api(&app, "2024-01-01", 1, 2).await;
    let class_id = Uuid::parse_str(class["id"].as_str().unwrap()).unwrap();
    let student_id = create_test_student(&pool, "Khoa", Some(class_id)).await;

    send(&app, empty_request("DELETE", &format!("/api/classes/{class_id}"))).await;

    let (status, student) = send(&app, empty_request("GET", &format!("/api/students/{student_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(student["class_id"].is_null());
    assert!(student["class_code"].is_null());
}
