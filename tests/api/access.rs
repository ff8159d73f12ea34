use std::sync::Arc;

use authr::db::InMemoryAccessRepository;
use authr::models::access::AccessRow;
use serde_json::json;

use crate::helpers::{row, spawn_app, spawn_app_with, token_for, UnavailableRepository};

fn teacher_rows() -> Vec<AccessRow> {
    vec![
        AccessRow {
            teacher_type_id: Some(1),
            class_id: Some(333),
            ..row(1)
        },
        AccessRow {
            teacher_type_id: Some(1),
            class_id: Some(222),
            ..row(1)
        },
    ]
}

#[tokio::test]
async fn teacher_receives_class_scope() {
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(108, teacher_rows())).await;

    let response = app.get_access("108", Some(&token_for("108"))).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "request completed",
            "data": {
                "SuperUser": false,
                "Teacher": { "cls": [222, 333] }
            }
        })
    );
}

#[tokio::test]
async fn fund_source_admin_receives_fund_sources() {
    let rows = vec![AccessRow {
        fund_source_admin_type_id: Some(0),
        fund_source_id: Some(111),
        fs_admin_entity_id: Some(222),
        ..row(7)
    }];
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(5, rows)).await;

    let response = app.get_access("5", Some(&token_for("5"))).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"],
        json!({
            "SuperUser": false,
            "FSAdmin": { "ent": [222], "fundSrc": [111] }
        })
    );
}

#[tokio::test]
async fn trailing_slash_is_accepted() {
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(108, teacher_rows())).await;

    let response = app.get_access("108/", Some(&token_for("108"))).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn unknown_user_returns_404() {
    let app = spawn_app(InMemoryAccessRepository::new()).await;

    let response = app.get_access("42", Some(&token_for("42"))).await;

    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "message": "user not found" }));
}

#[tokio::test]
async fn pure_super_user_returns_403() {
    let rows = vec![AccessRow {
        super_user_type_id: Some(1),
        ..row(6)
    }];
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(42, rows)).await;

    let response = app.get_access("42", Some(&token_for("42"))).await;

    assert_eq!(403, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "message": "user not allowed" }));
}

#[tokio::test]
async fn repository_failure_returns_500_without_cause() {
    let app = spawn_app_with(Arc::new(UnavailableRepository)).await;

    let response = app.get_access("42", Some(&token_for("42"))).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "success": false, "message": "unable to fetch access data" })
    );
}

#[tokio::test]
async fn missing_token_returns_401() {
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(108, teacher_rows())).await;

    let response = app.get_access("108", None).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn garbage_token_returns_401() {
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(108, teacher_rows())).await;

    let response = app.get_access("108", Some("not-a-jwt")).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn token_for_another_user_returns_403() {
    let app = spawn_app(InMemoryAccessRepository::new().with_rows(108, teacher_rows())).await;

    let response = app.get_access("108", Some(&token_for("109"))).await;

    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn non_numeric_user_id_returns_404() {
    let app = spawn_app(InMemoryAccessRepository::new()).await;

    let response = app.get_access("108a", Some(&token_for("108a"))).await;

    assert_eq!(404, response.status().as_u16());
}
