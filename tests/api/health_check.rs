use std::sync::Arc;

use authr::db::InMemoryAccessRepository;

use crate::helpers::{spawn_app, spawn_app_with, UnavailableRepository};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app(InMemoryAccessRepository::new()).await;

    let response = app.get_health().await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Authorization Service");
    assert_eq!(body["data"]["database"], "up");
}

#[tokio::test]
async fn health_check_reports_unreachable_database() {
    let app = spawn_app_with(Arc::new(UnavailableRepository)).await;

    let response = app.get_health().await;

    assert_eq!(503, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
