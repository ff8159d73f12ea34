use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::{
    core::{AppError, AppErrorType, AppSuccessResponse},
    services::AccessService,
};

/// Name reported by the health check.
pub struct ServiceName(pub String);

#[derive(Serialize)]
pub struct HealthStatus {
    pub name: String,
    pub database: &'static str,
}

#[get("/health")]
pub async fn get_health(
    service: web::Data<AccessService>,
    name: web::Data<ServiceName>,
) -> Result<impl Responder, AppError> {
    service.repository().ping().await.map_err(|e| {
        tracing::error!(error.message = %e, "health check failed");
        AppError {
            message: Some("database unavailable".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::ServiceUnavailable,
        }
    })?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "service healthy".to_string(),
        data: HealthStatus {
            name: name.0.clone(),
            database: "up",
        },
    }))
}
