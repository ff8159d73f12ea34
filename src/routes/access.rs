use actix_web::{get, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    core::{jwt_auth::SubjectGuard, AppError, AppSuccessResponse},
    services::{AccessError, AccessService},
};

#[instrument(name = "Get Access Scope", skip(service, auth), fields(user_id = %auth.user_id))]
#[get("/{user_id:\\d+}")]
pub async fn get_access(
    service: web::Data<AccessService>,
    auth: SubjectGuard,
) -> Result<impl Responder, AppError> {
    let user_id = auth.user_id;
    let scope = service.access(user_id).await.map_err(|e| {
        match &e {
            AccessError::NotFound => tracing::warn!(user_id, error = %e, "not found"),
            AccessError::NotAllowed { user_type_id } => {
                tracing::warn!(user_id, user_type_id, error = %e, "forbidden")
            }
            AccessError::Upstream(cause) => tracing::error!(
                user_id,
                error.cause_chain = ?cause,
                error.message = %cause,
                "unable to fetch access data"
            ),
        }
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "request completed".to_string(),
        data: scope,
    }))
}
