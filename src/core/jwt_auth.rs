use actix_web::{dev::Payload, http, web, Error as ActixWebError, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::core::config::JwtAuthConfig;
use crate::core::{AppError, AppErrorType};

/// Path segment holding the user the request asks about.
pub const USER_ID_PATH_PARAM: &str = "user_id";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: Option<String>, // user ID
    pub exp: usize,          // expiration time
}

/// HS256 verification settings, shared through app data.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtAuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // set_issuer alone lets tokens without an `iss` claim through.
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!(error = %e, "token rejected");
                AppError::unauthorized("Invalid token")
            })
    }
}

/// Bearer token whose subject is the user named in the request path.
///
/// Rejects with 401 when the token is missing or invalid and with 403 when it
/// belongs to a different user.
#[derive(Debug)]
pub struct SubjectGuard {
    pub user_id: i64,
    pub claims: JwtClaims,
}

impl FromRequest for SubjectGuard {
    type Error = ActixWebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authorize(req).map_err(ActixWebError::from))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authorize(req: &HttpRequest) -> Result<SubjectGuard, AppError> {
    let verifier = req
        .app_data::<web::Data<JwtVerifier>>()
        .ok_or_else(|| AppError::internal_error("Token verification is not configured"))?;

    let token =
        bearer_token(req).ok_or_else(|| AppError::unauthorized("Invalid login credentials"))?;
    let claims = verifier.verify(token)?;

    let subject = claims
        .sub
        .clone()
        .ok_or_else(|| AppError::unauthorized("Token has no subject"))?;

    let user_id: i64 = req
        .match_info()
        .get(USER_ID_PATH_PARAM)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| AppError {
            message: None,
            cause: Some("request path has no valid user ID".to_string()),
            error_type: AppErrorType::NotFoundError,
        })?;

    if user_id.to_string() != subject {
        tracing::warn!(user_id, subject = %subject, "token subject does not match requested user");
        return Err(AppError::forbidden_error(
            "Token subject does not match requested user",
        ));
    }

    Ok(SubjectGuard { user_id, claims })
}
