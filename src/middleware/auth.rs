use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::config::AuthConfig;
use crate::domain::Role;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::validate_token;

/// The caller's identity, resolved from a validated bearer token. Handlers
/// take this as an extractor; nothing below the transport layer ever sees
/// the raw token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    let config = req
        .app_data::<web::Data<AuthConfig>>()
        .ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("auth configuration missing from app data"))
        })?;

    let result = bearer_identity(req, config);

    if result.is_err() {
        if let Some(state) = req.app_data::<web::Data<AppState>>() {
            state.metrics.record_auth_failure();
        }
    }

    result
}

fn bearer_identity(req: &HttpRequest, config: &AuthConfig) -> AppResult<AuthenticatedUser> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let claims = validate_token(token, config)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: Role::from_claim(&claims.role),
        email: claims.email,
        name: claims.name,
    })
}
