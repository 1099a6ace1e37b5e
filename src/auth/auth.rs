use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use uuid::Uuid;

/// The caller identified by a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::Internal("Config missing".into()))?;

    let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    let role = Role::from_id(claims.role)
        .ok_or_else(|| AppError::Unauthorized("Invalid role".into()))?;

    Ok(AuthUser {
        user_id: claims.sub,
        role,
    })
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> Result<(), AppError> {
        if self.role.can_review_leave() {
            Ok(())
        } else {
            Err(AppError::Forbidden("HR/Admin only".into()))
        }
    }
}
