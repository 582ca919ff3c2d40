use actix_web::{HttpResponse, delete, post, web};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::models::users;
use crate::services::auth_service::AuthService;
use crate::services::user_service::UserService;

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: users::Model,
}

/// POST /auth/register - Create an account (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (token, user) =
        AuthService::register(db.get_ref(), &body.email, &body.password, &body.name).await?;

    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

/// POST /auth/login - Open a session (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (token, user) = AuthService::login(db.get_ref(), &body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

/// DELETE /auth/account - Delete the account plus all its devices and
/// telemetry (PROTECTED)
#[delete("/account")]
pub async fn delete_account(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    UserService::delete_account(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Account deleted successfully"
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(delete_account),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            name: "A".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            name: "A".to_string(),
        };
        assert!(short_password.validate().is_err());

        let ok = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "password123".to_string(),
            name: "A".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
