use sea_orm::DatabaseConnection;

use crate::errors::{ApiError, Result};
use crate::models::users;
use crate::services::user_service::UserService;
use crate::utils::{jwt, password};

/// One message for every credential failure. "Unknown email" and "wrong
/// password" must be indistinguishable to the caller, otherwise login
/// becomes an account enumeration oracle.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Registers a new account and opens a session for it
    pub async fn register(
        db: &DatabaseConnection,
        email: &str,
        plain_password: &str,
        name: &str,
    ) -> Result<(String, users::Model)> {
        let password_hash = password::hash_password(plain_password).map_err(ApiError::Internal)?;

        let user = UserService::create(db, email, password_hash, name).await?;

        let token = jwt::generate_token(user.id, &user.email).map_err(ApiError::Internal)?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok((token, user))
    }

    pub async fn login(
        db: &DatabaseConnection,
        email: &str,
        plain_password: &str,
    ) -> Result<(String, users::Model)> {
        let user = UserService::find_by_email(db, email)
            .await?
            .ok_or_else(|| ApiError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        // A corrupt stored hash also reads as bad credentials
        let valid = password::verify_password(plain_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(ApiError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = jwt::generate_token(user.id, &user.email).map_err(ApiError::Internal)?;

        Ok((token, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    fn user_with_password(email: &str, plain: &str) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password::hash_password(plain).unwrap(),
            name: "Test User".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_identical() {
        // Unknown email
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let unknown = AuthService::login(&db, "ghost@example.com", "pw")
            .await
            .unwrap_err();

        // Known email, wrong password
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_with_password("a@x.com", "correct-pw")]])
            .into_connection();
        let wrong = AuthService::login(&db, "a@x.com", "wrong-pw").await.unwrap_err();

        assert!(matches!(unknown, ApiError::Authentication(_)));
        assert!(matches!(wrong, ApiError::Authentication(_)));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_login_issues_token_for_registered_user() {
        let user = user_with_password("a@x.com", "pw");
        let user_id = user.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user]])
            .into_connection();

        let (token, logged_in) = AuthService::login(&db, "a@x.com", "pw").await.unwrap();

        assert_eq!(logged_in.id, user_id);
        // Token round-trips to the same user id
        let claims = jwt::verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_with_password("a@x.com", "pw")]])
            .into_connection();

        let err = AuthService::register(&db, "a@x.com", "pw", "A").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
