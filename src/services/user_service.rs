use sea_orm::*;
use uuid::Uuid;
use chrono::Utc;

use crate::errors::{ApiError, Result};
use crate::models::{devices, telemetry, users};

pub struct UserService;

impl UserService {
    /// Creates a user record. The email uniqueness check runs first so a
    /// duplicate registration surfaces as 409 rather than a raw DB error;
    /// the unique index on users.email backstops concurrent registrations.
    pub async fn create(
        db: &DatabaseConnection,
        email: &str,
        password_hash: String,
        name: &str,
    ) -> Result<users::Model> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        if existing.is_some() {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(db).await?)
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?)
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(db).await?)
    }

    /// Deletes the account and everything it owns in one transaction:
    /// telemetry of the user's devices, then the devices, then the user.
    /// A session token outlives its account by up to 24h, so the row may
    /// already be gone; that surfaces as 404 rather than a silent no-op.
    pub async fn delete_account(db: &DatabaseConnection, user_id: Uuid) -> Result<()> {
        Self::find_by_id(db, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let txn = db.begin().await?;

        let device_ids: Vec<Uuid> = devices::Entity::find()
            .filter(devices::Column::UserId.eq(user_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();

        if !device_ids.is_empty() {
            telemetry::Entity::delete_many()
                .filter(telemetry::Column::DeviceId.is_in(device_ids))
                .exec(&txn)
                .await?;
        }

        devices::Entity::delete_many()
            .filter(devices::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        users::Entity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(%user_id, "account deleted");
        Ok(())
    }
}
