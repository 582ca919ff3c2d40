use sea_orm::*;
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::errors::{ApiError, Result};
use crate::models::{devices, telemetry};
use crate::utils::api_key;

/// Fields supplied by the owner when registering a device
pub struct DeviceSpec {
    pub name: String,
    pub device_type: String,
    pub description: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Default)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub description: Option<String>,
}

pub struct DeviceService;

impl DeviceService {
    fn new_device(user_id: Uuid, spec: DeviceSpec, now: DateTime<Utc>) -> devices::ActiveModel {
        devices::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(spec.name),
            device_type: Set(spec.device_type),
            description: Set(spec.description),
            api_key: Set(api_key::generate_api_key()),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        user_id: Uuid,
        spec: DeviceSpec,
    ) -> Result<devices::Model> {
        let device = Self::new_device(user_id, spec, Utc::now()).insert(db).await?;
        tracing::info!(device_id = %device.id, %user_id, "device registered");
        Ok(device)
    }

    /// Registers several devices in one transaction. If any insert fails
    /// the transaction rolls back and no device is persisted.
    pub async fn create_batch(
        db: &DatabaseConnection,
        user_id: Uuid,
        specs: Vec<DeviceSpec>,
    ) -> Result<Vec<devices::Model>> {
        let txn = db.begin().await?;
        let now = Utc::now();

        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            created.push(Self::new_device(user_id, spec, now).insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(created)
    }

    pub async fn find_all(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<devices::Model>> {
        Ok(devices::Entity::find()
            .filter(devices::Column::UserId.eq(user_id))
            .order_by_desc(devices::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Ownership gate for every user-facing device operation. An absent id
    /// is 404; an existing device owned by someone else is 403. The 403
    /// leaks existence to non-owners, which is accepted behavior here —
    /// do not collapse it into 404.
    pub async fn find_one(
        db: &DatabaseConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<devices::Model> {
        let device = devices::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;

        if device.user_id != user_id {
            return Err(ApiError::Forbidden(
                "You do not have access to this device".to_string(),
            ));
        }

        Ok(device)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        user_id: Uuid,
        update: DeviceUpdate,
    ) -> Result<devices::Model> {
        let device = Self::find_one(db, id, user_id).await?;

        let mut active: devices::ActiveModel = device.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(device_type) = update.device_type {
            active.device_type = Set(device_type);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Ownership check, then cascade delete of the device's telemetry and
    /// the device itself in one transaction
    pub async fn remove(db: &DatabaseConnection, id: Uuid, user_id: Uuid) -> Result<()> {
        Self::find_one(db, id, user_id).await?;

        let txn = db.begin().await?;

        telemetry::Entity::delete_many()
            .filter(telemetry::Column::DeviceId.eq(id))
            .exec(&txn)
            .await?;

        devices::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(device_id = %id, "device deleted");
        Ok(())
    }

    /// Ingestion-path lookup. The API key itself is the credential, so
    /// there is deliberately no ownership check here.
    pub async fn find_by_api_key(
        db: &DatabaseConnection,
        api_key: &str,
    ) -> Result<Option<devices::Model>> {
        Ok(devices::Entity::find()
            .filter(devices::Column::ApiKey.eq(api_key))
            .one(db)
            .await?)
    }
}
