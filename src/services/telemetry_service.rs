use sea_orm::*;
use uuid::Uuid;
use chrono::Utc;

use crate::errors::{ApiError, Result};
use crate::models::telemetry;
use crate::services::device_service::DeviceService;

pub const DEFAULT_LIMIT: u64 = 100;

pub struct TelemetryService;

impl TelemetryService {
    /// Ingestion path: authenticated by the device API key alone, no user
    /// session involved. Readings are immutable once written.
    pub async fn create(
        db: &DatabaseConnection,
        api_key: &str,
        temperature: Option<f64>,
        humidity: Option<f64>,
        data: Option<serde_json::Value>,
    ) -> Result<telemetry::Model> {
        let device = DeviceService::find_by_api_key(db, api_key)
            .await?
            .ok_or_else(|| ApiError::Authentication("Invalid device API key".to_string()))?;

        let reading = telemetry::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_id: Set(device.id),
            temperature: Set(temperature),
            humidity: Set(humidity),
            data: Set(data),
            timestamp: Set(Utc::now()),
        };

        Ok(reading.insert(db).await?)
    }

    /// Readings for one device, newest first, capped at `limit`. The
    /// ownership check is delegated to DeviceService::find_one; its
    /// NotFound/Forbidden errors propagate unchanged.
    pub async fn find_by_device(
        db: &DatabaseConnection,
        device_id: Uuid,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<telemetry::Model>> {
        DeviceService::find_one(db, device_id, user_id).await?;

        Ok(telemetry::Entity::find()
            .filter(telemetry::Column::DeviceId.eq(device_id))
            .order_by_desc(telemetry::Column::Timestamp)
            .limit(limit)
            .all(db)
            .await?)
    }
}
