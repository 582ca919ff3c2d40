use actix_web::{HttpResponse, delete, get, patch, post, web};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::services::device_service::{DeviceService, DeviceSpec, DeviceUpdate};

#[derive(Deserialize, Serialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub device_type: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct CreateDevicesBatchRequest {
    #[validate(length(min = 1, message = "devices must contain at least one entry"), nested)]
    pub devices: Vec<CreateDeviceRequest>,
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateDeviceRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub device_type: Option<String>,
    pub description: Option<String>,
}

impl From<CreateDeviceRequest> for DeviceSpec {
    fn from(body: CreateDeviceRequest) -> Self {
        DeviceSpec {
            name: body.name,
            device_type: body.device_type,
            description: body.description,
        }
    }
}

/// POST /devices - Register a device (PROTECTED)
#[post("")]
pub async fn create_device(
    auth_user: AuthUser,
    body: web::Json<CreateDeviceRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let device =
        DeviceService::create(db.get_ref(), auth_user.user_id, body.into_inner().into()).await?;

    Ok(HttpResponse::Created().json(device))
}

/// POST /devices/batch - Register several devices atomically (PROTECTED)
#[post("/batch")]
pub async fn create_devices_batch(
    auth_user: AuthUser,
    body: web::Json<CreateDevicesBatchRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let specs = body.into_inner().devices.into_iter().map(Into::into).collect();
    let devices = DeviceService::create_batch(db.get_ref(), auth_user.user_id, specs).await?;

    Ok(HttpResponse::Created().json(devices))
}

/// GET /devices - List own devices, newest first (PROTECTED)
#[get("")]
pub async fn list_devices(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let devices = DeviceService::find_all(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(devices))
}

/// GET /devices/{id} - Fetch one device; 403 for non-owners, 404 if absent
/// (PROTECTED)
#[get("/{id}")]
pub async fn get_device(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let device =
        DeviceService::find_one(db.get_ref(), path.into_inner(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(device))
}

/// PATCH /devices/{id} - Partial update, owner only (PROTECTED)
#[patch("/{id}")]
pub async fn update_device(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateDeviceRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let body = body.into_inner();
    let update = DeviceUpdate {
        name: body.name,
        device_type: body.device_type,
        description: body.description,
    };

    let device =
        DeviceService::update(db.get_ref(), path.into_inner(), auth_user.user_id, update).await?;

    Ok(HttpResponse::Ok().json(device))
}

/// DELETE /devices/{id} - Remove a device and its telemetry, owner only
/// (PROTECTED)
#[delete("/{id}")]
pub async fn delete_device(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    DeviceService::remove(db.get_ref(), path.into_inner(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Device deleted successfully"
    })))
}

pub fn device_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/devices")
            .service(create_device)
            .service(create_devices_batch)
            .service(list_devices)
            .service(get_device)
            .service(update_device)
            .service(delete_device),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_request_rejects_empty_array() {
        let empty = CreateDevicesBatchRequest { devices: vec![] };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_batch_request_validates_entries() {
        let nameless = CreateDevicesBatchRequest {
            devices: vec![CreateDeviceRequest {
                name: "".to_string(),
                device_type: "ESP32".to_string(),
                description: None,
            }],
        };
        assert!(nameless.validate().is_err());

        let ok = CreateDevicesBatchRequest {
            devices: vec![CreateDeviceRequest {
                name: "D1".to_string(),
                device_type: "ESP32".to_string(),
                description: Some("Living room sensor".to_string()),
            }],
        };
        assert!(ok.validate().is_ok());
    }
}
