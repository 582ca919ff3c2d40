use actix_web::{HttpResponse, get, post, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::AuthUser;
use crate::services::telemetry_service::{DEFAULT_LIMIT, TelemetryService};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[validate(length(min = 1, message = "apiKey must not be empty"))]
    pub api_key: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct TelemetryQuery {
    pub limit: Option<u64>,
}

/// POST /telemetry - Ingest a reading. Authenticated by the device API key
/// in the body; no user session involved.
#[post("")]
pub async fn ingest(
    body: web::Json<IngestRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let body = body.into_inner();
    let reading = TelemetryService::create(
        db.get_ref(),
        &body.api_key,
        body.temperature,
        body.humidity,
        body.data,
    )
    .await?;

    Ok(HttpResponse::Created().json(reading))
}

/// GET /telemetry/device/{deviceId}?limit= - Readings for an owned device,
/// newest first (PROTECTED)
#[get("/device/{device_id}")]
pub async fn list_for_device(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    query: web::Query<TelemetryQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let readings = TelemetryService::find_by_device(
        db.get_ref(),
        path.into_inner(),
        auth_user.user_id,
        limit,
    )
    .await?;

    Ok(HttpResponse::Ok().json(readings))
}

pub fn telemetry_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/telemetry")
            .service(ingest)
            .service(list_for_device),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_request_requires_api_key() {
        let body: IngestRequest = serde_json::from_value(serde_json::json!({
            "apiKey": "",
            "temperature": 25.5
        }))
        .unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_ingest_request_accepts_open_schema_data() {
        let body: IngestRequest = serde_json::from_value(serde_json::json!({
            "apiKey": "some-key",
            "data": { "voltage": 3.3, "rssi": -70, "tags": ["indoor"] }
        }))
        .unwrap();
        assert!(body.validate().is_ok());
        assert!(body.temperature.is_none());
        assert!(body.data.unwrap().get("voltage").is_some());
    }
}
