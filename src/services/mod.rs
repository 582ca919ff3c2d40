pub mod auth_service;
pub mod device_service;
pub mod telemetry_service;
pub mod user_service;

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::models::{devices, telemetry, users};
    use crate::services::auth_service::AuthService;
    use crate::services::device_service::{DeviceService, DeviceSpec};
    use crate::services::telemetry_service::TelemetryService;
    use crate::utils::{jwt, password};

    /// Full lifecycle over one connection: register -> login -> register a
    /// device -> ingest a reading with its API key -> list readings as the
    /// owner. The store is mocked; every auth handoff between the services
    /// is real.
    #[tokio::test]
    async fn test_register_login_create_ingest_list() {
        let now = Utc::now();
        let user = users::Model {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password_hash: password::hash_password("pw").unwrap(),
            name: "A".to_string(),
            created_at: now,
            updated_at: now,
        };
        let device = devices::Model {
            id: Uuid::new_v4(),
            name: "D1".to_string(),
            device_type: "ESP32".to_string(),
            description: None,
            api_key: "device-key".to_string(),
            user_id: user.id,
            created_at: now,
            updated_at: now,
        };
        let reading = telemetry::Model {
            id: Uuid::new_v4(),
            device_id: device.id,
            temperature: Some(25.5),
            humidity: None,
            data: None,
            timestamp: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // register: email free, then insert
            .append_query_results([Vec::<users::Model>::new()])
            .append_query_results([vec![user.clone()]])
            // login: lookup by email
            .append_query_results([vec![user.clone()]])
            // device registration
            .append_query_results([vec![device.clone()]])
            // ingest: resolve by api key, then insert
            .append_query_results([vec![device.clone()]])
            .append_query_results([vec![reading.clone()]])
            // listing: ownership check, then readings
            .append_query_results([vec![device.clone()]])
            .append_query_results([vec![reading.clone()]])
            .into_connection();

        let (_, registered) = AuthService::register(&db, "a@x.com", "pw", "A").await.unwrap();

        let (token, _) = AuthService::login(&db, "a@x.com", "pw").await.unwrap();
        let session_user = jwt::verify_token(&token).unwrap().sub;
        assert_eq!(session_user, registered.id);

        let created = DeviceService::create(
            &db,
            session_user,
            DeviceSpec {
                name: "D1".to_string(),
                device_type: "ESP32".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(created.user_id, session_user);

        let ingested = TelemetryService::create(&db, &created.api_key, Some(25.5), None, None)
            .await
            .unwrap();
        assert_eq!(ingested.device_id, created.id);

        let readings = TelemetryService::find_by_device(&db, created.id, session_user, 100)
            .await
            .unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id, ingested.id);
        assert_eq!(readings[0].device_id, created.id);
    }
}
