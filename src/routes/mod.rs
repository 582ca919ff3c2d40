pub mod auth;
pub mod devices;
pub mod health;
pub mod telemetry;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .configure(auth::auth_routes)
        .configure(devices::device_routes)
        .configure(telemetry::telemetry_routes);
}
