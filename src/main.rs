mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    info!("Database connected");

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!("Starting server on http://{}:{}", host, port);

    let db_data = web::Data::new(db);
    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .configure(routes::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
