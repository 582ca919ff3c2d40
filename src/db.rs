use sea_orm::{Database, DatabaseConnection, DbErr};
use std::env;

/// Opens the SeaORM connection pool from DATABASE_URL
pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url =
        env::var("DATABASE_URL").expect("DATABASE_URL is not set (environment or .env)");

    Database::connect(&database_url).await
}
