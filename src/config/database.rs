use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Connect to Postgres using `DATABASE_URL`. Pool sizing and the SQL log
/// toggle are overridable through the environment.
pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let sqlx_logging = env::var("DB_SQLX_LOGGING")
        .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(true);

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(env_u32("DB_MAX_CONNECTIONS", 10))
        .min_connections(env_u32("DB_MIN_CONNECTIONS", 2))
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(sqlx_logging);

    Database::connect(opt).await
}
