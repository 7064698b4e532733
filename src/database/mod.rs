use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub mod models;
pub mod repositories;
pub mod transaction;

pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    log::info!("Connected to database {}", database_url);

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}
