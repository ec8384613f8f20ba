use std::{env, str::FromStr};

use anyhow::Context;
use dotenv::dotenv;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    Pool, Postgres,
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(DbConfig {
            url: env::var("DATABASE_URL").ok(),
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_var("DB_PORT", "5432")?,
            user: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            database: env::var("DB_NAME").unwrap_or_else(|_| "pocket".to_string()),
            ssl_mode: env::var("DB_SSLMODE").unwrap_or_else(|_| "prefer".to_string()),
            max_connections: parse_var("DB_MAX_CONNECTIONS", "10")?,
        })
    }

    fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .with_context(|| format!("DB_SSLMODE '{}' is not a valid ssl mode", self.ssl_mode))?;

        let options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).context("DATABASE_URL is not valid")?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database),
        };
        Ok(options.ssl_mode(ssl_mode))
    }
}

/// Reads `key` from the environment, falling back to `default`, and parses it.
pub fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}"))
}

/// Opens the pool and brings the schema up to date.
pub async fn establish_connection(config: &DbConfig) -> anyhow::Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options()?)
        .await
        .context("Failed to create pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database schema is up to date");

    Ok(pool)
}
