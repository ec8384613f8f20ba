use anyhow::Context;
use common::db::{parse_var, DbConfig};
use dotenv::dotenv;
use std::env;

// Ten years
const MAX_JWT_EXPIRATION: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,

    // Database configuration
    pub database: DbConfig,

    // Security
    pub jwt_secret: String,
    pub jwt_expiration: u64, // in seconds
    pub allowed_origins: Vec<String>,
    pub bcrypt_cost: u32,
    pub auth_rate_limit: usize, // requests per minute on /login and /register
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parse_var("PORT", "8000")?;

        let database = DbConfig::from_env()?;

        let jwt_secret =
            env::var("JWT_SECRET").context("JWT_SECRET must be set for secure operation")?;
        // 24 hours by default
        let jwt_expiration = check_jwt_expiration(parse_var("JWT_EXPIRATION", "86400")?)?;

        let allowed_origins = split_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        let bcrypt_cost = parse_var("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?;
        let auth_rate_limit = parse_var("AUTH_RATE_LIMIT", "30")?;

        Ok(Config {
            server_host,
            server_port,
            database,
            jwt_secret,
            jwt_expiration,
            allowed_origins,
            bcrypt_cost,
            auth_rate_limit,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn check_jwt_expiration(seconds: u64) -> anyhow::Result<u64> {
    anyhow::ensure!(
        (1..=MAX_JWT_EXPIRATION).contains(&seconds),
        "JWT_EXPIRATION must be between 1 and {MAX_JWT_EXPIRATION} seconds, got {seconds}"
    );
    Ok(seconds)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_origins(" http://a.test ,, https://b.test"),
            vec!["http://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn jwt_expiration_is_bounded() {
        assert_eq!(check_jwt_expiration(86400).unwrap(), 86400);
        assert!(check_jwt_expiration(0).is_err());
        assert!(check_jwt_expiration(9_300_000_000_000_000).is_err());
    }
}
