use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub db_max_connections: u32,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 5)?,
            rate_api_per_min: parsed_or("RATE_API_PER_MIN", 1000)?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
