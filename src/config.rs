// src/config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub auth_url: String,
    pub auth_api_key: String,
    /// Origin allowed by CORS; unset means any origin.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Reads configuration from the environment. Missing required variables
    /// abort startup.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3030".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid number");

        Self {
            port,
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            auth_url: env::var("AUTH_URL").expect("AUTH_URL must be set"),
            auth_api_key: env::var("AUTH_API_KEY").expect("AUTH_API_KEY must be set"),
            cors_origin: env::var("CORS_ORIGIN").ok(),
        }
    }
}
