use serde::Deserialize;

use vahan_core::config::Config;

/// Tag service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct TagConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Redis connection URL, used for request limiting. Env var: `REDIS_URL`.
    pub redis_url: String,
    /// Shared secret expected in `x-admin-key`. Env var: `ADMIN_KEY`.
    pub admin_key: String,
    /// TCP port to listen on (default 5000). Env var: `TAG_PORT`.
    #[serde(default = "default_port")]
    pub tag_port: u16,
    /// Comma-separated origins allowed by CORS. Env var: `CORS_ORIGINS`.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Seconds to wait for the first database connection. Env var: `DB_CONNECT_TIMEOUT_SECS`.
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
}

impl Config for TagConfig {}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_owned()]
}

fn default_db_connect_timeout_secs() -> u64 {
    5
}
