//! Server configuration, read from the environment
//!
//! | variable | default |
//! |---|---|
//! | `API_PORT` (or `PORT`) | 8000 |
//! | `API_HOST` | 0.0.0.0 |
//! | `DATA_FILE` | data.json |
//! | `STATIC_DIR` | static |
//! | `STORE_BACKEND` | auto |
//! | `SUPABASE_URL`, `SUPABASE_KEY` | unset |
//! | `DATABASE_URL` | unset |
//! | `PG_MAX_CONNECTIONS` | 5 |
//! | `REMOTE_TIMEOUT_SECS` | 8 |
//! | `APP_VERSION_HEADER` | crate version |
//! | `LOG_LEVEL`, `LOG_JSON` | info, false |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use solo_core::logging::{LogLevel, TracingConfig};

/// Which persistence backend to build at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Remote if its credentials are present, else the local file
    Auto,
    File,
    Supabase,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(StoreBackend::Auto),
            "file" | "local" => Ok(StoreBackend::File),
            "supabase" | "postgrest" => Ok(StoreBackend::Supabase),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub backend: StoreBackend,
    pub supabase_url: Option<String>,
    #[serde(skip_serializing)]
    pub supabase_key: Option<String>,
    #[serde(skip_serializing)]
    pub database_url: Option<String>,
    pub pg_max_connections: u32,
    pub remote_timeout_secs: u64,
    pub app_version: String,
    pub log_level: LogLevel,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            data_file: PathBuf::from("data.json"),
            static_dir: PathBuf::from("static"),
            backend: StoreBackend::Auto,
            supabase_url: None,
            supabase_key: None,
            database_url: None,
            pg_max_connections: 5,
            remote_timeout_secs: 8,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: LogLevel::Info,
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset and
    /// unparseable numbers keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let backend = match get("STORE_BACKEND").map(|v| v.parse::<StoreBackend>()) {
            Some(Ok(backend)) => backend,
            Some(Err(e)) => {
                tracing::warn!("{}, using auto", e);
                StoreBackend::Auto
            }
            None => defaults.backend,
        };

        Self {
            host: get("API_HOST").unwrap_or(defaults.host),
            port: get("API_PORT")
                .or_else(|| get("PORT"))
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            data_file: get("DATA_FILE").map(PathBuf::from).unwrap_or(defaults.data_file),
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            backend,
            supabase_url: get("SUPABASE_URL"),
            supabase_key: get("SUPABASE_KEY"),
            database_url: get("DATABASE_URL"),
            pg_max_connections: get("PG_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pg_max_connections),
            remote_timeout_secs: get("REMOTE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.remote_timeout_secs),
            app_version: get("APP_VERSION_HEADER").unwrap_or(defaults.app_version),
            log_level: get("LOG_LEVEL")
                .map(|s| LogLevel::parse(&s))
                .unwrap_or(defaults.log_level),
            log_json: get("LOG_JSON")
                .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn has_supabase(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tracing(&self) -> TracingConfig {
        TracingConfig {
            json: self.log_json,
            ..TracingConfig::with_level(self.log_level)
        }
    }
}
