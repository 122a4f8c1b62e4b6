//! Server configuration from environment variables (a `.env` file is honored).
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `ASSET_DIR` | `<crate>/static` |
//! | `ASSET_CACHE_TTL_SECS` | `600` (0 disables the cache) |
//! | `MAX_PAYLOAD_BYTES` | `2097152` |
//! | `ALLOWED_ORIGINS` | local development origins, comma separated |

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub asset_dir: PathBuf,
    pub asset_cache_ttl: Duration,
    pub max_payload_bytes: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            asset_dir: default_asset_dir().to_path_buf(),
            asset_cache_ttl: Duration::from_secs(600),
            max_payload_bytes: 2 * 1024 * 1024,
            allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", get("PORT"))?.unwrap_or(defaults.port),
            asset_dir: get("ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_dir),
            asset_cache_ttl: parse_var::<u64>("ASSET_CACHE_TTL_SECS", get("ASSET_CACHE_TTL_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.asset_cache_ttl),
            max_payload_bytes: parse_var("MAX_PAYLOAD_BYTES", get("MAX_PAYLOAD_BYTES"))?
                .unwrap_or(defaults.max_payload_bytes),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value })
    })
    .transpose()
}

/// Get the static assets directory path.
pub fn default_asset_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
