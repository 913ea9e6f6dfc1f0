//! Application settings loading.
//!
//! Settings come from an optional TOML file (`config.toml`, or the path in
//! `POCKET_LEDGER_CONFIG`) and are then overridden by environment variables, which
//! `main` populates from `.env` via `dotenvy` before calling [`load_app_config`].

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "POCKET_LEDGER_CONFIG";

/// Config file consulted when `POCKET_LEDGER_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Upper bound on token lifetime (one year)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Runtime settings for the server.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// `SeaORM` connection URL
    pub database_url: String,
    /// Socket address the HTTP listener binds to
    pub bind_address: String,
    /// HMAC secret for bearer tokens
    pub jwt_secret: Option<String>,
    /// Lifetime of issued tokens
    pub token_ttl_minutes: i64,
    /// Whether non-auth routes require a bearer token
    pub require_auth: bool,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: "127.0.0.1:8000".to_string(),
            jwt_secret: None,
            token_ttl_minutes: 60,
            require_auth: true,
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Applies overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.jwt_secret = Some(secret);
        }
        if let Some(ttl) = lookup("TOKEN_TTL_MINUTES") {
            self.token_ttl_minutes = ttl.trim().parse().map_err(|e| Error::Config {
                message: format!("TOKEN_TTL_MINUTES must be an integer: {e}"),
            })?;
        }
        if let Some(flag) = lookup("REQUIRE_AUTH") {
            self.require_auth = parse_bool(&flag).ok_or_else(|| Error::Config {
                message: format!("REQUIRE_AUTH must be true or false, got {flag:?}"),
            })?;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        Ok(())
    }

    /// Rejects combinations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.token_ttl_minutes) {
            return Err(Error::Config {
                message: format!(
                    "token_ttl_minutes must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
                ),
            });
        }
        if self.require_auth && self.jwt_secret.is_none() {
            return Err(Error::Config {
                message: "jwt_secret (JWT_SECRET) is required when require_auth is enabled"
                    .to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the full application configuration: file (if any), then environment.
///
/// An explicitly named file (`POCKET_LEDGER_CONFIG`) must exist; the default
/// `config.toml` is optional.
pub fn load_app_config() -> Result<AppConfig> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_config(path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            debug!("No config file found, using defaults");
            AppConfig::default()
        }
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;

    info!(
        bind_address = %config.bind_address,
        require_auth = config.require_auth,
        "Configuration loaded"
    );
    Ok(config)
}
