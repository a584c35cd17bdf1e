//! Configuration loading with layered overrides.
//!
//! Config is loaded in order (each layer overrides the previous):
//! 1. Default values
//! 2. Config file (TOML)
//! 3. Environment variables
//! 4. CLI arguments
//!
//! The remote database token is never read from config files; it must come
//! from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub log: Log,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix shared by every resource route.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefix: default_prefix(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_prefix() -> String {
    "/api".to_string()
}

/// Database connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Token for remote (`libsql://`, `https://`) databases.
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,

    /// Apply the bundled DDL when the store is opened.
    #[serde(default)]
    pub bootstrap: bool,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            auth_token: None,
            bootstrap: false,
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("url", &self.url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("bootstrap", &self.bootstrap)
            .finish()
    }
}

fn default_database_url() -> String {
    "secretaria.db".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides<'a> {
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub prefix: Option<&'a str>,
    pub database_url: Option<&'a str>,
    pub bootstrap: bool,
}

/// Builder for loading configuration with customizable options.
#[derive(Debug, Clone)]
pub struct Loader {
    /// Environment variable prefix (e.g., "MYAPP" -> MYAPP_HOST, MYAPP_PORT)
    pub env_prefix: String,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            env_prefix: "SECRETARIA".to_string(),
        }
    }
}

impl Loader {
    /// Create a new config loader with the given environment prefix.
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
        }
    }

    /// Load configuration from file, environment, and CLI arguments.
    pub fn load(&self, config_path: Option<&Path>, cli: &Overrides<'_>) -> crate::Result<Config> {
        let mut config: Config = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?
            }
            None => Config::default(),
        };

        // Tokens only come from the environment
        config.database.auth_token = None;

        let prefix = &self.env_prefix;

        if let Ok(host) = std::env::var(format!("{prefix}_HOST")) {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var(format!("{prefix}_PORT")) {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{prefix}_PORT is not a valid port: {port}")))?;
        }
        if let Ok(path_prefix) = std::env::var(format!("{prefix}_PREFIX")) {
            config.server.prefix = path_prefix;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(flag) = std::env::var(format!("{prefix}_BOOTSTRAP")) {
            config.database.bootstrap = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        config.database.auth_token = std::env::var(format!("{prefix}_DB_TOKEN"))
            .or_else(|_| std::env::var("TURSO_AUTH_TOKEN"))
            .ok();

        if let Some(host) = cli.host {
            config.server.host = host.to_string();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(path_prefix) = cli.prefix {
            config.server.prefix = path_prefix.to_string();
        }
        if let Some(url) = cli.database_url {
            config.database.url = url.to_string();
        }
        if cli.bootstrap {
            config.database.bootstrap = true;
        }

        config.server.prefix = normalize_prefix(&config.server.prefix)?;

        Ok(config)
    }
}

/// `"api/"` -> `"/api"`, `"/"` -> `""`.
fn normalize_prefix(raw: &str) -> crate::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains(['{', '}']) {
        return Err(Error::Config(format!(
            "Route prefix must not contain parameters: {raw}"
        )));
    }
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}
