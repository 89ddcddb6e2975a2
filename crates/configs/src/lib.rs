//! # configs
//!
//! Layered settings for ripple, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `config/default.toml`, then `config/{RIPPLE_ENV}.toml` (both optional)
//! 3. `RIPPLE__SECTION__KEY` environment variables
//! 4. the conventional `HUGGINGFACE_API_KEY` and `DATABASE_URL` variables
//!
//! A `.env` file is read first if present.

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Organization the seed data is created under.
pub const DEFAULT_ORGANIZATION_ID: &str = "11111111-1111-1111-1111-111111111111";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid server address: {0}")]
    Address(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub generation: GenerationSettings,
    pub report: ReportSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Address(format!("{}:{}", self.host, self.port)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// When absent the server runs on the in-memory store
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret shared with the auth service
    pub jwt_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSettings {
    /// Absence only disables the AI endpoints
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Used when the caller's session carries no organization
    pub organization_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Built-in defaults only. Tests layer overrides on top of this.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.max_connections", 5_i64)?
            .set_default("generation.base_url", "https://router.huggingface.co/models")?
            .set_default("generation.model", "mistralai/Mistral-7B-Instruct-v0.3")?
            .set_default("generation.max_new_tokens", 800_i64)?
            .set_default("generation.temperature", 0.7_f64)?
            .set_default("generation.timeout_secs", 60_i64)?
            .set_default("report.organization_id", DEFAULT_ORGANIZATION_ID)?
            .set_default("log.format", "pretty")?)
    }

    /// Full layered load for the binaries.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let profile = std::env::var("RIPPLE_ENV").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            .add_source(
                Environment::with_prefix("RIPPLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("generation.api_key", non_empty_env("HUGGINGFACE_API_KEY"))?
            .set_override_option("database.url", non_empty_env("DATABASE_URL"))?;

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }
}
