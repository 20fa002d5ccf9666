use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::core::{BudgetRangeTable, PriceCostTable};

/// Application configuration
///
/// Every section has defaults, so an empty configuration is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub budget: BudgetSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// TripAdvisor content API access
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String { "https://api.content.tripadvisor.com/api/v1/".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 { 3600 }
fn default_max_entries() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            popular_limit: default_popular_limit(),
        }
    }
}

fn default_page_size() -> usize { 20 }
fn default_max_page_size() -> usize { 100 }
fn default_popular_limit() -> usize { 20 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetSettings {
    #[serde(default)]
    pub costs: PriceCostTable,
    #[serde(default)]
    pub ranges: BudgetRangeTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TRIPBOOK__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TRIPBOOK__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        with_api_key_override(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        with_api_key_override(settings)?.try_deserialize()
    }

    /// Parse settings from an in-memory TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TRIPBOOK")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The provider key is conventionally shipped as TRIPADVISOR_API_KEY
fn with_api_key_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("TRIPADVISOR_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("provider.api_key", api_key)?
            .build(),
        _ => Ok(settings),
    }
}
