use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::services::DocumentStoreConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
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

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self { path: default_model_path() }
    }
}

fn default_model_path() -> String { "model.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database_id() -> String { "default".to_string() }
fn default_collection() -> String { "pets".to_string() }
fn default_page_size() -> usize { 100 }
fn default_timeout_secs() -> u64 { 30 }

impl StoreSettings {
    pub fn client_config(&self) -> DocumentStoreConfig {
        DocumentStoreConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            collection: self.collection.clone(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

fn default_top_k() -> usize { 15 }
fn default_max_top_k() -> usize { 100 }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PETMATCH__)
    /// 5. Well-known variables: PORT, MODEL_PATH, STORE_URL, STORE_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PETMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PETMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings, |key| std::env::var(key).ok())?.try_deserialize()
    }
}

/// Well-known environment variables and the settings keys they override
const ENV_OVERRIDES: [(&str, &str); 4] = [
    ("PORT", "server.port"),
    ("MODEL_PATH", "model.path"),
    ("STORE_URL", "store.endpoint"),
    ("STORE_API_KEY", "store.api_key"),
];

fn apply_env_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);
    for (var, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(var) {
            builder = builder.set_override(key, value)?;
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(raw: &str) -> Config {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings: Settings = from_toml("[store]\nendpoint = \"http://store.local/v1\"\n")
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.model.path, "model.json");
        assert_eq!(settings.store.collection, "pets");
        assert_eq!(settings.store.page_size, 100);
        assert_eq!(settings.matching.top_k, 15);
        assert_eq!(settings.matching.max_top_k, 100);
    }

    #[test]
    fn test_store_endpoint_required() {
        let result: Result<Settings, _> = from_toml("[server]\nport = 9000\n").try_deserialize();
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let base = from_toml("[store]\nendpoint = \"http://store.local/v1\"\n[server]\nport = 9000\n");
        let overridden = apply_env_overrides(base, |key| match key {
            "PORT" => Some("8081".to_string()),
            "MODEL_PATH" => Some("/models/pets.json".to_string()),
            "STORE_URL" => Some("https://docs.example/v1".to_string()),
            _ => None,
        })
        .unwrap();

        let settings: Settings = overridden.try_deserialize().unwrap();
        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.model.path, "/models/pets.json");
        assert_eq!(settings.store.endpoint, "https://docs.example/v1");
        assert_eq!(settings.store.api_key, "");
    }

    #[test]
    fn test_client_config() {
        let settings: Settings = from_toml("[store]\nendpoint = \"http://store.local/v1\"\ntimeout_secs = 3\n")
            .try_deserialize()
            .unwrap();
        let client = settings.store.client_config();
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.collection, "pets");
    }
}
