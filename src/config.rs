use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use validator::Validate;

use crate::schema::SchemaCapabilities;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;
const CONFIG_DIR: &str = "config";

/// Which document backend the service talks to.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// DashMap-backed store with the local conversion engine. Meant for
    /// development and tests; documents live only as long as the process.
    Memory,
    /// REST client against a host ERP.
    Erp,
}

/// Application configuration with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable lines
    #[serde(default)]
    pub log_json: bool,

    /// Document backend selection
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// Base URL of the host ERP, required for the `erp` backend
    #[serde(default)]
    #[validate(url)]
    pub erp_base_url: Option<String>,

    /// API token sent as `Authorization: token ...` to the host ERP
    #[serde(default)]
    pub erp_auth_token: Option<String>,

    /// Bounded capacity of the in-process event channel
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Which optional fields the host document schemas carry
    #[serde(default)]
    pub capabilities: SchemaCapabilities,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Memory
}

fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_json: false,
            store_backend: default_store_backend(),
            erp_base_url: None,
            erp_auth_token: None,
            event_channel_capacity: default_event_channel_capacity(),
            capabilities: SchemaCapabilities::default(),
        }
    }
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from `config/default.*` (optional) plus
/// `BUNDLEFLOW_`-prefixed environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(Environment::with_prefix("BUNDLEFLOW").separator("__"))
        .build()?
        .try_deserialize()?;

    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;
    if cfg.store_backend == StoreBackend::Erp && cfg.erp_base_url.is_none() {
        return Err(ConfigError::Message(
            "erp_base_url is required when store_backend is 'erp'".to_string(),
        ));
    }
    Ok(cfg)
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured level when set.
pub fn init_tracing(log_level: &str, log_json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_address(), "0.0.0.0:8080");
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert!(!cfg.log_json);
    }

    #[test]
    fn backend_names_deserialize() {
        let cfg: AppConfig = serde_json::from_str(r#"{"store_backend": "erp"}"#).unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Erp);
    }
}
