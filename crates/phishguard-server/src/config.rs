//! Front-end configuration
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. the YAML config file (optional)
//! 3. `PHISHGUARD__*` environment variables, e.g. `PHISHGUARD__SERVER__PORT=9000`
//! 4. command-line overrides

use phishguard_policy::HybridPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PHISHGUARD";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON linear model exported by the training pipeline
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// YAML rule set; the built-in heuristics are used when absent
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Hybrid decision thresholds
    #[serde(default)]
    pub policy: HybridPolicy,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub listen: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    /// Load configuration from file, environment, and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.apply(overrides);
        config.policy.validate()?;

        Ok(config)
    }

    /// Apply CLI overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(model) = &overrides.model_path {
            self.model_path = Some(model.clone());
        }

        if let Some(rules) = &overrides.rules_path {
            self.rules_path = Some(rules.clone());
        }

        if let Some(listen) = &overrides.listen {
            self.server.listen = listen.clone();
        }

        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted message, in bytes
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}
